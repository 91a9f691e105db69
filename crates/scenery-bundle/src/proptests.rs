//! Property-based tests for bundle resolution.
