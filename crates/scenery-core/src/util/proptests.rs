//! Property-based tests for locator utilities.
