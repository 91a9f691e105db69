//! Utility modules for locator handling.
//!
//! # Modules
//!
//! - [`urls`]: Locator classification, path extraction, and base joining

pub mod urls;

mod proptests;
