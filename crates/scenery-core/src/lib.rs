//! Scenery Core: shared errors, configuration, and locator utilities.
//!
//! This crate provides the foundational types used across all Scenery crates.
//! It has no internal Scenery dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: Loader configuration (fetch timeouts, local file access)
//! - [`util`]: Locator classification and joining

#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::LoaderConfig;
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::urls::{
    add_base_url, extension_for_url, flatten_relative_url, is_global_reference, is_relative_url,
    is_scheme_relative_url, path_for_url,
};
