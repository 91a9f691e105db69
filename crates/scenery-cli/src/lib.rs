//! # scenery-cli
//!
//! Command-line front end for Scenery scene bundles.
//!
//! - `scenery resolve <SCENE> [--base <PATH>] <REF>...` prints one JSON
//!   [`Resource`](scenery_bundle::Resource) per reference
//! - `scenery load <SCENE>` fetches and parses a scene and prints it as JSON
//!
//! Loader settings come from `--config`, then `SCENERY_CONFIG`, then the
//! built-in defaults.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;

pub use cli::{Args, Command};
pub use commands::run;
