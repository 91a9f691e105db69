//! Scene bundles, document parsing, and fetching.
//!
//! This crate implements resolution of resource references inside scene
//! documents. Each document is represented by a [`Bundle`]; bundles form a
//! parent chain, and documents loaded from inside an archive resolve their
//! relative references through that archive.
//!
//! # Modules
//!
//! - [`bundle`]: [`Bundle`], [`Locator`], [`Resource`], and archive lookup
//! - [`document`]: Scene document parsing (duplicate keys tolerated)
//! - [`fetch`]: The [`Fetcher`] trait with HTTP and file implementations
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use scenery_bundle::{Bundle, Locator};
//!
//! // An unpacked archive serving extracted members
//! let mut members = HashMap::new();
//! members.insert("folder/style.yaml".to_string(), "file:///tmp/x/folder/style.yaml".to_string());
//!
//! let root = Bundle::archive(Locator::from("http://host/root.zip"), None, None, Arc::new(members));
//! let child = Bundle::new(Locator::from("folder/child.yaml"), Some("folder/"), Some(root));
//!
//! let style = child.resolve("style.yaml").unwrap();
//! assert_eq!(style.url, "file:///tmp/x/folder/style.yaml");
//! ```

#![doc = include_str!("../README.md")]

pub mod bundle;
pub mod document;
pub mod fetch;

mod proptests;

// Re-export commonly used types
pub use bundle::{
    ArchiveIndex, Bundle, BundleKind, Locator, MAX_ANCESTOR_DEPTH, Resource, ResourceType,
};
pub use document::{Document, parse_document};
pub use fetch::{FetchResponse, Fetcher, FileFetcher, HttpFetcher, SchemeFetcher};
