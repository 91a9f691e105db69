//! Fetch collaborators for scene documents.
//!
//! [`Bundle::load`](crate::Bundle::load) takes any [`Fetcher`]. This module
//! provides the standard ones:
//!
//! - [`HttpFetcher`]: `http://` and `https://` via reqwest
//! - [`FileFetcher`]: `file://` URLs and plain filesystem paths
//! - [`SchemeFetcher`]: dispatches to the two above by scheme
//!
//! Every failure is reported as [`Error::Transport`]: connection errors,
//! non-success HTTP statuses, unreadable files, and unsupported schemes.
//! Nothing is retried or cached here.
//!
//! # Example
//!
//! ```rust,ignore
//! use scenery_bundle::{Bundle, Locator, SchemeFetcher};
//! use scenery_core::LoaderConfig;
//!
//! let fetcher = SchemeFetcher::new(&LoaderConfig::default())?;
//! let bundle = Bundle::new(Locator::from("https://host/scene.yaml"), None, None);
//! let document = bundle.load(&fetcher).await?;
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use scenery_core::util::urls::is_relative_url;
use scenery_core::{Error, LoaderConfig, Result};

/// Body of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status, or 200 for local reads.
    pub status: u16,
    /// Response text.
    pub body: String,
}

impl FetchResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Retrieves the text behind a fully resolved locator.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `locator`, failing with [`Error::Transport`].
    async fn fetch(&self, locator: &str) -> Result<FetchResponse>;
}

// ============================================================================
// HTTP
// ============================================================================

/// Fetches `http://` and `https://` locators.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Use an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchResponse> {
        log::debug!("GET {locator}");
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| Error::transport_with_source(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(locator, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport_with_source(locator, e))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

// ============================================================================
// Local files
// ============================================================================

/// Reads `file://` URLs and plain paths from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    /// Filesystem path a locator refers to.
    pub fn path_for_locator(locator: &str) -> Result<PathBuf> {
        if has_scheme(locator, "file") {
            let url = Url::parse(locator).map_err(|e| Error::transport_with_source(locator, e))?;
            return url
                .to_file_path()
                .map_err(|()| Error::transport(locator, "not a local file URL"));
        }
        Ok(PathBuf::from(locator))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchResponse> {
        let path = Self::path_for_locator(locator)?;
        log::debug!("Reading {}", path.display());
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::transport_with_source(locator, e))?;
        Ok(FetchResponse::ok(body))
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Routes each locator to the HTTP or file fetcher by scheme.
#[derive(Debug, Clone)]
pub struct SchemeFetcher {
    http: HttpFetcher,
    allow_files: bool,
}

impl SchemeFetcher {
    /// Build from loader configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new(config)?,
            allow_files: config.allow_file_locators,
        })
    }
}

#[async_trait]
impl Fetcher for SchemeFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchResponse> {
        if has_scheme(locator, "http") || has_scheme(locator, "https") {
            return self.http.fetch(locator).await;
        }

        if has_scheme(locator, "file") || is_relative_url(locator) {
            if !self.allow_files {
                return Err(Error::transport(locator, "local file access is disabled"));
            }
            return FileFetcher.fetch(locator).await;
        }

        Err(Error::transport(locator, "unsupported locator scheme"))
    }
}

fn has_scheme(locator: &str, scheme: &str) -> bool {
    locator
        .split_once("://")
        .is_some_and(|(prefix, _)| prefix.eq_ignore_ascii_case(scheme))
}
