//! Error types for scenery-core

use thiserror::Error;

/// Result type alias for Scenery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or loading scene bundles.
///
/// Load failures come in two kinds that callers are expected to branch on:
/// [`Error::Transport`] when the document could not be fetched, and
/// [`Error::Parse`] when it was fetched (or supplied) but is not a
/// well-formed document. Neither is retried or recovered from here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Fetching a locator failed (network, HTTP status, unsupported scheme).
    #[error("Transport error for {locator}: {message}")]
    Transport {
        /// Locator that was being fetched
        locator: String,
        /// Human-readable error message
        message: String,
        /// HTTP status, when the server answered with a failure
        status: Option<u16>,
        /// Underlying transport error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document text is not a well-formed structured document.
    #[error("Parse error in {locator}: {source}")]
    Parse {
        /// Locator the text came from
        locator: String,
        /// Parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// The parent chain was longer than the resolver is willing to walk.
    #[error("Ancestor chain exceeds {limit} bundles")]
    AncestorDepthExceeded {
        /// Maximum number of delegation hops
        limit: usize,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a transport error without an underlying source.
    pub fn transport<L, M>(locator: L, message: M) -> Self
    where
        L: Into<String>,
        M: Into<String>,
    {
        Error::Transport {
            locator: locator.into(),
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a transport error wrapping the collaborator's error unchanged.
    pub fn transport_with_source<L, E>(locator: L, source: E) -> Self
    where
        L: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            locator: locator.into(),
            message: source.to_string(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    pub fn http_status<L: Into<String>>(locator: L, status: u16) -> Self {
        Error::Transport {
            locator: locator.into(),
            message: format!("server responded with HTTP {status}"),
            status: Some(status),
            source: None,
        }
    }

    /// Creates a parse error for text fetched from `locator`.
    pub fn parse<L: Into<String>>(locator: L, source: serde_yaml::Error) -> Self {
        Error::Parse {
            locator: locator.into(),
            source,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if the document could not be fetched.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Returns `true` if the document was fetched but could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns whether retrying the same operation could succeed.
    ///
    /// Only transport failures are transient; a document that failed to
    /// parse will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 408 || *code == 429,
                None => true,
            },
            Error::Io(_) => true,
            Error::Parse { .. } => false,
            Error::AncestorDepthExceeded { .. } => false,
            Error::Config { .. } => false,
        }
    }
}
