//! Error types and classification for s3grep.
//!
//! This crate provides:
//! - [`SearchError`] - Top-level error enum for every failure a search can surface
//! - [`ErrorKind`] - Coarse category used for fallback decisions and reporting

use thiserror::Error;

/// Top-level error type for s3grep.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The location string is not a URI, or not an `s3://` one
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The key does not name a scannable object
    #[error("No such object: s3://{bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// The select request was rejected by the service
    #[error("Query failed for {key}: {message}")]
    RemoteQuery {
        key: String,
        code: Option<String>,
        message: String,
    },

    /// A listing page could not be fetched
    #[error("Listing s3://{bucket}/{prefix} failed: {message}")]
    List {
        bucket: String,
        prefix: String,
        message: String,
    },

    /// The result stream for an object did not end cleanly
    #[error("Failed to read select results for {key}: {message}")]
    Stream { key: String, message: String },

    /// Writing matches to the output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Client configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// Build an [`SearchError::ObjectNotFound`].
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether this error is the store's "no such key" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath(_) => ErrorKind::InvalidPath,
            Self::ObjectNotFound { .. } => ErrorKind::ObjectNotFound,
            Self::RemoteQuery { .. } => ErrorKind::RemoteQuery,
            Self::List { .. } => ErrorKind::List,
            Self::Stream { .. } => ErrorKind::Stream,
            Self::Output(_) => ErrorKind::Output,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad scheme or unparseable URI. User input error.
    InvalidPath,

    /// Existence signal. Recoverable only for the single-object attempt.
    ObjectNotFound,

    /// Transport, permission or malformed-query failure
    RemoteQuery,

    /// Listing page fetch failed
    List,

    /// Result stream failed to close cleanly
    Stream,

    /// Local output failure
    Output,

    /// Client setup failure
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath => write!(f, "InvalidPath"),
            Self::ObjectNotFound => write!(f, "ObjectNotFound"),
            Self::RemoteQuery => write!(f, "RemoteQuery"),
            Self::List => write!(f, "List"),
            Self::Stream => write!(f, "Stream"),
            Self::Output => write!(f, "Output"),
            Self::Config => write!(f, "Config"),
        }
    }
}

/// Result type alias using SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
