//! Error types for list fetches, image loads, and cache maintenance
//!
//! Every failure is terminal for the operation that raised it. Nothing here
//! is retried; callers decide how a failure is surfaced (a notice for the
//! list fetch, a blank cell for an image load).

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`LoadError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect/timeout/non-success status, or an unusable cache entry
    Network,
    /// Malformed or unsupported image bytes
    Decode,
    /// Malformed list JSON
    Parse,
}

/// Failure of a single list fetch or image load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode image from {locator}: {source}")]
    Decode {
        locator: String,
        #[source]
        source: image::ImageError,
    },

    #[error("cached entry {} could not be decoded", path.display())]
    CorruptEntry { path: PathBuf },

    #[error("failed to persist cache entry {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse media list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl LoadError {
    /// Classify this error into the network/decode/parse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Network { .. }
            | LoadError::Status { .. }
            | LoadError::CorruptEntry { .. }
            | LoadError::Persist { .. }
            | LoadError::Task(_) => ErrorKind::Network,
            LoadError::Decode { .. } => ErrorKind::Decode,
            LoadError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Failure of a cache maintenance operation (stats, clear, setup)
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not determine a cache directory for this platform")]
    NoCacheDir,

    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk cache directory: {0}")]
    Walk(#[from] walkdir::Error),
}
