use std::time::Duration;

use reqwest::StatusCode;

use crate::manifest::ManifestError;
use crate::sink::SinkError;

/// Failure while reading a playlist or segment from its source
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status code {0}")]
    Status(StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    #[error("Locator not supported by this source: {0}")]
    UnsupportedLocator(String),
}

// Errors surfaced by a conversion. Any of them aborts the subtree being
// converted and propagates to the caller of `PlaylistConverter::convert`.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to read {locator}: {source}")]
    Read {
        locator: String,
        #[source]
        source: ReadError,
    },

    #[error("Failed to parse playlist {locator}: {source}")]
    Parse {
        locator: String,
        #[source]
        source: ManifestError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: SinkError,
    },

    #[error("Could not resolve '{reference}' against {base}: {message}")]
    Resolve {
        base: String,
        reference: String,
        message: String,
    },

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Playlist nesting exceeds {depth} levels at {locator}")]
    RecursionLimit { locator: String, depth: usize },

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ConvertError {
    /// Returns `true` if the error came from reading a source
    pub fn is_read(&self) -> bool {
        matches!(self, ConvertError::Read { .. })
    }

    /// Returns `true` if the error came from parsing a playlist
    pub fn is_parse(&self) -> bool {
        matches!(self, ConvertError::Parse { .. })
    }

    /// Returns `true` if the error came from the sink
    pub fn is_write(&self) -> bool {
        matches!(self, ConvertError::Write { .. })
    }
}
