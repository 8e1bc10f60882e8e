//! # Sink interface

use std::path::{Component, Path};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Invalid artifact path: {0}")]
    InvalidPath(String),
}

/// Destination for converted artifacts.
///
/// Writes are not transactional: a failed conversion leaves whatever was
/// already written in place.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist `content` under `path`, relative to the sink's root
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError> {
        (**self).write(path, content).await
    }
}

/// Reject paths that would escape the sink root
pub(crate) fn validate_relative_path(path: &str) -> Result<(), SinkError> {
    if path.is_empty() {
        return Err(SinkError::InvalidPath("empty path".to_string()));
    }
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || path.starts_with('/') || path.contains('\\') {
        return Err(SinkError::InvalidPath(path.to_string()));
    }
    Ok(())
}
