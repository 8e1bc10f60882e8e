//! # Source readers
//!
//! Reading is split into one implementation per
//! [`LocatorKind`](crate::LocatorKind). The
//! converter picks the reader matching the root input once and threads it
//! through the whole tree.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, trace};

use crate::locator::Locator;
use crate::{ConvertError, ReadError};

#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read the full contents behind a locator
    async fn read(&self, locator: &Locator) -> Result<Bytes, ReadError>;
}

/// Apply the per-read timeout, if any
async fn with_read_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, ReadError>
where
    F: Future<Output = Result<T, ReadError>>,
{
    if timeout.is_zero() {
        return fut.await;
    }
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ReadError::Timeout(timeout)),
    }
}

/// Reads over HTTP(S) with a GET per locator
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    read_timeout: Duration,
}

impl HttpSource {
    pub fn new(client: Client, read_timeout: Duration) -> Self {
        Self {
            client,
            read_timeout,
        }
    }
}

#[async_trait]
impl SourceReader for HttpSource {
    async fn read(&self, locator: &Locator) -> Result<Bytes, ReadError> {
        let Locator::Network(url) = locator else {
            return Err(ReadError::UnsupportedLocator(locator.to_string()));
        };

        with_read_timeout(self.read_timeout, async {
            let response = self.client.get(url.clone()).send().await?;
            if !response.status().is_success() {
                return Err(ReadError::Status(response.status()));
            }
            let body = response.bytes().await?;
            debug!("Fetched {} bytes from {}", body.len(), url);
            Ok(body)
        })
        .await
    }
}

/// Reads from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    read_timeout: Duration,
}

impl FileSource {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

#[async_trait]
impl SourceReader for FileSource {
    async fn read(&self, locator: &Locator) -> Result<Bytes, ReadError> {
        let Locator::Filesystem(path) = locator else {
            return Err(ReadError::UnsupportedLocator(locator.to_string()));
        };

        with_read_timeout(self.read_timeout, async {
            let data = tokio::fs::read(path).await?;
            trace!("Read {} bytes from {}", data.len(), path.display());
            Ok(Bytes::from(data))
        })
        .await
    }
}

/// Read a locator, attaching the locator to any failure
pub(crate) async fn read_bytes(
    source: &dyn SourceReader,
    locator: &Locator,
) -> Result<Bytes, ConvertError> {
    source
        .read(locator)
        .await
        .map_err(|source| ConvertError::Read {
            locator: locator.to_string(),
            source,
        })
}
