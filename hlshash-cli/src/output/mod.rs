use async_trait::async_trait;
use bytes::Bytes;
use hlshash_engine::{Sink, SinkError};

/// Called with the artifact path and size after each successful write
pub type OnStored = Box<dyn Fn(&str, usize) + Send + Sync>;

/// Wraps a sink and reports every artifact it commits
pub struct ReportingSink<S> {
    inner: S,
    on_stored: OnStored,
}

impl<S: Sink> ReportingSink<S> {
    pub fn new(inner: S, on_stored: OnStored) -> Self {
        Self { inner, on_stored }
    }
}

#[async_trait]
impl<S: Sink> Sink for ReportingSink<S> {
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError> {
        let len = content.len();
        self.inner.write(path, content).await?;
        (self.on_stored)(path, len);
        Ok(())
    }
}
