//! # Memory Sink
//!
//! Keeps artifacts in memory, in write order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::provider::{Sink, SinkError, validate_relative_path};

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, Bytes>,
    order: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Inner>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.inner.lock().files.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.lock().files.contains_key(path)
    }

    /// Number of distinct paths written
    pub fn len(&self) -> usize {
        self.inner.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().files.is_empty()
    }

    /// Every write, in the order it happened (repeats included)
    pub fn write_order(&self) -> Vec<String> {
        self.inner.lock().order.clone()
    }

    /// Snapshot of all stored artifacts, sorted by path
    pub fn files(&self) -> BTreeMap<String, Bytes> {
        self.inner.lock().files.clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError> {
        validate_relative_path(path)?;
        let mut inner = self.inner.lock();
        inner.order.push(path.to_string());
        inner.files.insert(path.to_string(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_files_and_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write("b.ts", Bytes::from_static(b"b")).await.unwrap();
        sink.write("a.ts", Bytes::from_static(b"a")).await.unwrap();
        sink.write("b.ts", Bytes::from_static(b"b")).await.unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.write_order(), ["b.ts", "a.ts", "b.ts"]);
        assert_eq!(sink.get("a.ts").unwrap(), Bytes::from_static(b"a"));
        assert!(sink.contains("b.ts"));
        assert!(!sink.contains("c.ts"));
        assert_eq!(sink.files().keys().collect::<Vec<_>>(), ["a.ts", "b.ts"]);
    }
}
