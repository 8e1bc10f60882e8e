//! # Directory Sink
//!
//! Writes artifacts below a local directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, trace};

use super::provider::{Sink, SinkError, validate_relative_path};

#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    overwrite: bool,
    tmp_counter: AtomicU64,
}

impl DirectorySink {
    /// Create a sink rooted at `root`. The directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            overwrite: false,
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Rewrite files that already exist. Off by default: a hash-named file
    /// that exists already holds these exact bytes.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path an artifact is written to
    pub fn path_for(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl Sink for DirectorySink {
    async fn write(&self, path: &str, content: Bytes) -> Result<(), SinkError> {
        validate_relative_path(path)?;

        let target = self.path_for(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        if !self.overwrite && fs::try_exists(&target).await? {
            debug!("{} already present, skipping", target.display());
            return Ok(());
        }

        // Write beside the target and rename so a crash never leaves a
        // truncated file under a hash name.
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let mut tmp = target.clone().into_os_string();
        tmp.push(format!(".{n}.part"));
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &content).await?;
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        trace!("Wrote {} bytes to {}", content.len(), target.display());
        Ok(())
    }
}
