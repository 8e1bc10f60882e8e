//! # Playlist converter
//!
//! Walks an HLS playlist tree depth first and commits a content-addressed
//! copy of it to a [`Sink`]. Segments are stored as `<sha256>.ts`, every
//! playlist as `<sha256>.m3u8` where the hash covers the playlist text
//! *after* its references were rewritten. A playlist is only written once
//! everything it references has been written, so the root hash is the last
//! artifact committed and names a complete tree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::events::{ConvertEvent, OnEvent};
use crate::hash::{ArtifactKind, ContentHash, hash_bytes};
use crate::locator::{Locator, LocatorKind};
use crate::manifest::{Manifest, ManifestError, SegmentRef, VariantRef};
use crate::rewrite::rewrite_references;
use crate::sink::Sink;
use crate::source::{FileSource, HttpSource, SourceReader, read_bytes};

pub struct PlaylistConverter {
    config: Arc<ConverterConfig>,
    http: HttpSource,
    file: FileSource,
    on_event: Option<OnEvent>,
}

impl PlaylistConverter {
    /// Create a converter, building its HTTP client from `config`
    pub fn new(config: ConverterConfig) -> Result<Self, ConvertError> {
        let client = crate::client::create_client(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a converter around an existing HTTP client
    pub fn with_client(config: ConverterConfig, client: Client) -> Self {
        let http = HttpSource::new(client, config.read_timeout);
        let file = FileSource::new(config.read_timeout);
        Self {
            config: Arc::new(config),
            http,
            file,
            on_event: None,
        }
    }

    pub fn with_event_handler(mut self, on_event: OnEvent) -> Self {
        self.on_event = Some(on_event);
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn emit(&self, event: ConvertEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }

    // Chosen once from the root; every nested reference is read the same way
    fn source_for(&self, kind: LocatorKind) -> &dyn SourceReader {
        match kind {
            LocatorKind::Network => &self.http,
            LocatorKind::Filesystem => &self.file,
        }
    }

    /// Convert the tree rooted at `input`, a URL or a filesystem path.
    ///
    /// Returns the hash of the rewritten root playlist, stored in the sink
    /// as `<hash>.m3u8`.
    pub async fn convert(&self, input: &str, sink: &dyn Sink) -> Result<ContentHash, ConvertError> {
        let root = Locator::parse(input)?;
        self.convert_locator(&root, sink).await
    }

    pub async fn convert_locator(
        &self,
        root: &Locator,
        sink: &dyn Sink,
    ) -> Result<ContentHash, ConvertError> {
        let source = self.source_for(root.kind());
        info!("Converting {} playlist tree at {}", root.kind(), root);

        let hash = self.convert_playlist(source, sink, root.clone(), 0).await?;

        info!(
            "Converted {} to {}",
            root,
            hash.file_name(ArtifactKind::Playlist)
        );
        Ok(hash)
    }

    fn convert_playlist<'a>(
        &'a self,
        source: &'a dyn SourceReader,
        sink: &'a dyn Sink,
        locator: Locator,
        depth: usize,
    ) -> BoxFuture<'a, Result<ContentHash, ConvertError>> {
        async move {
            if depth > self.config.max_depth {
                return Err(ConvertError::RecursionLimit {
                    locator: locator.to_string(),
                    depth: self.config.max_depth,
                });
            }

            let base = locator.directory()?;
            let raw = read_bytes(source, &locator).await?;
            let text = String::from_utf8(raw.to_vec()).map_err(|e| ConvertError::Parse {
                locator: locator.to_string(),
                source: ManifestError::Utf8(e),
            })?;
            let manifest = Manifest::parse(&text).map_err(|source| ConvertError::Parse {
                locator: locator.to_string(),
                source,
            })?;

            self.emit(ConvertEvent::PlaylistStarted {
                locator: locator.to_string(),
                depth,
                variants: manifest.playlists.len(),
                segments: manifest.segments.len(),
            });
            for uri in &manifest.untracked {
                warn!("{} references {} which is left unchanged", locator, uri);
            }

            let renames = if manifest.is_empty() {
                debug!("{} references nothing, storing as is", locator);
                HashMap::new()
            } else if manifest.is_master() {
                self.convert_variants(source, sink, &base, &manifest.playlists, depth)
                    .await?
            } else {
                self.convert_segments(source, sink, &base, &manifest.segments)
                    .await?
            };

            let updated = rewrite_references(&text, &renames);
            let hash = hash_bytes(&updated);
            let file_name = hash.file_name(ArtifactKind::Playlist);
            let bytes = updated.len() as u64;

            write_artifact(sink, &file_name, Bytes::from(updated)).await?;
            self.emit(ConvertEvent::PlaylistStored {
                locator: locator.to_string(),
                depth,
                file_name,
                bytes,
            });

            Ok(hash)
        }
        .boxed()
    }

    async fn convert_variants(
        &self,
        source: &dyn SourceReader,
        sink: &dyn Sink,
        base: &Locator,
        variants: &[VariantRef],
        depth: usize,
    ) -> Result<HashMap<String, String>, ConvertError> {
        let total = variants.len();
        info!("Found {} variant playlists", total);

        let mut renames = HashMap::with_capacity(total);
        for (index, variant) in variants.iter().enumerate() {
            let reference = variant.uri.trim();
            if renames.contains_key(reference) {
                debug!("{} already converted", reference);
                continue;
            }

            let child = base.resolve(reference)?;
            let label = variant.label(index);
            info!("Processing variant {}/{}: {}", index + 1, total, label);
            self.emit(ConvertEvent::VariantStarted {
                index: index + 1,
                total,
                label,
                locator: child.to_string(),
            });

            let child_hash = self
                .convert_playlist(source, sink, child, depth + 1)
                .await?;
            let file_name = child_hash.file_name(ArtifactKind::Playlist);
            debug!("Renamed playlist {} to {}", reference, file_name);
            renames.insert(reference.to_string(), file_name);
        }

        Ok(renames)
    }

    async fn convert_segments(
        &self,
        source: &dyn SourceReader,
        sink: &dyn Sink,
        base: &Locator,
        segments: &[SegmentRef],
    ) -> Result<HashMap<String, String>, ConvertError> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = segments
            .iter()
            .map(|s| s.uri.trim())
            .filter(|uri| seen.insert(*uri))
            .collect();
        let total = unique.len();
        info!("Found {} segments ({} unique)", segments.len(), total);

        let jobs = unique
            .into_iter()
            .map(|uri| base.resolve(uri).map(|locator| (uri.to_string(), locator)))
            .collect::<Result<Vec<_>, _>>()?;

        // Set by the first failing segment. `buffered` may start another
        // job before it yields an error that already completed; such a job
        // must not read or write anything.
        let failed = AtomicBool::new(false);
        let failed = &failed;

        let concurrency = self.config.segment_concurrency.max(1);
        let renamed: Vec<Option<(String, String)>> = stream::iter(jobs.into_iter().enumerate())
            .map(|(index, (uri, locator))| async move {
                if failed.load(Ordering::Acquire) {
                    return Ok(None);
                }

                let stored = async {
                    let data = read_bytes(source, &locator).await?;
                    let file_name = hash_bytes(&data).file_name(ArtifactKind::Segment);
                    let bytes = data.len() as u64;
                    write_artifact(sink, &file_name, data).await?;
                    Ok::<_, ConvertError>((file_name, bytes))
                }
                .await;
                let (file_name, bytes) = stored.inspect_err(|_| failed.store(true, Ordering::Release))?;

                debug!(
                    "Renamed segment {}/{}: {} to {}",
                    index + 1,
                    total,
                    locator,
                    file_name
                );
                self.emit(ConvertEvent::SegmentStored {
                    index: index + 1,
                    total,
                    source: locator.to_string(),
                    file_name: file_name.clone(),
                    bytes,
                });

                Ok::<_, ConvertError>(Some((uri, file_name)))
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        Ok(renamed.into_iter().flatten().collect())
    }
}

async fn write_artifact(sink: &dyn Sink, file_name: &str, content: Bytes) -> Result<(), ConvertError> {
    sink.write(file_name, content)
        .await
        .map_err(|source| ConvertError::Write {
            path: file_name.to_string(),
            source,
        })
}
