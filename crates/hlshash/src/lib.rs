//! # hlshash
//!
//! Rewrites an HLS playlist tree into a content-addressed mirror: every
//! media segment and sub-playlist is renamed to the SHA-256 of its bytes
//! and every reference inside the playlists is rewritten to match.
//!
//! ## Features
//!
//! - Reads playlist trees from local directories or HTTP(S) origins
//! - Master, media, I-frame and rendition playlists
//! - Pluggable sinks (local directory, in-memory, HTTP PUT)
//! - Bounded segment concurrency with deterministic rewriting

pub mod builder;
pub mod client;
pub mod config;
pub mod converter;
pub mod error;
pub mod events;
pub mod hash;
pub mod locator;
pub mod manifest;
pub mod proxy;
pub mod rewrite;
pub mod sink;
pub mod source;

pub use builder::ConverterConfigBuilder;
pub use client::create_client;
pub use config::ConverterConfig;
pub use converter::PlaylistConverter;
pub use error::{ConvertError, ReadError};
pub use events::{ConvertEvent, OnEvent};
pub use hash::{ArtifactKind, ContentHash, hash_bytes};
pub use locator::{Locator, LocatorKind};
pub use manifest::{Manifest, ManifestError, SegmentRef, VariantKind, VariantRef};
pub use proxy::{ProxyAuth, ProxyConfig, ProxyType};
pub use sink::{DirectorySink, HttpPutSink, MemorySink, Sink, SinkError};
pub use source::{FileSource, HttpSource, SourceReader};
