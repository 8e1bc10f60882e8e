//! # Content hashing
//!
//! Every artifact is identified by the lowercase hex SHA-256 of its bytes.
//! A parent playlist learns a child's final file name by hashing the same
//! bytes the child writes, so the digest must stay deterministic.

use std::fmt;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the artifact with this hash, e.g. `<hash>.ts`
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        format!("{}.{}", self.0, kind.extension())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The two kinds of artifact ever persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Playlist,
    Segment,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Playlist => "m3u8",
            ArtifactKind::Segment => "ts",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Playlist => "application/vnd.apple.mpegurl",
            ArtifactKind::Segment => "video/mp2t",
        }
    }

    /// Guess the artifact kind from a file name's extension
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext {
            "m3u8" => Some(ArtifactKind::Playlist),
            "ts" => Some(ArtifactKind::Segment),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Playlist => write!(f, "playlist"),
            ArtifactKind::Segment => write!(f, "segment"),
        }
    }
}

/// Compute the content hash of a byte sequence
pub fn hash_bytes(data: impl AsRef<[u8]>) -> ContentHash {
    let digest = Sha256::digest(data.as_ref());
    ContentHash(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_bytes(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_bytes("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        let data = vec![0x47u8; 188 * 7];
        assert_eq!(hash_bytes(&data), hash_bytes(data.clone()));
        assert_ne!(hash_bytes(&data), hash_bytes(&data[1..]));
    }

    #[test]
    fn test_file_names() {
        let hash = hash_bytes("abc");
        assert_eq!(
            hash.file_name(ArtifactKind::Segment),
            format!("{hash}.ts")
        );
        assert_eq!(
            hash.file_name(ArtifactKind::Playlist),
            format!("{hash}.m3u8")
        );
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ArtifactKind::from_path("abc.m3u8"), Some(ArtifactKind::Playlist));
        assert_eq!(ArtifactKind::from_path("dir/abc.ts"), Some(ArtifactKind::Segment));
        assert_eq!(ArtifactKind::from_path("abc.mp4"), None);
        assert_eq!(ArtifactKind::from_path("abc"), None);
    }
}
