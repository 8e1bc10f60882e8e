//! # Locators
//!
//! A playlist tree is addressed either through URLs or through filesystem
//! paths. The kind is decided once for the root input and every locator
//! resolved from it keeps that kind.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::ConvertError;

/// Where a playlist or segment lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Network(Url),
    Filesystem(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    Network,
    Filesystem,
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorKind::Network => write!(f, "network"),
            LocatorKind::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// Returns `true` if the input names a network resource
pub fn is_network_input(input: &str) -> bool {
    let lower = input.trim_start().get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl Locator {
    /// Classify and parse a root input
    pub fn parse(input: &str) -> Result<Self, ConvertError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConvertError::InvalidLocator("empty input".to_string()));
        }

        if is_network_input(input) {
            Url::parse(input)
                .map(Locator::Network)
                .map_err(|e| ConvertError::InvalidLocator(format!("{input}: {e}")))
        } else {
            Ok(Locator::Filesystem(PathBuf::from(input)))
        }
    }

    pub fn kind(&self) -> LocatorKind {
        match self {
            Locator::Network(_) => LocatorKind::Network,
            Locator::Filesystem(_) => LocatorKind::Filesystem,
        }
    }

    /// The directory containing this locator, used as the base for the
    /// relative references found inside the playlist it names.
    pub fn directory(&self) -> Result<Locator, ConvertError> {
        match self {
            Locator::Network(url) => {
                url.join(".")
                    .map(Locator::Network)
                    .map_err(|e| ConvertError::Resolve {
                        base: url.to_string(),
                        reference: ".".to_string(),
                        message: e.to_string(),
                    })
            }
            Locator::Filesystem(path) => {
                let parent = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Ok(Locator::Filesystem(parent))
            }
        }
    }

    /// Resolve a reference found in a playlist against this directory
    pub fn resolve(&self, reference: &str) -> Result<Locator, ConvertError> {
        if reference.trim().is_empty() {
            return Err(ConvertError::Resolve {
                base: self.to_string(),
                reference: reference.to_string(),
                message: "empty reference".to_string(),
            });
        }

        match self {
            Locator::Network(base) => {
                base.join(reference)
                    .map(Locator::Network)
                    .map_err(|e| ConvertError::Resolve {
                        base: base.to_string(),
                        reference: reference.to_string(),
                        message: e.to_string(),
                    })
            }
            Locator::Filesystem(base) => {
                Ok(Locator::Filesystem(normalize_path(&base.join(reference))))
            }
        }
    }
}

/// Lexically collapse `.` and `..` components, the way path joining does
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Network(url) => write!(f, "{url}"),
            Locator::Filesystem(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Locator {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locator::parse(s)
    }
}

impl From<Url> for Locator {
    fn from(url: Url) -> Self {
        Locator::Network(url)
    }
}

impl From<PathBuf> for Locator {
    fn from(path: PathBuf) -> Self {
        Locator::Filesystem(path)
    }
}

impl From<&Path> for Locator {
    fn from(path: &Path) -> Self {
        Locator::Filesystem(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        let net = Locator::parse("https://cdn.example.com/vod/master.m3u8").unwrap();
        assert_eq!(net.kind(), LocatorKind::Network);

        let upper = Locator::parse("HTTP://cdn.example.com/master.m3u8").unwrap();
        assert_eq!(upper.kind(), LocatorKind::Network);

        let local = Locator::parse("output/master.m3u8").unwrap();
        assert_eq!(local.kind(), LocatorKind::Filesystem);

        // Looks like a scheme but is a relative file name
        let odd = Locator::parse("httpdocs/master.m3u8").unwrap();
        assert_eq!(odd.kind(), LocatorKind::Filesystem);

        assert!(Locator::parse("  ").is_err());
        assert!(Locator::parse("http://").is_err());
    }

    #[test]
    fn test_network_directory_drops_file_and_query() {
        let loc = Locator::parse("https://cdn.example.com/vod/master.m3u8?token=abc").unwrap();
        let dir = loc.directory().unwrap();
        assert_eq!(dir.to_string(), "https://cdn.example.com/vod/");

        let root = Locator::parse("https://cdn.example.com").unwrap();
        assert_eq!(root.directory().unwrap().to_string(), "https://cdn.example.com/");
    }

    #[test]
    fn test_network_resolve() {
        let dir = Locator::parse("https://cdn.example.com/vod/master.m3u8")
            .unwrap()
            .directory()
            .unwrap();

        let child = dir.resolve("stream_0/playlist.m3u8").unwrap();
        assert_eq!(
            child.to_string(),
            "https://cdn.example.com/vod/stream_0/playlist.m3u8"
        );
        assert_eq!(child.kind(), LocatorKind::Network);

        let seg = child.directory().unwrap().resolve("../shared/data000.ts").unwrap();
        assert_eq!(seg.to_string(), "https://cdn.example.com/vod/shared/data000.ts");

        let absolute = dir.resolve("https://other.example.com/a.ts").unwrap();
        assert_eq!(absolute.to_string(), "https://other.example.com/a.ts");

        assert!(dir.resolve("").is_err());
    }

    #[test]
    fn test_filesystem_directory() {
        let loc = Locator::parse("master.m3u8").unwrap();
        assert_eq!(loc.directory().unwrap(), Locator::Filesystem(PathBuf::from(".")));

        let nested = Locator::parse("out/stream_1/playlist.m3u8").unwrap();
        assert_eq!(
            nested.directory().unwrap(),
            Locator::Filesystem(PathBuf::from("out/stream_1"))
        );
    }

    #[test]
    fn test_filesystem_resolve_normalizes() {
        let dir = Locator::Filesystem(PathBuf::from("."));
        assert_eq!(
            dir.resolve("stream_0/playlist.m3u8").unwrap(),
            Locator::Filesystem(PathBuf::from("stream_0/playlist.m3u8"))
        );

        let dir = Locator::Filesystem(PathBuf::from("out/stream_1"));
        assert_eq!(
            dir.resolve("./data001.ts").unwrap(),
            Locator::Filesystem(PathBuf::from("out/stream_1/data001.ts"))
        );
        assert_eq!(
            dir.resolve("../../shared/data001.ts").unwrap(),
            Locator::Filesystem(PathBuf::from("shared/data001.ts"))
        );
        assert_eq!(
            dir.resolve("../../../up.ts").unwrap(),
            Locator::Filesystem(PathBuf::from("../up.ts"))
        );

        let rooted = Locator::Filesystem(PathBuf::from("/"));
        assert_eq!(
            rooted.resolve("../a.ts").unwrap(),
            Locator::Filesystem(PathBuf::from("/a.ts"))
        );
    }
}
