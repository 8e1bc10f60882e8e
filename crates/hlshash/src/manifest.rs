//! # Playlist manifests
//!
//! Reduces an `m3u8-rs` parse result to the references the converter
//! rewrites: sub-playlists of a master playlist, or segments of a media
//! playlist.

use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist, QuotedOrUnquoted, parse_playlist_res};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Playlist is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Malformed playlist: {0}")]
    Syntax(String),
}

/// The references of one playlist document, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub segments: Vec<SegmentRef>,
    pub playlists: Vec<VariantRef>,
    /// URIs the converter leaves untouched (encryption keys, init maps)
    pub untracked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// `#EXT-X-STREAM-INF`, URI on the following line
    Stream,
    /// `#EXT-X-I-FRAME-STREAM-INF`, URI in the tag attributes
    IFrame,
    /// `#EXT-X-MEDIA` with a `URI` attribute
    Rendition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRef {
    pub uri: String,
    pub kind: VariantKind,
    pub name: Option<String>,
    pub resolution: Option<(u64, u64)>,
}

impl VariantRef {
    /// Human readable label: `NAME`, else `<width>x<height>`, else
    /// `variant<index>`
    pub fn label(&self, index: usize) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if let Some((width, height)) = self.resolution {
            return format!("{width}x{height}");
        }
        format!("variant{index}")
    }
}

fn attribute_str(value: &QuotedOrUnquoted) -> &str {
    match value {
        QuotedOrUnquoted::Quoted(s) | QuotedOrUnquoted::Unquoted(s) => s.as_str(),
    }
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        match parse_playlist_res(text.as_bytes()) {
            Ok(Playlist::MasterPlaylist(pl)) => Ok(Self::from_master(&pl)),
            Ok(Playlist::MediaPlaylist(pl)) => Ok(Self::from_media(&pl)),
            Err(e) => Err(ManifestError::Syntax(e.to_string())),
        }
    }

    fn from_master(pl: &MasterPlaylist) -> Self {
        let mut playlists: Vec<VariantRef> = pl
            .variants
            .iter()
            .map(|v| VariantRef {
                uri: v.uri.clone(),
                kind: if v.is_i_frame {
                    VariantKind::IFrame
                } else {
                    VariantKind::Stream
                },
                name: v
                    .other_attributes
                    .as_ref()
                    .and_then(|attrs| attrs.get("NAME"))
                    .map(|value| attribute_str(value).to_string()),
                resolution: v.resolution.map(|r| (r.width, r.height)),
            })
            .collect();

        playlists.extend(pl.alternatives.iter().filter_map(|alt| {
            alt.uri.as_ref().map(|uri| VariantRef {
                uri: uri.clone(),
                kind: VariantKind::Rendition,
                name: Some(alt.name.clone()),
                resolution: None,
            })
        }));

        Self {
            segments: Vec::new(),
            playlists,
            untracked: Vec::new(),
        }
    }

    fn from_media(pl: &MediaPlaylist) -> Self {
        let mut untracked = Vec::new();
        let segments = pl
            .segments
            .iter()
            .map(|segment| {
                if let Some(uri) = segment.key.as_ref().and_then(|k| k.uri.as_ref()) {
                    untracked.push(uri.clone());
                }
                if let Some(map) = &segment.map {
                    untracked.push(map.uri.clone());
                }
                SegmentRef {
                    uri: segment.uri.clone(),
                }
            })
            .collect();
        untracked.dedup();

        Self {
            segments,
            playlists: Vec::new(),
            untracked,
        }
    }

    pub fn is_master(&self) -> bool {
        !self.playlists.is_empty()
    }

    pub fn is_media(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Neither sub-playlists nor segments
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty() && self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-STREAM-INF:BANDWIDTH=5500000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\"
stream_0/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=3100000,RESOLUTION=1280x720,CODECS=\"avc1.64001f,mp4a.40.2\"
stream_1/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1600000,CODECS=\"avc1.64001e,mp4a.40.2\"
stream_2/playlist.m3u8
";

    const MEDIA: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:10.000000,
data000.ts
#EXTINF:10.000000,
data001.ts
#EXTINF:4.200000,
data002.ts
#EXT-X-ENDLIST
";

    #[test]
    fn test_parse_master() {
        let manifest = Manifest::parse(MASTER).unwrap();
        assert!(manifest.is_master());
        assert!(!manifest.is_media());
        assert!(manifest.segments.is_empty());

        let uris: Vec<&str> = manifest.playlists.iter().map(|p| p.uri.as_str()).collect();
        assert_eq!(
            uris,
            ["stream_0/playlist.m3u8", "stream_1/playlist.m3u8", "stream_2/playlist.m3u8"]
        );
        assert!(manifest.playlists.iter().all(|p| p.kind == VariantKind::Stream));
    }

    #[test]
    fn test_variant_labels() {
        let manifest = Manifest::parse(MASTER).unwrap();
        let labels: Vec<String> = manifest
            .playlists
            .iter()
            .enumerate()
            .map(|(i, p)| p.label(i))
            .collect();
        assert_eq!(labels, ["1920x1080", "1280x720", "variant2"]);
    }

    #[test]
    fn test_name_attribute_wins_over_resolution() {
        let text = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,NAME=\"low\"
low/index.m3u8
";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(manifest.playlists[0].name.as_deref(), Some("low"));
        assert_eq!(manifest.playlists[0].label(0), "low");
    }

    #[test]
    fn test_renditions_and_iframes() {
        let text = "#EXTM3U
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aud\",NAME=\"English\",DEFAULT=YES,URI=\"audio/en.m3u8\"
#EXT-X-MEDIA:TYPE=CLOSED-CAPTIONS,GROUP-ID=\"cc\",NAME=\"CC1\",INSTREAM-ID=\"CC1\"
#EXT-X-STREAM-INF:BANDWIDTH=2000000,AUDIO=\"aud\"
video/main.m3u8
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=200000,URI=\"video/iframe.m3u8\"
";
        let manifest = Manifest::parse(text).unwrap();
        let found: Vec<(&str, VariantKind)> = manifest
            .playlists
            .iter()
            .map(|p| (p.uri.as_str(), p.kind))
            .collect();

        assert!(found.contains(&("video/main.m3u8", VariantKind::Stream)));
        assert!(found.contains(&("video/iframe.m3u8", VariantKind::IFrame)));
        assert!(found.contains(&("audio/en.m3u8", VariantKind::Rendition)));
        // Renditions without a URI are not playlists
        assert_eq!(manifest.playlists.len(), 3);

        let rendition = manifest
            .playlists
            .iter()
            .find(|p| p.kind == VariantKind::Rendition)
            .unwrap();
        assert_eq!(rendition.label(7), "English");
    }

    #[test]
    fn test_parse_media() {
        let manifest = Manifest::parse(MEDIA).unwrap();
        assert!(manifest.is_media());
        assert!(!manifest.is_master());
        let uris: Vec<&str> = manifest.segments.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, ["data000.ts", "data001.ts", "data002.ts"]);
        assert!(manifest.untracked.is_empty());
    }

    #[test]
    fn test_key_uris_are_untracked() {
        let text = "#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\"
#EXTINF:10.0,
a.ts
#EXTINF:10.0,
b.ts
#EXT-X-ENDLIST
";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(manifest.segments.len(), 2);
        assert!(manifest.untracked.contains(&"key.bin".to_string()));
    }

    #[test]
    fn test_empty_media_playlist() {
        let manifest = Manifest::parse("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-ENDLIST\n").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = Manifest::parse("this is not a playlist\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax(_)));
    }
}
