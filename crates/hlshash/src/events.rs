use std::sync::Arc;

/// Progress notifications emitted while a tree is converted.
///
/// Indices are 1-based for display.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    /// A playlist was read and parsed
    PlaylistStarted {
        locator: String,
        depth: usize,
        variants: usize,
        segments: usize,
    },
    /// Recursion into a sub-playlist begins
    VariantStarted {
        index: usize,
        total: usize,
        label: String,
        locator: String,
    },
    /// A segment artifact was committed to the sink
    SegmentStored {
        index: usize,
        total: usize,
        source: String,
        file_name: String,
        bytes: u64,
    },
    /// A rewritten playlist was committed to the sink
    PlaylistStored {
        locator: String,
        depth: usize,
        file_name: String,
        bytes: u64,
    },
}

/// A callback for conversion events.
pub type OnEvent = Arc<dyn Fn(ConvertEvent) + Send + Sync>;
