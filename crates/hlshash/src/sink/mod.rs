//! # Sinks
//!
//! Where converted artifacts are committed. The converter only ever calls
//! [`Sink::write`] with a bare `<hash>.<ext>` file name.

pub use self::directory::DirectorySink;
pub use self::http::HttpPutSink;
pub use self::memory::MemorySink;
pub use self::provider::{Sink, SinkError};

// Sink interface
pub mod provider;

// Individual sink implementations
pub mod directory;
pub mod http;
pub mod memory;
