//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: the ffmpeg
//! subprocess, the local filesystem and the XDG config file.

pub mod config;
pub mod media;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use media::FfmpegTool;
pub use storage::FsArtifactStore;
