//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod artifact_store;
pub mod config;
pub mod media_tool;

// Re-export common types
pub use artifact_store::{ArtifactStore, StoreError};
pub use config::ConfigStore;
pub use media_tool::{CaptureRequest, MediaTool, ProbeRequest, ToolError};
