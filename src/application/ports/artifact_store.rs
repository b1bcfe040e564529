//! Artifact storage port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Artifact storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to create directory {}: {message}", .path.display())]
    CreateDir { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to remove {}: {message}", .path.display())]
    Remove { path: PathBuf, message: String },
}

/// Port for the output directory
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create `dir` and its parents if missing
    async fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError>;

    /// Remove a file; a missing file is not an error
    async fn remove_file(&self, path: &Path) -> Result<(), StoreError>;

    /// Size in bytes, or `None` when the file does not exist
    async fn file_size(&self, path: &Path) -> Option<u64>;

    /// Write a text file, replacing any existing one
    async fn write_text(&self, path: &Path, contents: &str) -> Result<(), StoreError>;
}
