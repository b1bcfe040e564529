//! Local filesystem artifact store

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ArtifactStore, StoreError};

/// Artifact store backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactStore;

impl FsArtifactStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::CreateDir {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })
    }

    async fn remove_file(&self, path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Remove {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    async fn file_size(&self, path: &Path) -> Option<u64> {
        fs::metadata(path)
            .await
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len())
    }

    async fn write_text(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        fs::write(path, contents)
            .await
            .map_err(|e| StoreError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
