//! Recording outcome value object

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Result of one recording invocation.
///
/// `success` is only set when the tool exited cleanly *and* the output file
/// exists afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingOutcome {
    pub success: bool,
    pub path: PathBuf,
    pub size_bytes: Option<u64>,
    pub error: Option<String>,
}

impl RecordingOutcome {
    pub fn succeeded(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            success: true,
            path: path.into(),
            size_bytes: Some(size_bytes),
            error: None,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, size_bytes: Option<u64>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.into(),
            size_bytes,
            error: Some(error.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Human-readable size, if the file exists
    pub fn human_readable_size(&self) -> Option<String> {
        self.size_bytes.map(human_readable_size)
    }
}

/// Format a byte count as B / KB / MB
fn human_readable_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
