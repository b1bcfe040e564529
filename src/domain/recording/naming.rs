//! Artifact file naming

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// strftime pattern used in every artifact name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default file name prefix for artifacts
pub const DEFAULT_PREFIX: &str = "eu_stream";

/// Builds the timestamped names of the audio file and the diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    prefix: String,
    extension: String,
}

impl ArtifactNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.<ext>`
    pub fn audio_path(&self, dir: &Path, at: DateTime<Utc>) -> PathBuf {
        dir.join(format!(
            "{}_{}.{}",
            self.prefix,
            at.format(TIMESTAMP_FORMAT),
            self.extension
        ))
    }

    /// `<dir>/<prefix>_failed_<YYYYmmdd_HHMMSS>.txt`
    pub fn report_path(&self, dir: &Path, at: DateTime<Utc>) -> PathBuf {
        dir.join(format!(
            "{}_failed_{}.txt",
            self.prefix,
            at.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Whether `file_name` looks like an audio artifact produced by this naming
    pub fn matches_audio(&self, file_name: &str) -> bool {
        let Some(rest) = file_name.strip_prefix(&format!("{}_", self.prefix)) else {
            return false;
        };
        let Some(stamp) = rest.strip_suffix(&format!(".{}", self.extension)) else {
            return false;
        };
        is_timestamp(stamp)
    }
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, "mp3")
    }
}

fn is_timestamp(stamp: &str) -> bool {
    let bytes = stamp.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'_'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}
