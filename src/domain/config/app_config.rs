//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::EndpointParseError;
use crate::domain::recording::{ArtifactNaming, Duration, DEFAULT_PREFIX};
use crate::domain::stream::{
    AudioEncoding, CandidateList, ClientHeader, StreamEndpoint, DEFAULT_FALLBACK_COUNT,
    DEFAULT_STREAM_URL, DEFAULT_USER_AGENT,
};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "recordings";

/// Default pause between probes
pub const DEFAULT_PROBE_PAUSE_MS: u64 = 1000;

/// Default media tool binary
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Output encoding section (`[encoding]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub codec: Option<String>,
    pub bitrate: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub stream_url: Option<String>,
    pub candidates: Option<Vec<String>>,
    pub output_dir: Option<String>,
    pub file_prefix: Option<String>,
    pub duration: Option<String>,
    pub probe_timeout: Option<String>,
    pub probe_pause_ms: Option<u64>,
    pub fallback_count: Option<usize>,
    pub user_agent: Option<String>,
    pub ffmpeg_path: Option<String>,
    pub encoding: Option<EncodingConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        let encoding = AudioEncoding::default();
        Self {
            stream_url: None,
            candidates: None,
            output_dir: Some(DEFAULT_OUTPUT_DIR.to_string()),
            file_prefix: Some(DEFAULT_PREFIX.to_string()),
            duration: Some(Duration::default_duration().to_string()),
            probe_timeout: Some(Duration::default_probe_timeout().to_string()),
            probe_pause_ms: Some(DEFAULT_PROBE_PAUSE_MS),
            fallback_count: Some(DEFAULT_FALLBACK_COUNT),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            ffmpeg_path: Some(DEFAULT_FFMPEG.to_string()),
            encoding: Some(EncodingConfig {
                codec: Some(encoding.codec),
                bitrate: Some(encoding.bitrate),
                sample_rate: Some(encoding.sample_rate),
                channels: Some(encoding.channels),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            stream_url: other.stream_url.or(self.stream_url),
            candidates: other.candidates.or(self.candidates),
            output_dir: other.output_dir.or(self.output_dir),
            file_prefix: other.file_prefix.or(self.file_prefix),
            duration: other.duration.or(self.duration),
            probe_timeout: other.probe_timeout.or(self.probe_timeout),
            probe_pause_ms: other.probe_pause_ms.or(self.probe_pause_ms),
            fallback_count: other.fallback_count.or(self.fallback_count),
            user_agent: other.user_agent.or(self.user_agent),
            ffmpeg_path: other.ffmpeg_path.or(self.ffmpeg_path),
            encoding: Self::merge_encoding(self.encoding, other.encoding),
        }
    }

    fn merge_encoding(
        base: Option<EncodingConfig>,
        other: Option<EncodingConfig>,
    ) -> Option<EncodingConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(EncodingConfig {
                codec: o.codec.or(b.codec),
                bitrate: o.bitrate.or(b.bitrate),
                sample_rate: o.sample_rate.or(b.sample_rate),
                channels: o.channels.or(b.channels),
            }),
        }
    }

    pub fn probe_pause_or_default(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.probe_pause_ms.unwrap_or(DEFAULT_PROBE_PAUSE_MS))
    }

    pub fn fallback_count_or_default(&self) -> usize {
        self.fallback_count.unwrap_or(DEFAULT_FALLBACK_COUNT)
    }

    pub fn output_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    pub fn ffmpeg_path_or_default(&self) -> &str {
        self.ffmpeg_path.as_deref().unwrap_or(DEFAULT_FFMPEG)
    }

    pub fn header_or_default(&self) -> ClientHeader {
        ClientHeader::user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
    }

    pub fn encoding_or_default(&self) -> AudioEncoding {
        let defaults = AudioEncoding::default();
        let Some(ref enc) = self.encoding else {
            return defaults;
        };
        AudioEncoding {
            codec: enc.codec.clone().unwrap_or(defaults.codec),
            bitrate: enc.bitrate.clone().unwrap_or(defaults.bitrate),
            sample_rate: enc.sample_rate.unwrap_or(defaults.sample_rate),
            channels: enc.channels.unwrap_or(defaults.channels),
        }
    }

    /// Artifact naming derived from prefix and codec
    pub fn naming_or_default(&self) -> ArtifactNaming {
        ArtifactNaming::new(
            self.file_prefix.as_deref().unwrap_or(DEFAULT_PREFIX),
            self.encoding_or_default().extension(),
        )
    }

    /// The single endpoint used in direct mode
    pub fn stream_url(&self) -> Result<StreamEndpoint, EndpointParseError> {
        self.stream_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_STREAM_URL)
            .parse()
    }

    /// Candidate list for probing. A usable `stream_url` goes first; an
    /// unusable one is left out, and [`AppConfig::stream_url`] reports it.
    pub fn candidate_list(&self) -> Result<CandidateList, EndpointParseError> {
        let list = match self.candidates.as_deref() {
            Some(urls) => CandidateList::parse(urls)?.unwrap_or_default(),
            None => CandidateList::builtin(),
        };

        match self.stream_url.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(url) => match url.parse() {
                Ok(endpoint) => Ok(list.with_preferred(endpoint)),
                Err(_) => Ok(list),
            },
            None => Ok(list),
        }
    }
}
