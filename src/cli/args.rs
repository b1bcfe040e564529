//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::StreamSelection;
use crate::domain::recording::Duration;

/// stream-capture - record a live audio stream with endpoint fallback
#[derive(Parser, Debug)]
#[command(name = "stream-capture")]
#[command(version)]
#[command(about = "Record a live audio stream to a timestamped file, falling back across candidate endpoints")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording duration (e.g., 30s, 5m, 1h30m)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Directory for recordings and diagnostic reports
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Preferred stream URL (overrides STREAM_URL)
    #[arg(short = 'u', long, value_name = "URL")]
    pub stream_url: Option<String>,

    /// Candidate URL to probe, in priority order (repeatable; replaces the built-in list)
    #[arg(short = 'c', long = "candidate", value_name = "URL")]
    pub candidates: Vec<String>,

    /// Record the stream URL directly without probing
    #[arg(long)]
    pub single: bool,

    /// Bound on each probe (e.g., 10s)
    #[arg(long, value_name = "TIME")]
    pub probe_timeout: Option<String>,

    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<String>,

    /// Print the session outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when no recording was produced
    #[arg(long)]
    pub strict_exit: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the candidate list and print the first working endpoint
    Probe,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value (comma-separated for `candidates`)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed options for a recording run
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub selection: StreamSelection,
    pub output_dir: PathBuf,
    pub duration: Duration,
    pub json: bool,
    pub strict_exit: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "stream_url",
    "candidates",
    "output_dir",
    "file_prefix",
    "duration",
    "probe_timeout",
    "probe_pause_ms",
    "fallback_count",
    "user_agent",
    "ffmpeg_path",
    "encoding.codec",
    "encoding.bitrate",
    "encoding.sample_rate",
    "encoding.channels",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
