//! Configuration domain types

mod app_config;

pub use app_config::{
    AppConfig, EncodingConfig, DEFAULT_FFMPEG, DEFAULT_OUTPUT_DIR, DEFAULT_PROBE_PAUSE_MS,
};
