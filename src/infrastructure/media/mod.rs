//! Media tool adapters

mod ffmpeg;

pub use ffmpeg::FfmpegTool;
