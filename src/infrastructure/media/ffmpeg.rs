//! FFmpeg-based media tool adapter

use std::process::Stdio;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{CaptureRequest, MediaTool, ProbeRequest, ToolError};
use crate::domain::config::DEFAULT_FFMPEG;

/// Runs `ffmpeg` as a subprocess for probes and captures
pub struct FfmpegTool {
    binary: String,
}

impl FfmpegTool {
    /// Use `ffmpeg` from PATH
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_FFMPEG)
    }

    /// Use a specific ffmpeg binary
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn base_args() -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
        ]
    }

    /// Decode one second into the null muxer
    fn build_probe_args(request: &ProbeRequest) -> Vec<String> {
        let mut args = Self::base_args();

        if let Some(ref header) = request.header {
            args.push("-headers".to_string());
            args.push(header.to_header_line());
        }

        args.extend([
            "-i".to_string(),
            request.endpoint.to_string(),
            "-t".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "null".to_string(),
            "-".to_string(),
        ]);

        args
    }

    fn build_capture_args(request: &CaptureRequest) -> Vec<String> {
        let mut args = Self::base_args();
        let enc = &request.encoding;

        args.extend([
            "-headers".to_string(),
            request.header.to_header_line(),
            // Regenerate missing timestamps, drop corrupt packets
            "-fflags".to_string(),
            "+genpts+discardcorrupt".to_string(),
            "-i".to_string(),
            request.endpoint.to_string(),
            "-t".to_string(),
            request.duration.as_secs().max(1).to_string(),
            "-vn".to_string(),
            "-c:a".to_string(),
            enc.codec.clone(),
            "-b:a".to_string(),
            enc.bitrate.clone(),
            "-ar".to_string(),
            enc.sample_rate.to_string(),
            "-ac".to_string(),
            enc.channels.to_string(),
            "-avoid_negative_ts".to_string(),
            "make_zero".to_string(),
            "-y".to_string(), // Overwrite output
            request.output.to_string_lossy().to_string(),
        ]);

        args
    }

    /// Spawn ffmpeg and wait for it under `timeout`.
    ///
    /// On timeout the child is dropped, which kills it (`kill_on_drop`).
    async fn run(&self, args: Vec<String>, timeout: StdDuration) -> Result<(), ToolError> {
        debug!(binary = %self.binary, ?args, "spawning media tool");

        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ToolError::NotFound(self.binary.clone())
                } else {
                    ToolError::Spawn(e.to_string())
                }
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => return Err(ToolError::Timeout(timeout)),
            Ok(result) => result.map_err(|e| ToolError::Spawn(e.to_string()))?,
        };

        if output.status.success() {
            return Ok(());
        }

        Err(ToolError::NonZeroExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe(&self, request: &ProbeRequest) -> Result<(), ToolError> {
        self.run(Self::build_probe_args(request), request.timeout)
            .await
    }

    async fn capture(&self, request: &CaptureRequest) -> Result<(), ToolError> {
        self.run(Self::build_capture_args(request), request.timeout)
            .await
    }
}
