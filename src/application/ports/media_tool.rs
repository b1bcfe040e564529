//! Media tool port interface

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Duration;
use crate::domain::stream::{AudioEncoding, ClientHeader, StreamEndpoint};

/// Why a media tool invocation did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(StdDuration),

    #[error("{}", describe_exit(.code, .stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("media tool '{0}' not found")]
    NotFound(String),

    #[error("failed to run media tool: {0}")]
    Spawn(String),
}

impl ToolError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

fn describe_exit(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(c) => format!("exited with status {}", c),
        None => "terminated by signal".to_string(),
    };
    match stderr.trim() {
        "" => status,
        text => format!("{}: {}", status, text),
    }
}

/// A one-second reachability decode of an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub endpoint: StreamEndpoint,
    /// `None` for the degraded, header-less pass
    pub header: Option<ClientHeader>,
    pub timeout: StdDuration,
}

/// A bounded capture of an endpoint into a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub endpoint: StreamEndpoint,
    pub header: ClientHeader,
    pub output: PathBuf,
    pub duration: Duration,
    pub encoding: AudioEncoding,
    pub timeout: StdDuration,
}

/// Port for the external decoder/encoder
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Decode one second of the endpoint into a null sink.
    ///
    /// `Ok(())` only when the tool exits successfully within the timeout.
    async fn probe(&self, request: &ProbeRequest) -> Result<(), ToolError>;

    /// Capture the endpoint into `request.output`.
    ///
    /// `Ok(())` means the tool exited successfully; it says nothing about
    /// whether the output file exists.
    async fn capture(&self, request: &CaptureRequest) -> Result<(), ToolError>;
}
