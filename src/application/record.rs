//! Bounded capture of a selected endpoint

use std::path::Path;

use tracing::{error, info, warn};

use crate::domain::recording::{Duration, RecordingOutcome};
use crate::domain::stream::{AudioEncoding, ClientHeader, StreamEndpoint};

use super::ports::{ArtifactStore, CaptureRequest, MediaTool};

/// Extra time the tool gets beyond the requested duration to flush and exit
pub const FLUSH_GRACE_SECS: u64 = 60;

/// Runs one capture and decides whether it produced a usable file.
pub struct StreamRecorder<'a, M: MediaTool, S: ArtifactStore> {
    tool: &'a M,
    store: &'a S,
    header: &'a ClientHeader,
    encoding: &'a AudioEncoding,
}

impl<'a, M: MediaTool, S: ArtifactStore> StreamRecorder<'a, M, S> {
    pub fn new(
        tool: &'a M,
        store: &'a S,
        header: &'a ClientHeader,
        encoding: &'a AudioEncoding,
    ) -> Self {
        Self {
            tool,
            store,
            header,
            encoding,
        }
    }

    /// Record `endpoint` into `output_path` for `duration`.
    ///
    /// Never fails: every problem ends up in the returned outcome. Success
    /// requires a clean tool exit and the file on disk afterwards.
    pub async fn record(
        &self,
        endpoint: &StreamEndpoint,
        output_path: &Path,
        duration: Duration,
    ) -> RecordingOutcome {
        if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = self.store.ensure_dir(dir).await {
                error!(error = %e, "cannot prepare output directory");
                return RecordingOutcome::failed(output_path, None, e.to_string());
            }
        }

        // A stale file at the target would satisfy the existence check
        if let Err(e) = self.store.remove_file(output_path).await {
            error!(error = %e, "cannot replace existing output file");
            return RecordingOutcome::failed(output_path, None, e.to_string());
        }

        let timeout = duration.saturating_add_secs(FLUSH_GRACE_SECS);
        let request = CaptureRequest {
            endpoint: endpoint.clone(),
            header: self.header.clone(),
            output: output_path.to_path_buf(),
            duration,
            encoding: self.encoding.clone(),
            timeout: timeout.as_std(),
        };

        info!(url = %endpoint, path = %output_path.display(), %duration, "recording");
        let result = self.tool.capture(&request).await;
        let size = self.store.file_size(output_path).await;

        match (result, size) {
            (Ok(()), Some(bytes)) => {
                info!(bytes, "recording complete");
                RecordingOutcome::succeeded(output_path, bytes)
            }
            (Ok(()), None) => {
                warn!(path = %output_path.display(), "tool exited cleanly but wrote no file");
                RecordingOutcome::failed(
                    output_path,
                    None,
                    "media tool exited successfully but the output file was not created",
                )
            }
            (Err(e), size) => {
                if e.is_timeout() {
                    warn!("recording aborted: {}", e);
                } else {
                    error!(error = %e, "recording failed");
                }
                // Partial output is discarded; only its size is kept
                if size.is_some() {
                    if let Err(remove_err) = self.store.remove_file(output_path).await {
                        warn!(error = %remove_err, "cannot discard partial output");
                    }
                }
                RecordingOutcome::failed(output_path, size, e.to_string())
            }
        }
    }
}
