//! Diagnostic report written when a run produces no audio

use chrono::{DateTime, Utc};

use crate::domain::stream::{ProbeAttempt, StreamEndpoint};

/// Plain-text diagnostic for a failed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReport {
    /// No candidate answered a probe
    NotFound { attempts: Vec<ProbeAttempt> },
    /// An endpoint was selected but recording it failed
    RecordingFailed {
        endpoint: StreamEndpoint,
        error: String,
        /// Size of the discarded partial output, if any was written
        partial_bytes: Option<u64>,
    },
    /// The configured stream URL could not be used at all
    UnusableEndpoint { url: String, error: String },
}

impl DiagnosticReport {
    /// Render the report body
    pub fn render(&self, at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Recording failed at {}\n\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        match self {
            Self::NotFound { attempts } => {
                out.push_str("No working stream endpoint was found.\n\n");
                out.push_str("Endpoints attempted:\n");
                for attempt in attempts {
                    let mode = if attempt.header_sent {
                        "with header"
                    } else {
                        "without header"
                    };
                    out.push_str(&format!("- {} ({})", attempt.endpoint, mode));
                    if let Some(ref failure) = attempt.failure {
                        out.push_str(&format!(": {}", failure));
                    }
                    out.push('\n');
                }
            }
            Self::RecordingFailed {
                endpoint,
                error,
                partial_bytes,
            } => {
                out.push_str(&format!("Stream URL: {}\n\n", endpoint));
                if let Some(bytes) = partial_bytes {
                    out.push_str(&format!("Partial output discarded: {} bytes\n\n", bytes));
                }
                out.push_str("Error:\n");
                out.push_str(error.trim_end());
                out.push('\n');
            }
            Self::UnusableEndpoint { url, error } => {
                out.push_str(&format!("Stream URL: {}\n\n", url));
                out.push_str("The stream URL is not usable; nothing was recorded.\n\n");
                out.push_str("Error:\n");
                out.push_str(error.trim_end());
                out.push('\n');
            }
        }

        out
    }
}
