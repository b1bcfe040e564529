//! Probe-then-record session use case

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::domain::recording::{ArtifactNaming, Duration, RecordingOutcome};
use crate::domain::report::DiagnosticReport;
use crate::domain::stream::{AudioEncoding, CandidateList, ClientHeader, ProbeReport, StreamEndpoint};

use super::ports::{ArtifactStore, MediaTool};
use super::probe::{ProbeCallback, ProbeSettings, StreamProber};
use super::record::StreamRecorder;

/// How the endpoint to record is chosen
#[derive(Debug, Clone)]
pub enum StreamSelection {
    /// Probe the candidates in order
    Probe(CandidateList),
    /// Record this endpoint without probing
    Direct(StreamEndpoint),
    /// Direct mode was asked for but the URL does not parse
    Unusable { url: String, error: String },
}

/// Fixed parameters of a session
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub header: ClientHeader,
    pub encoding: AudioEncoding,
    pub naming: ArtifactNaming,
    pub probe: ProbeSettings,
}

/// Input parameters for one run
#[derive(Debug, Clone)]
pub struct SessionInput {
    pub selection: StreamSelection,
    pub output_dir: PathBuf,
    pub duration: Duration,
    /// Timestamp used in every artifact name
    pub started_at: DateTime<Utc>,
}

/// Terminal state of a run. Each variant leaves exactly one artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Recorded {
        endpoint: StreamEndpoint,
        recording: RecordingOutcome,
        probe: Option<ProbeReport>,
    },
    RecordingFailed {
        endpoint: StreamEndpoint,
        recording: RecordingOutcome,
        probe: Option<ProbeReport>,
        report_path: Option<PathBuf>,
    },
    NotFound {
        probe: ProbeReport,
        report_path: Option<PathBuf>,
    },
    UnusableEndpoint {
        url: String,
        error: String,
        report_path: Option<PathBuf>,
    },
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    /// The file this run left behind, if writing it succeeded
    pub fn artifact_path(&self) -> Option<&Path> {
        match self {
            Self::Recorded { recording, .. } => Some(recording.path()),
            Self::RecordingFailed { report_path, .. }
            | Self::NotFound { report_path, .. }
            | Self::UnusableEndpoint { report_path, .. } => report_path.as_deref(),
        }
    }
}

/// Callbacks for status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct SessionCallbacks {
    /// Called after each probe attempt
    pub on_probe_attempt: Option<ProbeCallback>,
    /// Called when recording starts with (endpoint, output path, duration)
    pub on_recording_start: Option<Box<dyn Fn(&StreamEndpoint, &Path, Duration) + Send + Sync>>,
}

/// Selects an endpoint, records it, and writes a diagnostic on failure.
pub struct RecordSessionUseCase<M, S>
where
    M: MediaTool,
    S: ArtifactStore,
{
    tool: M,
    store: S,
    settings: SessionSettings,
}

impl<M, S> RecordSessionUseCase<M, S>
where
    M: MediaTool,
    S: ArtifactStore,
{
    pub fn new(tool: M, store: S, settings: SessionSettings) -> Self {
        Self {
            tool,
            store,
            settings,
        }
    }

    pub fn tool(&self) -> &M {
        &self.tool
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the session to a terminal state
    pub async fn execute(&self, input: SessionInput, callbacks: SessionCallbacks) -> SessionOutcome {
        let (endpoint, probe) = match input.selection {
            StreamSelection::Direct(endpoint) => (endpoint, None),
            StreamSelection::Unusable { url, error } => {
                error!(url = %url, "stream URL is not usable");
                let diagnostic = DiagnosticReport::UnusableEndpoint {
                    url: url.clone(),
                    error: error.clone(),
                };
                let report_path = self
                    .write_report(&input.output_dir, input.started_at, &diagnostic)
                    .await;
                return SessionOutcome::UnusableEndpoint {
                    url,
                    error,
                    report_path,
                };
            }
            StreamSelection::Probe(ref candidates) => {
                let report = StreamProber::new(&self.tool, &self.settings.header, &self.settings.probe)
                    .with_callback(callbacks.on_probe_attempt.clone())
                    .find_endpoint(candidates)
                    .await;

                match report.selected.clone() {
                    Some(endpoint) => (endpoint, Some(report)),
                    None => {
                        let diagnostic = DiagnosticReport::NotFound {
                            attempts: report.attempts.clone(),
                        };
                        let report_path = self
                            .write_report(&input.output_dir, input.started_at, &diagnostic)
                            .await;
                        return SessionOutcome::NotFound {
                            probe: report,
                            report_path,
                        };
                    }
                }
            }
        };

        let output_path = self
            .settings
            .naming
            .audio_path(&input.output_dir, input.started_at);

        if let Some(ref cb) = callbacks.on_recording_start {
            cb(&endpoint, &output_path, input.duration);
        }

        let recording = StreamRecorder::new(
            &self.tool,
            &self.store,
            &self.settings.header,
            &self.settings.encoding,
        )
        .record(&endpoint, &output_path, input.duration)
        .await;

        if recording.success {
            return SessionOutcome::Recorded {
                endpoint,
                recording,
                probe,
            };
        }

        let diagnostic = DiagnosticReport::RecordingFailed {
            endpoint: endpoint.clone(),
            error: recording
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
            partial_bytes: recording.size_bytes,
        };
        let report_path = self
            .write_report(&input.output_dir, input.started_at, &diagnostic)
            .await;

        SessionOutcome::RecordingFailed {
            endpoint,
            recording,
            probe,
            report_path,
        }
    }

    async fn write_report(
        &self,
        dir: &Path,
        at: DateTime<Utc>,
        report: &DiagnosticReport,
    ) -> Option<PathBuf> {
        let path = self.settings.naming.report_path(dir, at);

        let written = async {
            self.store.ensure_dir(dir).await?;
            self.store.write_text(&path, &report.render(at)).await
        }
        .await;

        match written {
            Ok(()) => {
                info!(path = %path.display(), "wrote diagnostic report");
                Some(path)
            }
            Err(e) => {
                error!(error = %e, "could not write diagnostic report");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ToolError;
    use crate::application::test_support::{CaptureScript, Files, MemoryStore, ScriptedTool};
    use chrono::TimeZone;
    use std::time::Duration as StdDuration;

    fn settings() -> SessionSettings {
        SessionSettings {
            probe: ProbeSettings {
                timeout: StdDuration::from_secs(10),
                pause: StdDuration::ZERO,
                fallback_count: 3,
            },
            ..Default::default()
        }
    }

    fn input(selection: StreamSelection) -> SessionInput {
        SessionInput {
            selection,
            output_dir: PathBuf::from("recordings"),
            duration: Duration::from_secs(300),
            started_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn candidates(urls: &[&str]) -> StreamSelection {
        StreamSelection::Probe(CandidateList::parse(urls).unwrap().unwrap())
    }

    #[tokio::test]
    async fn records_nth_candidate_when_it_is_first_reachable() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone()).live("http://c/3");
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files), settings());

        let outcome = use_case
            .execute(
                input(candidates(&["http://a/1", "http://b/2", "http://c/3"])),
                SessionCallbacks::default(),
            )
            .await;

        assert!(outcome.is_success());
        assert_eq!(use_case.tool().captured_urls(), vec!["http://c/3"]);
        assert_eq!(
            outcome.artifact_path(),
            Some(Path::new("recordings/eu_stream_20240501_120000.mp3"))
        );
    }

    #[tokio::test]
    async fn not_found_writes_only_diagnostic() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone());
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files.clone()), settings());

        let outcome = use_case
            .execute(input(candidates(&["http://a/1", "http://b/2"])), SessionCallbacks::default())
            .await;

        assert!(matches!(outcome, SessionOutcome::NotFound { .. }));
        assert!(use_case.tool().captured_urls().is_empty());

        let report = PathBuf::from("recordings/eu_stream_failed_20240501_120000.txt");
        let all: Vec<PathBuf> = files.lock().unwrap().keys().cloned().collect();
        assert_eq!(all, vec![report.clone()]);

        let texts = use_case.store().texts.lock().unwrap();
        let text = &texts[&report];
        assert!(text.contains("http://a/1"));
        assert!(text.contains("http://b/2"));
    }

    #[tokio::test]
    async fn recording_failure_writes_report_with_url_and_error() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone())
            .live("http://a/1")
            .capture(CaptureScript::Fail(ToolError::Timeout(StdDuration::from_secs(360))));
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files), settings());

        let outcome = use_case
            .execute(input(candidates(&["http://a/1"])), SessionCallbacks::default())
            .await;

        let SessionOutcome::RecordingFailed { report_path, recording, .. } = outcome else {
            panic!("expected RecordingFailed");
        };
        assert!(!recording.success);
        let texts = use_case.store().texts.lock().unwrap();
        let text = &texts[&report_path.unwrap()];
        assert!(text.contains("Stream URL: http://a/1"));
        assert!(text.contains("timed out after 360s"));
    }

    #[tokio::test]
    async fn partial_capture_leaves_only_report() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone()).capture(CaptureScript::WriteThenFail(
            1000,
            ToolError::NonZeroExit {
                code: Some(1),
                stderr: "Connection reset by peer".to_string(),
            },
        ));
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files.clone()), settings());

        let outcome = use_case
            .execute(
                input(StreamSelection::Direct("http://only/1".parse().unwrap())),
                SessionCallbacks::default(),
            )
            .await;

        let report = PathBuf::from("recordings/eu_stream_failed_20240501_120000.txt");
        assert_eq!(outcome.artifact_path(), Some(report.as_path()));
        let all: Vec<PathBuf> = files.lock().unwrap().keys().cloned().collect();
        assert_eq!(all, vec![report.clone()]);

        let texts = use_case.store().texts.lock().unwrap();
        assert!(texts[&report].contains("Partial output discarded: 1000 bytes"));
    }

    #[tokio::test]
    async fn unusable_direct_url_writes_diagnostic_without_tool_calls() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone());
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files.clone()), settings());

        let outcome = use_case
            .execute(
                input(StreamSelection::Unusable {
                    url: "example.com/live".to_string(),
                    error: "Invalid stream URL".to_string(),
                }),
                SessionCallbacks::default(),
            )
            .await;

        assert!(!outcome.is_success());
        assert!(use_case.tool().probed_urls().is_empty());
        assert!(use_case.tool().captured_urls().is_empty());

        let report = PathBuf::from("recordings/eu_stream_failed_20240501_120000.txt");
        assert_eq!(outcome.artifact_path(), Some(report.as_path()));
        let texts = use_case.store().texts.lock().unwrap();
        assert!(texts[&report].contains("Stream URL: example.com/live"));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "unusable_endpoint");
    }

    #[tokio::test]
    async fn direct_mode_skips_probing() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone());
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files), settings());

        let outcome = use_case
            .execute(
                input(StreamSelection::Direct("http://only/1".parse().unwrap())),
                SessionCallbacks::default(),
            )
            .await;

        assert!(outcome.is_success());
        assert!(use_case.tool().probed_urls().is_empty());
        assert_eq!(use_case.tool().captured_urls(), vec!["http://only/1"]);
    }

    #[tokio::test]
    async fn outcome_serializes_with_status_tag() {
        let files = Files::default();
        let tool = ScriptedTool::new(files.clone());
        let use_case = RecordSessionUseCase::new(tool, MemoryStore::new(files), settings());

        let outcome = use_case
            .execute(input(candidates(&["http://a/1"])), SessionCallbacks::default())
            .await;

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["probe"]["attempts"][0]["endpoint"], "http://a/1");
    }
}
