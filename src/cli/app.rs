//! App runners for the record and probe commands

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::ConfigStore;
use crate::application::{
    ProbeSettings, RecordSessionUseCase, SessionCallbacks, SessionInput, SessionSettings,
    StreamProber, StreamSelection,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::domain::stream::{ProbeAttempt, StreamEndpoint};
use crate::infrastructure::{FfmpegTool, FsArtifactStore, XdgConfigStore};

use super::args::RecordOptions;
use super::presenter::{format_attempt, print_above, Presenter};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Env var naming the preferred stream
pub const STREAM_URL_ENV: &str = "STREAM_URL";

/// Run one probe-then-record session.
///
/// Exits zero whatever the outcome unless `strict_exit` is set; the
/// artifact in the output directory is the result.
pub async fn run_record(config: &AppConfig, options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let settings = match session_settings(config) {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let use_case = RecordSessionUseCase::new(
        FfmpegTool::with_binary(config.ffmpeg_path_or_default()),
        FsArtifactStore::new(),
        settings,
    );

    match options.selection {
        StreamSelection::Probe(ref candidates) => {
            presenter.start_spinner(&format!("Probing {} stream endpoints...", candidates.len()))
        }
        StreamSelection::Direct(ref endpoint) => {
            presenter.start_spinner(&format!("Connecting to {}...", endpoint))
        }
        StreamSelection::Unusable { .. } => {}
    }

    let spinner = presenter.spinner_handle();
    let recording_spinner = spinner.clone();
    let callbacks = SessionCallbacks {
        on_probe_attempt: Some(Arc::new(move |attempt: &ProbeAttempt| {
            print_above(spinner.as_ref(), &format_attempt(attempt));
        })),
        on_recording_start: Some(Box::new(
            move |endpoint: &StreamEndpoint, path: &Path, duration: Duration| {
                let message = format!(
                    "Recording {} from {} to {}",
                    duration,
                    endpoint,
                    path.display()
                );
                match recording_spinner {
                    Some(ref s) if !s.is_hidden() => s.set_message(message),
                    _ => eprintln!("{}", message),
                }
            },
        )),
    };

    let input = SessionInput {
        selection: options.selection,
        output_dir: options.output_dir,
        duration: options.duration,
        started_at: Utc::now(),
    };

    let outcome = use_case.execute(input, callbacks).await;
    presenter.stop_spinner();
    presenter.session_outcome(&outcome);

    if options.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => presenter.output(&json),
            Err(e) => presenter.error(&format!("Failed to serialize outcome: {}", e)),
        }
    }

    if options.strict_exit && !outcome.is_success() {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Probe the candidate list and print the selected endpoint on stdout.
/// Exits 1 when nothing answers.
pub async fn run_probe(config: &AppConfig, json: bool) -> ExitCode {
    let presenter = Presenter::new();

    warn_if_stream_url_skipped(config);
    let candidates = match config.candidate_list() {
        Ok(c) => c,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let settings = match session_settings(config) {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let tool = FfmpegTool::with_binary(config.ffmpeg_path_or_default());
    let report = StreamProber::new(&tool, &settings.header, &settings.probe)
        .find_endpoint(&candidates)
        .await;

    for attempt in &report.attempts {
        presenter.probe_attempt(attempt);
    }

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => presenter.output(&out),
            Err(e) => presenter.error(&format!("Failed to serialize report: {}", e)),
        }
    }

    match report.selected {
        Some(endpoint) => {
            if !json {
                presenter.output(endpoint.as_str());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        None => {
            presenter.error("No working stream endpoint found");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Build session settings from merged config
pub fn session_settings(config: &AppConfig) -> Result<SessionSettings, String> {
    let timeout = parse_duration_field("probe-timeout", config.probe_timeout.as_deref())?
        .unwrap_or_else(Duration::default_probe_timeout);

    Ok(SessionSettings {
        header: config.header_or_default(),
        encoding: config.encoding_or_default(),
        naming: config.naming_or_default(),
        probe: ProbeSettings {
            timeout: timeout.as_std(),
            pause: config.probe_pause_or_default(),
            fallback_count: config.fallback_count_or_default(),
        },
    })
}

/// Resolve record options from merged config and flags
pub fn record_options(
    config: &AppConfig,
    single: bool,
    json: bool,
    strict_exit: bool,
) -> Result<RecordOptions, String> {
    let duration = parse_duration_field("duration", config.duration.as_deref())?
        .unwrap_or_else(Duration::default_duration);

    // An unusable stream URL still ends in a diagnostic, not a usage error
    let selection = if single {
        match config.stream_url() {
            Ok(endpoint) => StreamSelection::Direct(endpoint),
            Err(e) => StreamSelection::Unusable {
                url: e.input.clone(),
                error: e.to_string(),
            },
        }
    } else {
        warn_if_stream_url_skipped(config);
        StreamSelection::Probe(config.candidate_list().map_err(|e| e.to_string())?)
    };

    Ok(RecordOptions {
        selection,
        output_dir: config.output_dir_or_default(),
        duration,
        json,
        strict_exit,
    })
}

/// Reject an unusable `--stream-url` flag up front
pub fn check_stream_url_flag(value: Option<&str>) -> Result<(), String> {
    match value {
        Some(url) => url
            .parse::<StreamEndpoint>()
            .map(|_| ())
            .map_err(|e| e.to_string()),
        None => Ok(()),
    }
}

fn warn_if_stream_url_skipped(config: &AppConfig) {
    if let Err(e) = config.stream_url() {
        tracing::warn!(error = %e, "skipping unusable stream URL while probing");
    }
}

fn parse_duration_field(name: &str, value: Option<&str>) -> Result<Option<Duration>, String> {
    value
        .map(|s| {
            s.parse::<Duration>()
                .map_err(|e| format!("Invalid {}: {}", name, e))
        })
        .transpose()
}

/// Config values taken from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        stream_url: env::var(STREAM_URL_ENV).ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}
