//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::SessionOutcome;
use crate::domain::stream::ProbeAttempt;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Handle for updating the spinner from callbacks
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// One line per probe attempt
    pub fn probe_attempt(&self, attempt: &ProbeAttempt) {
        print_above(self.spinner.as_ref(), &format_attempt(attempt));
    }

    /// Final status line for a session
    pub fn session_outcome(&self, outcome: &SessionOutcome) {
        match outcome {
            SessionOutcome::Recorded { recording, .. } => {
                let size = recording
                    .human_readable_size()
                    .unwrap_or_else(|| "unknown size".to_string());
                self.success(&format!(
                    "Recording saved: {} ({})",
                    recording.path.display(),
                    size
                ));
            }
            SessionOutcome::RecordingFailed {
                endpoint,
                recording,
                report_path,
                ..
            } => {
                self.error(&format!(
                    "Recording from {} failed: {}",
                    endpoint,
                    recording.error.as_deref().unwrap_or("unknown error")
                ));
                self.report_location(report_path.as_deref());
            }
            SessionOutcome::NotFound { probe, report_path } => {
                self.error(&format!(
                    "No working stream found ({} attempts)",
                    probe.attempts.len()
                ));
                self.report_location(report_path.as_deref());
            }
            SessionOutcome::UnusableEndpoint {
                error, report_path, ..
            } => {
                self.error(error);
                self.report_location(report_path.as_deref());
            }
        }
    }

    fn report_location(&self, path: Option<&std::path::Path>) {
        match path {
            Some(p) => self.info(&format!("Diagnostic report: {}", p.display())),
            None => self.warn("Diagnostic report could not be written"),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a line above the spinner, or plainly when there is none or it is hidden
pub fn print_above(spinner: Option<&ProgressBar>, line: &str) {
    match spinner {
        Some(spinner) if !spinner.is_hidden() => spinner.println(line),
        _ => eprintln!("{}", line),
    }
}

/// `✓ url` or `✗ url (reason)`, tagged when sent without the header
pub fn format_attempt(attempt: &ProbeAttempt) -> String {
    let mark = if attempt.reachable {
        "✓".green()
    } else {
        "✗".red()
    };
    let mut line = format!("{} {}", mark, attempt.endpoint);
    if !attempt.header_sent {
        line.push_str(" [no header]");
    }
    if let Some(ref failure) = attempt.failure {
        line.push_str(&format!(" ({})", failure));
    }
    line
}
