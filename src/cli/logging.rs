//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

/// Env var consulted before `RUST_LOG`
pub const LOG_ENV: &str = "STREAM_CAPTURE_LOG";

/// Install the stderr subscriber.
///
/// Filter precedence: `STREAM_CAPTURE_LOG`, `RUST_LOG`, then `debug` with
/// `--verbose` or `warn` without.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "stream_capture=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert_eq!(default_directive(true), "stream_capture=debug");
        assert_eq!(default_directive(false), "warn");
    }
}
