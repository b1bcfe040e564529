//! stream-capture CLI entry point

use std::process::ExitCode;

use clap::Parser;

use stream_capture::cli::{
    app::{
        check_stream_url_flag, load_merged_config, record_options, run_probe, run_record, EXIT_ERROR,
        EXIT_USAGE_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging,
    presenter::Presenter,
};
use stream_capture::domain::config::AppConfig;
use stream_capture::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        stream_url: cli.stream_url.clone(),
        candidates: if cli.candidates.is_empty() {
            None
        } else {
            Some(cli.candidates.clone())
        },
        output_dir: cli.output_dir.clone(),
        duration: cli.duration.clone(),
        probe_timeout: cli.probe_timeout.clone(),
        ffmpeg_path: cli.ffmpeg.clone(),
        ..Default::default()
    };

    if !matches!(cli.command, Some(Commands::Config { .. })) {
        if let Err(e) = check_stream_url_flag(cli.stream_url.as_deref()) {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Probe) => {
            let config = load_merged_config(cli_config).await;
            run_probe(&config, cli.json).await
        }
        None => {
            let config = load_merged_config(cli_config).await;
            match record_options(&config, cli.single, cli.json, cli.strict_exit) {
                Ok(options) => run_record(&config, options).await,
                Err(e) => {
                    presenter.error(&e);
                    ExitCode::from(EXIT_USAGE_ERROR)
                }
            }
        }
    }
}
