//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, EncodingConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::domain::stream::{CandidateList, StreamEndpoint};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("'{}' is not a valid number", value)))
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "stream_url" => {
            value
                .parse::<StreamEndpoint>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.stream_url = Some(value.trim().to_string());
        }
        "candidates" => {
            let urls: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            CandidateList::parse(&urls)
                .map_err(|e| invalid(key, e.to_string()))?
                .ok_or_else(|| invalid(key, "At least one URL is required"))?;
            config.candidates = Some(urls);
        }
        "output_dir" => config.output_dir = Some(value.to_string()),
        "file_prefix" => {
            if value.is_empty() || value.contains(['/', '\\']) {
                return Err(invalid(key, "Prefix must be non-empty and contain no path separators"));
            }
            config.file_prefix = Some(value.to_string());
        }
        "duration" | "probe_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            if key == "duration" {
                config.duration = Some(value.to_string());
            } else {
                config.probe_timeout = Some(value.to_string());
            }
        }
        "probe_pause_ms" => config.probe_pause_ms = Some(parse_number(key, value)?),
        "fallback_count" => config.fallback_count = Some(parse_number(key, value)?),
        "user_agent" => config.user_agent = Some(value.to_string()),
        "ffmpeg_path" => config.ffmpeg_path = Some(value.to_string()),
        "encoding.codec" | "encoding.bitrate" | "encoding.sample_rate" | "encoding.channels" => {
            let enc = config.encoding.get_or_insert_with(EncodingConfig::default);
            match key {
                "encoding.codec" => enc.codec = Some(value.to_string()),
                "encoding.bitrate" => enc.bitrate = Some(value.to_string()),
                "encoding.sample_rate" => enc.sample_rate = Some(parse_number(key, value)?),
                _ => {
                    let channels: u8 = parse_number(key, value)?;
                    if channels == 0 {
                        return Err(invalid(key, "Channel count must be at least 1"));
                    }
                    enc.channels = Some(channels);
                }
            }
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let enc = config.encoding.as_ref();
    match key {
        "stream_url" => config.stream_url.clone(),
        "candidates" => config.candidates.as_ref().map(|c| c.join(", ")),
        "output_dir" => config.output_dir.clone(),
        "file_prefix" => config.file_prefix.clone(),
        "duration" => config.duration.clone(),
        "probe_timeout" => config.probe_timeout.clone(),
        "probe_pause_ms" => config.probe_pause_ms.map(|v| v.to_string()),
        "fallback_count" => config.fallback_count.map(|v| v.to_string()),
        "user_agent" => config.user_agent.clone(),
        "ffmpeg_path" => config.ffmpeg_path.clone(),
        "encoding.codec" => enc.and_then(|e| e.codec.clone()),
        "encoding.bitrate" => enc.and_then(|e| e.bitrate.clone()),
        "encoding.sample_rate" => enc.and_then(|e| e.sample_rate).map(|v| v.to_string()),
        "encoding.channels" => enc.and_then(|e| e.channels).map(|v| v.to_string()),
        _ => None,
    }
}
