//! XDG config store adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory name under the user's config dir
const APP_DIR: &str = "stream-capture";
const FILE_NAME: &str = "config.toml";

/// `config.toml` under the platform config dir, written via temp file + rename
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// `$XDG_CONFIG_HOME/stream-capture/config.toml`
    pub fn new() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"));
        Self::with_path(base.join(APP_DIR).join(FILE_NAME))
    }

    /// Store backed by an explicit file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.message().to_string()))
    }

    /// Sibling temp file; a crash mid-write never truncates the real config
    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("toml.tmp")
    }

    fn located(&self, err: ConfigError) -> ConfigError {
        let at = self.path.display();
        match err {
            ConfigError::ParseError(m) => ConfigError::ParseError(format!("{}: {}", at, m)),
            ConfigError::ReadError(m) => ConfigError::ReadError(format!("{}: {}", at, m)),
            ConfigError::WriteError(m) => ConfigError::WriteError(format!("{}: {}", at, m)),
            other => other,
        }
    }

    async fn write_atomically(&self, content: &str) -> Result<(), ConfigError> {
        let dir = self.path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        let staging = self.staging_path();
        fs::write(&staging, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(ConfigError::WriteError(e.to_string()));
        }
        Ok(())
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(AppConfig::empty());
            }
            Err(e) => return Err(self.located(ConfigError::ReadError(e.to_string()))),
        };

        debug!(path = %self.path.display(), "loaded config file");
        Self::parse_toml(&content).map_err(|e| self.located(e))
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        self.write_atomically(&content)
            .await
            .map_err(|e| self.located(e))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(self.path.display().to_string()));
        }
        self.save(&AppConfig::defaults()).await
    }
}
