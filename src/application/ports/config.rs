//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisted settings
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the stored config. A missing file yields `AppConfig::empty()`.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the config, creating parent directories as needed.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the config file
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write `AppConfig::defaults()`; fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
