use crate::error::ConfigError;
use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "plate-scanner";

/// Environment variables checked, in order, for the provider credential
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager rooted at the platform config directory.
    ///
    /// The directory itself is created lazily on the first save.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoPlatformDir("config"))?
            .join(APP_DIR);

        Ok(Self::with_dir(config_dir))
    }

    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_path = config_dir.join("config.json");
        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        tracing::debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is unreadable
    pub fn load_or_default(&self) -> AppConfig {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "ignoring unreadable config file"
                );
                AppConfig::default()
            }
        }
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

/// Pick the API credential: environment first, then the config file.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    config: &AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .or_else(|| {
            config
                .recognition
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
        })
}

/// Directory holding persisted scan history
pub fn resolve_data_dir(config: &AppConfig) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = &config.storage.data_dir {
        return Ok(dir.clone());
    }

    Ok(dirs::data_dir()
        .ok_or(ConfigError::NoPlatformDir("data"))?
        .join(APP_DIR))
}
