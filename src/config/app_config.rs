use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::data_config::DataConfig;
use crate::config::env_vars::expand_path;
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_COLLECTION_INTERVAL_MS, DEFAULT_CONFIG_FILE,
    DEFAULT_DASHBOARD_REFRESH_MS, DEFAULT_JOIN_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SUBSCRIPTION_ID, SUBSCRIPTION_RETRY_DELAY_MS,
};
use crate::models::{AiRecord, GeoRecord, PlayerRecord};

/// Connection settings for the game's HTTP API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Explicit communication key file, tried before the well-known locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm_key_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub subscription_id: u32,
    /// Attempts per subscription URL; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_max_attempts: Option<u32>,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            comm_key_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            subscription_id: DEFAULT_SUBSCRIPTION_ID,
            subscription_max_attempts: None,
            retry_delay_ms: SUBSCRIPTION_RETRY_DELAY_MS,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Timing of the poll loop and the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollectionSettings {
    pub interval_ms: u64,
    pub join_timeout_ms: u64,
    pub dashboard_refresh_ms: u64,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        CollectionSettings {
            interval_ms: DEFAULT_COLLECTION_INTERVAL_MS,
            join_timeout_ms: DEFAULT_JOIN_TIMEOUT_MS,
            dashboard_refresh_ms: DEFAULT_DASHBOARD_REFRESH_MS,
        }
    }
}

impl CollectionSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    pub fn dashboard_refresh(&self) -> Duration {
        Duration::from_millis(self.dashboard_refresh_ms)
    }
}

/// Output definitions for both datasets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataSection {
    pub player: DataConfig,
    pub ai: DataConfig,
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection {
            player: DataConfig::player_default(),
            ai: DataConfig::ai_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default)]
    pub data: DataSection,
}

/// On-disk layout: everything lives under the `tsw_connect` key.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    tsw_connect: AppConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let file: ConfigFile = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(file.tsw_connect)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let file = ConfigFile { tsw_connect: self.clone() };
        let yaml = serde_yaml::to_string(&file)
            .context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory {}", parent.display()))?;
        }
        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        AppConfig::default().save_to_yaml_file(path)
    }

    /// Expand `~` and environment variables in every configured path
    pub fn process_environment_variables(&mut self) -> Result<()> {
        for data in [&mut self.data.player, &mut self.data.ai] {
            let raw = data.filename.to_string_lossy().to_string();
            data.filename = expand_path(&raw);
        }

        if let Some(key_path) = &self.api.comm_key_path {
            let raw = key_path.to_string_lossy().to_string();
            self.api.comm_key_path = Some(expand_path(&raw));
        }

        Ok(())
    }

    /// Reject settings the collector cannot run with
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("api.base_url must start with http:// or https://, found {}", base_url);
        }
        if self.api.request_timeout_secs == 0 {
            bail!("api.request_timeout_secs must be greater than zero");
        }
        if self.api.subscription_max_attempts == Some(0) {
            bail!("api.subscription_max_attempts must be at least 1 when set");
        }
        if self.collection.interval_ms == 0 {
            bail!("collection.interval_ms must be greater than zero");
        }
        if self.collection.dashboard_refresh_ms == 0 {
            bail!("collection.dashboard_refresh_ms must be greater than zero");
        }

        self.data.player.validate("player", PlayerRecord::ATTRIBUTE_COUNT)?;
        self.data.ai.validate("ai", AiRecord::ATTRIBUTE_COUNT)?;
        Ok(())
    }
}

/// Load a configuration file or fall back to defaults.
///
/// 1. An explicit path that exists is loaded.
/// 2. An explicit path that does not exist gets the default configuration
///    written to it, which is then used.
/// 3. Without a path, `config.yml` in the working directory is loaded when
///    present, otherwise the defaults are used in memory.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<AppConfig> {
    match config_path {
        Some(path) => {
            if path.exists() {
                AppConfig::from_yaml_file(path)
            } else {
                info!("Config {} not found, writing defaults", path.display());
                let default_config = AppConfig::default();
                default_config.save_to_yaml_file(path)?;
                Ok(default_config)
            }
        }
        None => {
            let cwd_config = Path::new(DEFAULT_CONFIG_FILE);
            if cwd_config.exists() {
                info!("Using {}", cwd_config.display());
                AppConfig::from_yaml_file(cwd_config)
            } else {
                info!("No config path provided, using default configuration");
                Ok(AppConfig::default())
            }
        }
    }
}
