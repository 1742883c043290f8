use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    condition::ConditionStyle, model::GridLocation, output::DiagnosticStream,
    provider::kma::DEFAULT_BASE_URL,
};

pub const DEFAULT_API_KEY_ENV: &str = "KMA_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 7;

/// Top-level configuration stored on disk. Every key is optional.
///
/// Example TOML:
/// ```toml
/// style = "words"
/// diagnostic_stream = "stdout"
///
/// [grid]
/// nx = 60
/// ny = 127
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the environment variable holding the service key.
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub style: ConditionStyle,
    pub diagnostic_stream: DiagnosticStream,
    pub debug_output: bool,
    pub grid: GridLocation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            style: ConditionStyle::default(),
            diagnostic_stream: DiagnosticStream::default(),
            debug_output: false,
            grid: GridLocation::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skybar", "skybar")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Service key from the configured environment variable, if set.
    pub fn credential(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}
