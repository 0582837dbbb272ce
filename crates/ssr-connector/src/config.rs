//! Network configuration backed by an XML config file

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the directory that holds the config file.
pub const CONFIG_DIR_ENV: &str = "SSREMOTE_VST";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "ssremote_config.xml";

/// Errors from the explicit load/save paths
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("{0} is not set and no platform config directory exists")]
    NoConfigPath(&'static str),
}

/// Connection settings, stored as XML with a `<network>` root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "network")]
pub struct NetworkConfig {
    /// Renderer host name or address
    pub host: String,
    /// Renderer TCP port
    pub port: u16,
    /// Socket timeout in milliseconds, used for connects and bounded waits
    pub timeout_ms: u64,
    /// Message delimiter byte on the wire
    pub end_of_message: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4711,
            timeout_ms: 1000,
            end_of_message: 0,
        }
    }
}

impl NetworkConfig {
    /// Load from the discovered config file, falling back to defaults on any
    /// failure so the plugin still starts without one.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Ok(path) => match Self::load_from(&path) {
                Ok(config) => config,
                Err(error) => {
                    log::warn!(
                        "[Config] Using defaults, cannot read {}: {error}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(error) => {
                log::warn!("[Config] Using defaults: {error}");
                Self::default()
            }
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        quick_xml::de::from_str(&contents).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let xml =
            quick_xml::se::to_string(self).map_err(|error| ConfigError::Parse(error.to_string()))?;
        fs::write(path, xml)?;
        Ok(())
    }

    /// Path of the config file: `$SSREMOTE_VST/ssremote_config.xml`, or the
    /// platform config directory under `ssremote/` when the variable is
    /// unset.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Self::config_file_path_from(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
    }

    fn config_file_path_from(env_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = env_dir {
            return Ok(dir.join(CONFIG_FILE_NAME));
        }
        dirs_next::config_dir()
            .map(|dir| dir.join("ssremote").join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigPath(CONFIG_DIR_ENV))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn delimiter(&self) -> u8 {
        self.end_of_message
    }
}
