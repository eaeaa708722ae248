use crate::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".skip-client.toml";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_STREAMING_PORT: u16 = 8080;
pub const DEFAULT_CONTROL_PORT: u16 = 8081;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub scenarios: ScenariosConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the Skip service listens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_control_port")]
    pub control_port: u16,
    #[serde(default = "default_streaming_port")]
    pub streaming_port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_control_port() -> u16 {
    DEFAULT_CONTROL_PORT
}

fn default_streaming_port() -> u16 {
    DEFAULT_STREAMING_PORT
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            control_port: DEFAULT_CONTROL_PORT,
            streaming_port: DEFAULT_STREAMING_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScenariosConfig {
    /// Scenario file loaded when none is given on the command line
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Default verbosity level (0 quiet to 4 trace)
    #[serde(default)]
    pub verbosity: Option<u8>,
}

impl Config {
    /// Load configuration from a file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ClientError::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })?;

        crate::logging::log_config_loaded(&config_path.to_string_lossy());
        Ok(config)
    }
}
