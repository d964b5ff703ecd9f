//! ---
//! daq_section: "01-core-functionality"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Shared primitives and utilities for the polling runtime."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_device_type() -> String {
    "emlog".to_owned()
}

fn default_host() -> String {
    "emlog".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for the SOLDAQ runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "SOLDAQ_CONFIG";

    /// Load configuration from disk, respecting the `SOLDAQ_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Settings for the device provider driven by the daemon.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registered device-type identifier selecting the adapter.
    #[serde(default = "default_device_type")]
    pub device_type: String,
    /// Hostname or address of the device; substituted into URL templates.
    #[serde(default = "default_host")]
    pub host: String,
    /// Per-request timeout applied by the HTTP fetcher.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Optional override for the adapter's default polling interval.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default)]
    pub poll_interval: Option<Duration>,
}

impl ProviderConfig {
    fn validate(&self) -> Result<()> {
        if self.device_type.trim().is_empty() {
            return Err(anyhow!("provider.device_type must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("provider.host must not be empty"));
        }
        if self.request_timeout.is_zero() {
            return Err(anyhow!("provider.request_timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            host: default_host(),
            request_timeout: default_request_timeout(),
            poll_interval: None,
        }
    }
}

/// Logging sink configuration consumed by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory receiving the rolling daily log files.
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    /// Stdout formatting style.
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Optional prefix for log file names; defaults to the service name.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}
