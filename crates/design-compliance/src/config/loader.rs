//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables and
//! command-line overrides on top of the built-in defaults.

use crate::config::AgentConfig;
use crate::constants::*;
use crate::logging::log_config_loaded;
use crate::reporter::ReportFormat;
use crate::{AgentError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. `AgentConfig::default()`
    /// 2. TOML configuration file (explicit path, else `designer-agent.toml`)
    /// 3. Environment variables (e.g., `DESIGNER_AGENT_CHECK_INTERVAL_MS`,
    ///    `DESIGNER_AGENT_LOGGING__LEVEL`)
    pub fn load(&self) -> Result<AgentConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AgentConfig::default()));

        match &self.config_path {
            Some(config_path) => {
                let found = config_path.exists();
                if found {
                    figment = figment.merge(Toml::file(config_path));
                }
                log_config_loaded(config_path, found);
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    figment = figment.merge(Toml::file(default_path));
                    log_config_loaded(default_path, true);
                }
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let config: AgentConfig = figment
            .extract()
            .map_err(|e| AgentError::Configuration(format!("Failed to extract configuration: {e}")))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a TOML file that [`load`](Self::load) reads back
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AgentConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            AgentError::Configuration(format!("Failed to serialize config to TOML: {e}"))
        })?;

        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| AgentError::file_access(path.as_ref(), e))
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Validate configuration values
pub fn validate_config(config: &AgentConfig) -> Result<()> {
    if config.check_interval_ms == 0 {
        return Err(AgentError::Configuration(
            "Check interval cannot be 0".to_string(),
        ));
    }
    if config.extensions.is_empty() {
        return Err(AgentError::Configuration(
            "At least one file extension must be configured".to_string(),
        ));
    }
    if config.history_limit == Some(0) {
        return Err(AgentError::Configuration(
            "History limit cannot be 0 (leave it unset for unbounded history)".to_string(),
        ));
    }
    config.scanner()?;
    Ok(())
}

/// Values given on the command line
///
/// Raw strings are kept so invalid values can fall back instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Comma-separated watch roots
    pub watch: Option<String>,
    /// Pass interval in milliseconds
    pub interval: Option<String>,
    pub auto_fix: bool,
    /// `json`, `html` or `console`
    pub format: Option<String>,
}

impl ConfigOverrides {
    /// Apply on top of a loaded configuration
    ///
    /// Invalid values are logged and leave the loaded value in place.
    pub fn apply(&self, mut config: AgentConfig) -> AgentConfig {
        if let Some(watch) = &self.watch {
            let dirs = parse_watch_list(watch);
            if dirs.is_empty() {
                warn!(value = %watch, "Ignoring empty --watch list");
            } else {
                config.watch_directories = dirs;
            }
        }

        if let Some(interval) = &self.interval {
            match parse_interval(interval) {
                Ok(ms) => config.check_interval_ms = ms,
                Err(e) => warn!(
                    error = %e,
                    fallback_ms = config.check_interval_ms,
                    "Using configured check interval"
                ),
            }
        }

        if self.auto_fix {
            config.auto_fix = true;
        }

        if let Some(format) = &self.format {
            config.report_format = format.parse().unwrap_or_else(|e: AgentError| {
                warn!(error = %e, "Falling back to console report");
                ReportFormat::Console
            });
        }

        config
    }
}

/// Split a comma-separated directory list, dropping blanks
pub fn parse_watch_list(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Parse a positive millisecond interval
pub fn parse_interval(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(AgentError::InvalidConfigValue {
            key: "interval".to_string(),
            value: value.to_string(),
        }),
    }
}
