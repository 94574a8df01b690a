// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::ConfigError;
use crate::recovery::RecoveryAction;
use anyhow::{Context, Result};
use dd_agent_log::{LogConfig, LogFormat};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
const DEFAULT_SERVICE_MANAGER: &str = "systemctl";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_command() -> String {
    DEFAULT_SERVICE_MANAGER.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub metrics_logger: LoggerSettings,
    #[serde(default)]
    pub service_manager: ServiceManagerSettings,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
}

/// A service and the status it is supposed to be in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    /// Kept as written so a typo can be reported back verbatim.
    #[serde(default)]
    pub expected_status: String,
}

impl ServiceSpec {
    pub fn new(name: impl Into<String>, expected_status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expected_status: expected_status.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            level: default_level(),
            log_format: default_log_format(),
        }
    }
}

impl LoggerSettings {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: PathBuf::from(&self.log_dir),
            level: dd_agent_log::parse_level(&self.level),
            format: LogFormat::from_name(&self.log_format),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceManagerSettings {
    #[serde(default = "default_command")]
    pub command: String,
    /// Seconds allowed for a `status` query.
    #[serde(default = "default_timeout")]
    pub query_timeout: u64,
    /// Seconds allowed for a `start` or `stop` action.
    #[serde(default = "default_timeout")]
    pub action_timeout: u64,
}

impl Default for ServiceManagerSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
            query_timeout: default_timeout(),
            action_timeout: default_timeout(),
        }
    }
}

impl ServiceManagerSettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout)
    }
}

impl Config {
    /// Check the service manager settings and every service entry, returning
    /// all problems found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        let manager = &self.service_manager;
        if manager.query_timeout == 0 {
            errors.push(ConfigError::ZeroTimeout { field: "query_timeout" });
        }
        if manager.action_timeout == 0 {
            errors.push(ConfigError::ZeroTimeout { field: "action_timeout" });
        }

        for (index, spec) in self.services.iter().enumerate() {
            let name = spec.name.trim();
            if name.is_empty() {
                errors.push(ConfigError::EmptyName { index });
                continue;
            }
            if !seen.insert(name) {
                errors.push(ConfigError::DuplicateName {
                    name: name.to_string(),
                });
            }
            if RecoveryAction::for_target(&spec.expected_status).is_none() {
                errors.push(ConfigError::InvalidTarget {
                    name: name.to_string(),
                    value: spec.expected_status.clone(),
                });
            }
        }

        errors
    }
}

/// `--config` wins, then `DD_SVCMON_CONFIG`, then `./config.yaml`.
pub fn config_path(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| std::env::var_os("DD_SVCMON_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("config file not found at {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("error parsing config file {}", path.display()))?;
    Ok(config)
}
