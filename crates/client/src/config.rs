// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `<config dir>/witrack/config.toml` (or an
//! explicit path) and includes:
//! - `base_url`: root of the work-item REST API
//! - `token` / `token_env`: bearer token, inline or from an environment variable
//! - `[batch]`: per-request item and byte limits for creation
//! - `[retry]`: retry budget and backoff bounds
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use witrack_core::{BatchLimits, RetryPolicy, TransportError};

const CONFIG_DIR_NAME: &str = "witrack";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {reason}\n  hint: {hint}")]
    Invalid { reason: String, hint: &'static str },
}

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the API, e.g. `https://tracker.example.com/api/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bearer token. Prefer `token_env` so the token stays out of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Environment variable consulted when `token` is unset.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Limits applied when creating resources in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum resources per request (default: 100).
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    /// Maximum request body size in bytes (default: 2 MiB).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

/// Retry budget for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 3). 0 = never retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Shortest wait between attempts in milliseconds (default: 200).
    #[serde(default = "default_min_wait_ms")]
    pub min_wait_ms: u64,
    /// Longest wait between attempts in milliseconds (default: 10000).
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

fn default_token_env() -> String {
    "WITRACK_TOKEN".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_count() -> usize {
    100
}

fn default_max_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_max_retries() -> u32 {
    3
}

fn default_min_wait_ms() -> u64 {
    200
}

fn default_max_wait_ms() -> u64 {
    10_000
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            max_count: default_max_count(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: default_max_retries(),
            min_wait_ms: default_min_wait_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: None,
            token: None,
            token_env: default_token_env(),
            request_timeout_secs: default_request_timeout_secs(),
            batch: BatchConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the user configuration, or defaults when there is none.
    pub fn load_default() -> Result<Config, ConfigError> {
        match default_path() {
            Some(path) if path.exists() => Config::load(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Loads `path` when given, the user configuration otherwise.
    pub fn load_from(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::load(path),
            None => Config::load_default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    reason: format!("base_url '{url}' is not an http(s) URL"),
                    hint: "use a URL such as https://tracker.example.com/api/v1",
                });
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "request_timeout_secs must be positive".into(),
                hint: "remove the key to use the default of 30 seconds",
            });
        }
        self.batch_limits()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
                hint: "[batch] max_count must be at least 1 and max_bytes larger than 11",
            })?;
        if self.retry.max_wait_ms < self.retry.min_wait_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "[retry] max_wait_ms ({}) is below min_wait_ms ({})",
                    self.retry.max_wait_ms, self.retry.min_wait_ms
                ),
                hint: "max_wait_ms caps the backoff and must be at least min_wait_ms",
            });
        }
        Ok(())
    }

    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits::new(self.batch.max_count, self.batch.max_bytes)
    }

    /// Retry policy using the default transient-failure classification.
    pub fn retry_policy(&self) -> RetryPolicy<TransportError> {
        RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.min_wait_ms),
            Duration::from_millis(self.retry.max_wait_ms),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The inline token, or the value of `token_env` when set and non-empty.
    pub fn resolve_token(&self) -> Option<String> {
        self.token.clone().or_else(|| {
            std::env::var(&self.token_env)
                .ok()
                .filter(|token| !token.trim().is_empty())
        })
    }
}

/// Location of the user configuration file, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
