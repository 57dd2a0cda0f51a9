// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use chrono_tz::Tz;
use rj_core::TriggerTranslator;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Setting key both fallback lookups use unless configured otherwise
pub const DEFAULT_OUTPUT_SETTING: &str = "default-output-folder";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

/// Runtime feature switches
pub trait FeatureFlags: Clone + Send + Sync + 'static {
    /// Whether output resolution may fall back past the requested folder
    fn fallback_enabled(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub fallback_enabled: bool,
    /// How often a waiting run re-checks its completion signal
    #[serde(with = "humantime_serde")]
    pub completion_poll_interval: Duration,
    /// Give up waiting for asynchronous output after this long
    #[serde(with = "humantime_serde")]
    pub completion_timeout: Option<Duration>,
    /// IANA zone for triggers that do not name one
    pub default_timezone: Option<String>,
    pub user_output_setting: String,
    pub system_output_setting: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            completion_poll_interval: Duration::from_secs(1),
            completion_timeout: None,
            default_timezone: None,
            user_output_setting: DEFAULT_OUTPUT_SETTING.to_string(),
            system_output_setting: DEFAULT_OUTPUT_SETTING.to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.timezone()?;
        if config.completion_poll_interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "completion_poll_interval",
            });
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        match &self.default_timezone {
            None => Ok(Tz::UTC),
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimezone(name.clone())),
        }
    }

    /// Translator bound to the configured default timezone
    pub fn translator(&self) -> Result<TriggerTranslator, ConfigError> {
        Ok(TriggerTranslator::new(self.timezone()?))
    }
}

impl FeatureFlags for SchedulerConfig {
    fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
