// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-user and system-wide settings

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("settings unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SettingsStore: Clone + Send + Sync + 'static {
    async fn user_setting(&self, user: &str, key: &str) -> Result<Option<String>, SettingsError>;

    async fn system_setting(&self, key: &str) -> Result<Option<String>, SettingsError>;
}

#[derive(Default)]
struct SettingsState {
    user: HashMap<(String, String), String>,
    system: HashMap<String, String>,
    unavailable: bool,
}

/// Settings held in memory
#[derive(Clone, Default)]
pub struct MemorySettings {
    state: Arc<Mutex<SettingsState>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user(&self, user: &str, key: &str, value: &str) {
        self.lock()
            .user
            .insert((user.to_string(), key.to_string()), value.to_string());
    }

    pub fn set_system(&self, key: &str, value: &str) {
        self.lock().system.insert(key.to_string(), value.to_string());
    }

    /// Simulate an unreachable settings service
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SettingsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn user_setting(&self, user: &str, key: &str) -> Result<Option<String>, SettingsError> {
        let state = self.lock();
        if state.unavailable {
            return Err(SettingsError::Unavailable(format!("user setting {}", key)));
        }
        Ok(state
            .user
            .get(&(user.to_string(), key.to_string()))
            .cloned())
    }

    async fn system_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let state = self.lock();
        if state.unavailable {
            return Err(SettingsError::Unavailable(format!("system setting {}", key)));
        }
        Ok(state.system.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn user_settings_are_per_user() {
        let settings = MemorySettings::new();
        settings.set_user("admin", "out", "/home/admin/setting");
        assert_eq!(
            settings.user_setting("admin", "out").await.unwrap().as_deref(),
            Some("/home/admin/setting")
        );
        assert_eq!(settings.user_setting("suzy", "out").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_settings_error() {
        let settings = MemorySettings::new();
        settings.set_system("out", "/public");
        settings.set_unavailable(true);
        assert!(settings.system_setting("out").await.is_err());
    }
}
