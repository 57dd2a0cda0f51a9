// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output folder resolution through the fallback chain
//!
//! Candidates are tried in order: the requested folder, the owner's default
//! output setting, the system default output setting, the owner's home.
//! Every check runs as the job owner.

use crate::config::{FeatureFlags, SchedulerConfig};
use crate::error::SchedulerError;
use rj_adapters::{Authorizer, ContentStore, Identity, IdentityContext, Permission, SettingsStore};
use rj_core::path;

pub struct OutputPathResolver<C, S, I, A, F = SchedulerConfig> {
    content: C,
    settings: S,
    identity: I,
    authorizer: A,
    flags: F,
    user_setting: String,
    system_setting: String,
}

impl<C, S, I, A, F> OutputPathResolver<C, S, I, A, F>
where
    C: ContentStore,
    S: SettingsStore,
    I: IdentityContext,
    A: Authorizer,
    F: FeatureFlags,
{
    pub fn new(content: C, settings: S, identity: I, authorizer: A, flags: F) -> Self {
        let defaults = SchedulerConfig::default();
        Self {
            content,
            settings,
            identity,
            authorizer,
            flags,
            user_setting: defaults.user_output_setting,
            system_setting: defaults.system_output_setting,
        }
    }

    /// Use other setting keys for the user and system defaults
    pub fn with_setting_keys(mut self, user: impl Into<String>, system: impl Into<String>) -> Self {
        self.user_setting = user.into();
        self.system_setting = system.into();
        self
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Resolve the output path for a run of `owner`'s job.
    ///
    /// `Ok(None)` means every candidate was tried and none was usable.
    pub async fn resolve(
        &self,
        owner: &Identity,
        requested: Option<&str>,
        file_pattern: &str,
    ) -> Result<Option<String>, SchedulerError> {
        if !self.authorizer.can_schedule(owner).await {
            return Err(SchedulerError::NotAllowed(owner.to_string()));
        }
        self.identity
            .run_as(owner.clone(), self.resolve_as_owner(owner, requested, file_pattern))
            .await
    }

    async fn resolve_as_owner(
        &self,
        owner: &Identity,
        requested: Option<&str>,
        file_pattern: &str,
    ) -> Result<Option<String>, SchedulerError> {
        let requested = requested.map(str::trim).filter(|r| !r.is_empty());
        let mut tried: Vec<String> = Vec::new();

        if let Some(folder) = requested {
            tried.push(folder.to_string());
            if self.is_valid(folder).await {
                return Ok(path::concat(Some(folder), Some(file_pattern)));
            }
        }

        if !self.flags.fallback_enabled() {
            return Err(SchedulerError::UnavailableOutputLocation(
                requested.unwrap_or_default().to_string(),
            ));
        }

        for step in [Fallback::UserSetting, Fallback::SystemSetting, Fallback::Home] {
            let Some(folder) = self.fallback_folder(step, owner).await else {
                continue;
            };
            if tried.contains(&folder) {
                continue;
            }
            let valid = self.is_valid(&folder).await;
            if valid {
                tracing::debug!(owner = %owner, folder = %folder, ?step, "using fallback output folder");
                return Ok(path::concat(Some(&folder), Some(file_pattern)));
            }
            tried.push(folder);
        }

        tracing::warn!(owner = %owner, tried = tried.len(), "no usable output folder");
        Ok(None)
    }

    async fn fallback_folder(&self, step: Fallback, owner: &Identity) -> Option<String> {
        let lookup = match step {
            Fallback::UserSetting => self.settings.user_setting(owner.name(), &self.user_setting).await,
            Fallback::SystemSetting => self.settings.system_setting(&self.system_setting).await,
            Fallback::Home => return Some(self.content.home_folder(owner.name())),
        };
        match lookup {
            Ok(folder) => folder.filter(|f| !f.trim().is_empty()),
            Err(e) => {
                tracing::warn!(?step, error = %e, "output setting lookup failed");
                None
            }
        }
    }

    /// Folder exists and the current identity may read and write it.
    ///
    /// A failing check counts as invalid.
    async fn is_valid(&self, folder: &str) -> bool {
        match self.content.folder_exists(folder).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(folder, "output folder does not exist");
                return false;
            }
            Err(e) => {
                tracing::warn!(folder, error = %e, "output folder check failed");
                return false;
            }
        }
        match self
            .content
            .has_access(folder, &[Permission::Read, Permission::Write])
            .await
        {
            Ok(granted) => {
                if !granted {
                    tracing::debug!(folder, "no read/write access to output folder");
                }
                granted
            }
            Err(e) => {
                tracing::warn!(folder, error = %e, "output folder access check failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Fallback {
    UserSetting,
    SystemSetting,
    Home,
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
