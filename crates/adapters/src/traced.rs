// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::backend::{BackendError, TriggerBackend};
use crate::content::{ContentError, ContentStore, Metadata, OutputStream, Permission, RepositoryFile};
use async_trait::async_trait;
use rj_core::{BackendTrigger, BackendTriggerState, BlockoutWindow, JobDetail, JobKey, NamedCalendar};
use std::time::Instant;
use tracing::Instrument;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Wrapper that adds tracing to any ContentStore
#[derive(Clone)]
pub struct TracedContentStore<C> {
    inner: C,
}

impl<C> TracedContentStore<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ContentStore> ContentStore for TracedContentStore<C> {
    async fn folder_exists(&self, path: &str) -> Result<bool, ContentError> {
        let result = self.inner.folder_exists(path).await;
        tracing::trace!(path, exists = ?result.as_ref().ok(), "checked folder");
        result
    }

    async fn has_access(
        &self,
        path: &str,
        permissions: &[Permission],
    ) -> Result<bool, ContentError> {
        let span = tracing::debug_span!("content.has_access", path, ?permissions);
        async {
            let result = self.inner.has_access(path, permissions).await;
            match &result {
                Ok(granted) => tracing::debug!(granted, "checked access"),
                Err(e) => tracing::warn!(error = %e, "access check failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get_file(&self, path: &str) -> Result<Option<RepositoryFile>, ContentError> {
        let result = self.inner.get_file(path).await;
        tracing::trace!(path, found = ?result.as_ref().ok().map(Option::is_some), "looked up file");
        result
    }

    async fn delete_file(&self, id: &str) -> Result<(), ContentError> {
        let span = tracing::info_span!("content.delete_file", id);
        async {
            let result = self.inner.delete_file(id).await;
            match &result {
                Ok(()) => tracing::info!("file deleted"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn metadata(&self, id: &str) -> Result<Metadata, ContentError> {
        self.inner.metadata(id).await
    }

    async fn set_metadata(&self, id: &str, metadata: Metadata) -> Result<(), ContentError> {
        let span = tracing::debug_span!("content.set_metadata", id, entries = metadata.len());
        async {
            let result = self.inner.set_metadata(id, metadata).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "metadata write failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn open_output(&self, path: &str) -> Result<OutputStream, ContentError> {
        let span = tracing::info_span!("content.open_output", path);
        async {
            let start = Instant::now();
            let result = self.inner.open_output(path).await;
            match &result {
                Ok(_) => tracing::info!(elapsed_ms = elapsed_ms(start), "output opened"),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "open failed")
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn home_folder(&self, user: &str) -> String {
        self.inner.home_folder(user)
    }
}

/// Wrapper that adds tracing to any TriggerBackend
#[derive(Clone)]
pub struct TracedTriggerBackend<B> {
    inner: B,
}

impl<B> TracedTriggerBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: TriggerBackend> TriggerBackend for TracedTriggerBackend<B> {
    async fn schedule(
        &self,
        detail: JobDetail,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError> {
        let span = tracing::info_span!(
            "backend.schedule",
            job = %detail.key,
            trigger = %trigger.name,
        );
        async {
            tracing::info!(calendar = ?calendar.as_ref().map(|c| &c.name), "scheduling");
            let start = Instant::now();
            let result = self.inner.schedule(detail, trigger, calendar).await;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed_ms(start), "job scheduled"),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "schedule failed")
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn reschedule(
        &self,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError> {
        let span = tracing::info_span!("backend.reschedule", trigger = %trigger.name);
        async {
            let result = self.inner.reschedule(trigger, calendar).await;
            match &result {
                Ok(()) => tracing::info!("trigger replaced"),
                Err(e) => tracing::error!(error = %e, "reschedule failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn add_trigger(&self, trigger: BackendTrigger) -> Result<(), BackendError> {
        let span = tracing::info_span!("backend.add_trigger", trigger = %trigger.name);
        async {
            let result = self.inner.add_trigger(trigger).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "add trigger failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete_job(&self, key: &JobKey) -> Result<bool, BackendError> {
        let span = tracing::info_span!("backend.delete_job", job = %key);
        async {
            let result = self.inner.delete_job(key).await;
            match &result {
                Ok(existed) => tracing::info!(existed, "job deleted"),
                Err(e) => tracing::error!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn remove_trigger(&self, key: &JobKey, trigger_name: &str) -> Result<bool, BackendError> {
        let span = tracing::info_span!("backend.remove_trigger", job = %key, trigger = %trigger_name);
        async {
            let result = self.inner.remove_trigger(key, trigger_name).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "trigger removal failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn job_detail(&self, key: &JobKey) -> Result<Option<JobDetail>, BackendError> {
        self.inner.job_detail(key).await
    }

    async fn store_job_detail(&self, detail: JobDetail) -> Result<(), BackendError> {
        let span = tracing::debug_span!("backend.store_job_detail", job = %detail.key);
        async {
            let result = self.inner.store_job_detail(detail).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "job detail write failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn job_keys(&self) -> Result<Vec<JobKey>, BackendError> {
        let result = self.inner.job_keys().await;
        tracing::trace!(count = result.as_ref().map(Vec::len).ok(), "listed jobs");
        result
    }

    async fn triggers_of_job(&self, key: &JobKey) -> Result<Vec<BackendTrigger>, BackendError> {
        self.inner.triggers_of_job(key).await
    }

    async fn calendar(&self, name: &str) -> Result<Option<BlockoutWindow>, BackendError> {
        self.inner.calendar(name).await
    }

    async fn set_calendar(&self, name: &str, window: BlockoutWindow) -> Result<(), BackendError> {
        tracing::debug!(name, ?window, "setting calendar");
        self.inner.set_calendar(name, window).await
    }

    async fn trigger_state(&self, trigger_name: &str) -> Result<BackendTriggerState, BackendError> {
        self.inner.trigger_state(trigger_name).await
    }

    async fn pause_job(&self, key: &JobKey) -> Result<(), BackendError> {
        let result = self.inner.pause_job(key).await;
        match &result {
            Ok(()) => tracing::info!(job = %key, "job paused"),
            Err(e) => tracing::error!(job = %key, error = %e, "pause failed"),
        }
        result
    }

    async fn resume_job(&self, key: &JobKey) -> Result<(), BackendError> {
        let result = self.inner.resume_job(key).await;
        match &result {
            Ok(()) => tracing::info!(job = %key, "job resumed"),
            Err(e) => tracing::error!(job = %key, error = %e, "resume failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
