// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger backend: the engine that persists and fires triggers

mod memory;

pub use memory::MemoryTriggerBackend;

use async_trait::async_trait;
use rj_core::{BackendTrigger, BackendTriggerState, BlockoutWindow, JobDetail, JobKey, NamedCalendar};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("job already exists: {0}")]
    AlreadyExists(String),
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("trigger not found: {0}")]
    TriggerNotFound(String),
    #[error("calendar not found: {0}")]
    CalendarNotFound(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TriggerBackend: Clone + Send + Sync + 'static {
    /// Store a new job with its first trigger and optional calendar
    async fn schedule(
        &self,
        detail: JobDetail,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError>;

    /// Replace the trigger of the same name, registering `calendar` first
    async fn reschedule(
        &self,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError>;

    /// Attach an additional trigger to an existing job
    async fn add_trigger(&self, trigger: BackendTrigger) -> Result<(), BackendError>;

    /// Detach one trigger from a job; `false` when the job had no such trigger
    async fn remove_trigger(&self, key: &JobKey, trigger_name: &str) -> Result<bool, BackendError>;

    /// Remove a job and all its triggers; `false` when there was no such job
    async fn delete_job(&self, key: &JobKey) -> Result<bool, BackendError>;

    async fn job_detail(&self, key: &JobKey) -> Result<Option<JobDetail>, BackendError>;

    /// Overwrite the stored detail of an existing job
    async fn store_job_detail(&self, detail: JobDetail) -> Result<(), BackendError>;

    async fn job_keys(&self) -> Result<Vec<JobKey>, BackendError>;

    async fn triggers_of_job(&self, key: &JobKey) -> Result<Vec<BackendTrigger>, BackendError>;

    async fn calendar(&self, name: &str) -> Result<Option<BlockoutWindow>, BackendError>;

    async fn set_calendar(&self, name: &str, window: BlockoutWindow) -> Result<(), BackendError>;

    async fn trigger_state(&self, trigger_name: &str) -> Result<BackendTriggerState, BackendError>;

    async fn pause_job(&self, key: &JobKey) -> Result<(), BackendError>;

    async fn resume_job(&self, key: &JobKey) -> Result<(), BackendError>;
}
