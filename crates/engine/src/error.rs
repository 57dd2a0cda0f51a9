// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduling engine

use rj_adapters::{BackendError, ContentError};
use rj_core::{JobKeyError, TranslateError};
use thiserror::Error;

/// Errors surfaced by scheduling operations and job runs
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("no usable output location for {0}")]
    UnavailableOutputLocation(String),
    #[error("{0} is not allowed to schedule work")]
    NotAllowed(String),
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("trigger error: {0}")]
    Translate(#[from] TranslateError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("execution failed: {0}")]
    Execution(String),
}

impl From<JobKeyError> for SchedulerError {
    fn from(err: JobKeyError) -> Self {
        match err {
            JobKeyError::InvalidArgument(msg) => SchedulerError::InvalidArgument(msg),
            JobKeyError::InvalidFormat(msg) => SchedulerError::InvalidFormat(msg),
        }
    }
}
