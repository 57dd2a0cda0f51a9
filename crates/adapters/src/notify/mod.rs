// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-completion notifications (email and similar)

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// A message telling a recipient that a run produced output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    /// Repository path of the produced output
    pub output_path: Option<String>,
}

impl Notification {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            output_path: None,
        }
    }

    pub fn with_output(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Adapter trait for notification delivery
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Drops every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifyAdapter;

#[async_trait]
impl NotifyAdapter for NoOpNotifyAdapter {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::debug!(recipient = %notification.recipient, "notification dropped");
        Ok(())
    }
}
