// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Notification, NotifyAdapter, NotifyError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    sent: Vec<Notification>,
    fails: bool,
}

/// Fake notification adapter that records what it was asked to send
#[derive(Clone, Default)]
pub struct FakeNotifyAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail (the attempt is still recorded)
    pub fn set_failing(&self, fails: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fails = fails;
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sent
            .clone()
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sent.push(notification);
        if state.fails {
            return Err(NotifyError::Failed("mail server unreachable".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
