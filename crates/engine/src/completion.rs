// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion signal for output produced after `execute` returns

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Pending,
    FileCreated,
    StreamComplete,
    Failed,
}

impl CompletionState {
    pub fn is_done(self) -> bool {
        self != CompletionState::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no completion signal after {0:?}")]
pub struct WaitTimedOut(pub Duration);

/// Shared by the producer (which signals) and the run (which waits)
#[derive(Clone)]
pub struct CompletionSignal {
    tx: Arc<watch::Sender<CompletionState>>,
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CompletionState::Pending);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> CompletionState {
        *self.tx.borrow()
    }

    pub fn file_created(&self) {
        self.settle(CompletionState::FileCreated);
    }

    pub fn stream_complete(&self) {
        self.settle(CompletionState::StreamComplete);
    }

    /// Release any waiter without a result
    pub fn fail(&self) {
        self.settle(CompletionState::Failed);
    }

    /// The first terminal state sticks
    fn settle(&self, to: CompletionState) {
        self.tx.send_if_modified(|state| {
            if state.is_done() {
                return false;
            }
            *state = to;
            true
        });
    }

    /// Wait for a terminal state, re-checking at least every `poll`.
    ///
    /// With no `timeout` this waits indefinitely; the periodic re-check only
    /// guards against a missed wake-up.
    pub async fn wait(
        &self,
        poll: Duration,
        timeout: Option<Duration>,
    ) -> Result<CompletionState, WaitTimedOut> {
        let mut rx = self.tx.subscribe();
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let state = *rx.borrow_and_update();
            if state.is_done() {
                return Ok(state);
            }
            let mut slice = poll;
            if let (Some(deadline), Some(limit)) = (deadline, timeout) {
                let now = Instant::now();
                if now >= deadline {
                    return Err(WaitTimedOut(limit));
                }
                slice = slice.min(deadline - now);
            }
            // Ok or Err, the loop re-reads the state
            let _ = tokio::time::timeout(slice, rx.changed()).await;
        }
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
