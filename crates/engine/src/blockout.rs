// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blockout predicate backed by the scheduled blockout jobs
//!
//! A blockout job's fire opens a window of `duration-millis`; ordinary work
//! is suppressed while any window is open.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rj_adapters::{BackendError, BlockoutPredicate, TriggerBackend};
use rj_core::{keys, select_reported_trigger, Clock, JobKey};

#[derive(Clone)]
pub struct BlockoutManager<B, C> {
    backend: B,
    clock: C,
}

impl<B, C> BlockoutManager<B, C>
where
    B: TriggerBackend,
    C: Clock + 'static,
{
    pub fn new(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    /// Blockout jobs whose window contains `at`
    pub async fn active_blockouts(&self, at: DateTime<Utc>) -> Result<Vec<JobKey>, BackendError> {
        let mut active = Vec::new();
        for key in self.backend.job_keys().await? {
            let Some(detail) = self.backend.job_detail(&key).await? else {
                continue;
            };
            if !detail.params.is_blockout() {
                continue;
            }
            let duration = detail.params.get_i64(keys::DURATION_MILLIS).unwrap_or(0);
            let triggers = self.backend.triggers_of_job(&key).await?;
            let opened = select_reported_trigger(&triggers).and_then(|t| t.previous_fire_time);
            if let Some(opened) = opened {
                if window_contains(opened, duration, at) {
                    active.push(key);
                }
            }
        }
        Ok(active)
    }
}

/// `[opened, opened + duration_millis)`
fn window_contains(opened: DateTime<Utc>, duration_millis: i64, at: DateTime<Utc>) -> bool {
    at >= opened && at < opened + Duration::milliseconds(duration_millis.max(0))
}

#[async_trait]
impl<B, C> BlockoutPredicate for BlockoutManager<B, C>
where
    B: TriggerBackend,
    C: Clock + 'static,
{
    async fn should_fire_now(&self) -> Result<bool, BackendError> {
        let active = self.active_blockouts(self.clock.now()).await?;
        if let Some(key) = active.first() {
            tracing::debug!(blockout = %key, count = active.len(), "blockout in effect");
        }
        Ok(active.is_empty())
    }
}

#[cfg(test)]
#[path = "blockout_tests.rs"]
mod tests;
