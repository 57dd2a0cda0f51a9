// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blockout gate around each fire of a job

use crate::error::SchedulerError;
use rj_adapters::{BlockoutPredicate, TriggerBackend};
use rj_core::{keys, Clock, JobKey, JobParams};
use std::fmt;
use std::future::Future;

/// Audit category of an executed fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionClass {
    FirstSuccess,
    RetriedSuccess,
    FirstFailure,
    RetriedFailure,
}

impl ExecutionClass {
    pub fn classify(recreated: bool, succeeded: bool) -> Self {
        match (recreated, succeeded) {
            (false, true) => ExecutionClass::FirstSuccess,
            (true, true) => ExecutionClass::RetriedSuccess,
            (false, false) => ExecutionClass::FirstFailure,
            (true, false) => ExecutionClass::RetriedFailure,
        }
    }
}

impl fmt::Display for ExecutionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionClass::FirstSuccess => "first_success",
            ExecutionClass::RetriedSuccess => "retried_success",
            ExecutionClass::FirstFailure => "first_failure",
            ExecutionClass::RetriedFailure => "retried_failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A blockout was in effect; nothing ran and nothing was recorded
    Suppressed,
    Executed(ExecutionClass),
}

pub struct BlockoutGate<P, B, C> {
    predicate: P,
    backend: B,
    clock: C,
}

impl<P, B, C> BlockoutGate<P, B, C>
where
    P: BlockoutPredicate,
    B: TriggerBackend,
    C: Clock,
{
    pub fn new(predicate: P, backend: B, clock: C) -> Self {
        Self {
            predicate,
            backend,
            clock,
        }
    }

    /// Fire `key` with the params handed over by the trigger backend: run
    /// `work` unless a blockout is in effect. `work` reports whether the run
    /// succeeded.
    ///
    /// Store outages never block the run. Only a job the backend positively
    /// reports as gone is refused.
    pub async fn fire<W, Fut>(
        &self,
        key: &JobKey,
        mut params: JobParams,
        work: W,
    ) -> Result<FireOutcome, SchedulerError>
    where
        W: FnOnce(JobParams) -> Fut,
        Fut: Future<Output = Result<bool, SchedulerError>>,
    {
        let stored = match self.backend.job_detail(key).await {
            Ok(Some(detail)) => Some(detail),
            Ok(None) => return Err(SchedulerError::JobNotFound(key.to_string())),
            Err(e) => {
                tracing::warn!(job_id = %key, error = %e, "job detail unavailable, using fire params");
                None
            }
        };

        if !params.is_blockout() && !self.allowed(key).await {
            tracing::info!(job_id = %key, "fire suppressed by blockout");
            return Ok(FireOutcome::Suppressed);
        }

        // Recorded before running so last-run only reflects real executions
        let fired_at = self.clock.now_millis();
        params.insert(keys::LAST_ACTUAL_EXECUTION, fired_at);
        if let Some(mut detail) = stored {
            detail.params.insert(keys::LAST_ACTUAL_EXECUTION, fired_at);
            if let Err(e) = self.backend.store_job_detail(detail).await {
                tracing::warn!(job_id = %key, error = %e, "failed to record execution time");
            }
        }

        let recreated = params.get_bool(keys::RECREATED_INSTANCE);
        match work(params).await {
            Ok(succeeded) => {
                let class = ExecutionClass::classify(recreated, succeeded);
                tracing::info!(job_id = %key, outcome = %class, "job executed");
                Ok(FireOutcome::Executed(class))
            }
            Err(e) => {
                let class = ExecutionClass::classify(recreated, false);
                tracing::error!(job_id = %key, outcome = %class, error = %e, "job failed");
                Err(e)
            }
        }
    }

    async fn allowed(&self, key: &JobKey) -> bool {
        match self.predicate.should_fire_now().await {
            Ok(allowed) => allowed,
            Err(e) => {
                tracing::warn!(job_id = %key, error = %e, "blockout check failed, firing anyway");
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
