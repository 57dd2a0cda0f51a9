// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job scheduling service
//!
//! Every operation that touches both a job's stored detail and its triggers
//! holds one lock for the whole exchange with the backend: queries take it
//! shared, mutations take it exclusive.

use crate::error::SchedulerError;
use rj_adapters::TriggerBackend;
use rj_core::trigger::{parse_ui_hint, MANUAL_TRIGGER_PREFIX};
use rj_core::{
    keys, select_reported_trigger, BackendSchedule, BackendTrigger, Clock, IdGen, IntervalUnit,
    Job, JobDetail, JobKey, JobParams, JobState, JobTrigger, NamedCalendar, TriggerTranslator,
};
use tokio::sync::RwLock;

pub struct JobScheduler<B, C, G> {
    backend: B,
    translator: TriggerTranslator,
    clock: C,
    id_gen: G,
    lock: RwLock<()>,
}

impl<B, C, G> JobScheduler<B, C, G>
where
    B: TriggerBackend,
    C: Clock,
    G: IdGen,
{
    pub fn new(backend: B, translator: TriggerTranslator, clock: C, id_gen: G) -> Self {
        Self {
            backend,
            translator,
            clock,
            id_gen,
            lock: RwLock::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn create_job(
        &self,
        name: &str,
        owner: &str,
        params: JobParams,
        trigger: JobTrigger,
    ) -> Result<Job, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::create(name, owner, &self.id_gen)?;
        let plan = self.translator.to_backend(&trigger, &key, self.clock.now())?;
        let detail = JobDetail::new(key.clone(), with_trigger_params(params, &trigger));
        self.backend
            .schedule(detail, plan.trigger, plan.calendar)
            .await?;
        tracing::info!(job_id = %key, "job created");
        self.project(&key).await
    }

    /// Replace a job's trigger, and its params when given
    pub async fn update_job(
        &self,
        id: &str,
        params: Option<JobParams>,
        trigger: JobTrigger,
    ) -> Result<Job, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::parse(id)?;
        let mut detail = self.require_detail(&key).await?;
        let plan = self.translator.to_backend(&trigger, &key, self.clock.now())?;
        let previous = self.snapshot_trigger(&key, &plan.trigger.name).await?;
        self.backend.reschedule(plan.trigger, plan.calendar).await?;
        detail.params = with_trigger_params(params.unwrap_or(detail.params), &trigger);
        if let Err(e) = self.backend.store_job_detail(detail).await {
            if let Some((old_trigger, old_calendar)) = previous {
                if let Err(restore) = self.backend.reschedule(old_trigger, old_calendar).await {
                    tracing::warn!(job_id = %key, error = %restore, "could not restore trigger");
                }
            }
            return Err(e.into());
        }
        tracing::info!(job_id = %key, "job updated");
        self.project(&key).await
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, SchedulerError> {
        let _guard = self.lock.read().await;
        let key = JobKey::parse(id)?;
        self.project(&key).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, SchedulerError> {
        let _guard = self.lock.read().await;
        let mut jobs = Vec::new();
        for key in self.backend.job_keys().await? {
            match self.project(&key).await {
                Ok(job) => jobs.push(job),
                Err(SchedulerError::JobNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(jobs)
    }

    /// Fire a job now: stamp the manual fire time and add a one-shot trigger
    pub async fn trigger_now(&self, id: &str) -> Result<Job, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::parse(id)?;
        let mut detail = self.require_detail(&key).await?;
        let now = self.clock.now();
        detail
            .params
            .insert(keys::LAST_MANUAL_FIRE, now.timestamp_millis());
        let trigger = BackendTrigger {
            name: format!("{}{}", MANUAL_TRIGGER_PREFIX, self.id_gen.next()),
            job_key: key.clone(),
            schedule: BackendSchedule::Interval {
                value: 0,
                unit: IntervalUnit::Second,
                repeat_count: 0,
            },
            start_time: now,
            end_time: None,
            calendar_name: None,
            next_fire_time: None,
            previous_fire_time: None,
        };
        let manual_name = trigger.name.clone();
        self.backend.add_trigger(trigger).await?;
        if let Err(e) = self.backend.store_job_detail(detail).await {
            if let Err(restore) = self.backend.remove_trigger(&key, &manual_name).await {
                tracing::warn!(job_id = %key, error = %restore, "could not withdraw manual trigger");
            }
            return Err(e.into());
        }
        tracing::info!(job_id = %key, "job triggered manually");
        self.project(&key).await
    }

    pub async fn pause_job(&self, id: &str) -> Result<Job, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::parse(id)?;
        self.require_detail(&key).await?;
        self.backend.pause_job(&key).await?;
        self.project(&key).await
    }

    pub async fn resume_job(&self, id: &str) -> Result<Job, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::parse(id)?;
        self.require_detail(&key).await?;
        self.backend.resume_job(&key).await?;
        self.project(&key).await
    }

    /// `false` when there was no such job
    pub async fn remove_job(&self, id: &str) -> Result<bool, SchedulerError> {
        let _guard = self.lock.write().await;
        let key = JobKey::parse(id)?;
        let removed = self.backend.delete_job(&key).await?;
        tracing::info!(job_id = %key, removed, "job removed");
        Ok(removed)
    }

    pub async fn job_state(&self, id: &str) -> Result<JobState, SchedulerError> {
        let _guard = self.lock.read().await;
        let key = JobKey::parse(id)?;
        self.require_detail(&key).await?;
        let triggers = self.backend.triggers_of_job(&key).await?;
        match select_reported_trigger(&triggers) {
            Some(trigger) => Ok(self.backend.trigger_state(&trigger.name).await?.into()),
            None => Ok(JobState::Unknown),
        }
    }

    async fn require_detail(&self, key: &JobKey) -> Result<JobDetail, SchedulerError> {
        self.backend
            .job_detail(key)
            .await?
            .ok_or_else(|| SchedulerError::JobNotFound(key.to_string()))
    }

    /// The stored trigger of that name with its calendar, for rollback
    async fn snapshot_trigger(
        &self,
        key: &JobKey,
        name: &str,
    ) -> Result<Option<(BackendTrigger, Option<NamedCalendar>)>, SchedulerError> {
        let triggers = self.backend.triggers_of_job(key).await?;
        let Some(trigger) = triggers.into_iter().find(|t| t.name == name) else {
            return Ok(None);
        };
        let calendar = match &trigger.calendar_name {
            Some(calendar_name) => self
                .backend
                .calendar(calendar_name)
                .await?
                .map(|window| NamedCalendar {
                    name: calendar_name.clone(),
                    window,
                }),
            None => None,
        };
        Ok(Some((trigger, calendar)))
    }

    /// Build the caller-facing view of a job. Callers hold the lock.
    async fn project(&self, key: &JobKey) -> Result<Job, SchedulerError> {
        let detail = self.require_detail(key).await?;
        let triggers = self.backend.triggers_of_job(key).await?;

        let (trigger, state, next_run) = match select_reported_trigger(&triggers) {
            Some(reported) => {
                let calendar = match &reported.calendar_name {
                    Some(name) => self.backend.calendar(name).await?,
                    None => None,
                };
                let hint = detail.params.get_str(keys::UI_HINT).and_then(|text| {
                    parse_ui_hint(text)
                        .map_err(|e| tracing::warn!(job_id = %key, error = %e, "ignoring stored hint"))
                        .ok()
                });
                let mut trigger = self
                    .translator
                    .from_backend(reported, calendar.as_ref(), hint)?;
                trigger.timing_mut().duration_millis =
                    detail.params.get_i64(keys::DURATION_MILLIS).unwrap_or(0);
                let state = self.backend.trigger_state(&reported.name).await?;
                (Some(trigger), state.into(), reported.next_fire_time)
            }
            None => (None, JobState::Unknown, None),
        };

        let last_run = detail.params.last_actual_execution();
        Ok(Job {
            id: key.to_string(),
            name: key.name().to_string(),
            owner: key.owner().to_string(),
            group: detail.group,
            params: detail.params,
            trigger,
            state,
            next_run,
            last_run,
        })
    }
}

/// Keep what the backend cannot store about a trigger in the job params
fn with_trigger_params(mut params: JobParams, trigger: &JobTrigger) -> JobParams {
    match trigger.ui_hint() {
        Some(hint) => params.insert(keys::UI_HINT, hint.to_string()),
        None => {
            params.remove(keys::UI_HINT);
        }
    }
    let duration = trigger.timing().duration_millis;
    if duration > 0 {
        params.insert(keys::DURATION_MILLIS, duration);
    } else {
        params.remove(keys::DURATION_MILLIS);
    }
    params
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
