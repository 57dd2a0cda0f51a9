// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory trigger backend
//!
//! Stores jobs, triggers and calendars but does not fire anything itself;
//! [`MemoryTriggerBackend::mark_fired`] records a fire the way a real
//! engine would.

use super::{BackendError, TriggerBackend};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rj_core::{
    BackendSchedule, BackendTrigger, BackendTriggerState, BlockoutWindow, JobDetail, JobKey, NamedCalendar,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

struct StoredJob {
    detail: JobDetail,
    triggers: Vec<BackendTrigger>,
}

#[derive(Default)]
struct MemoryState {
    jobs: BTreeMap<JobKey, StoredJob>,
    calendars: HashMap<String, BlockoutWindow>,
    states: HashMap<String, BackendTriggerState>,
    detail_writes_fail: bool,
    unavailable: bool,
}

#[derive(Clone, Default)]
pub struct MemoryTriggerBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTriggerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn available(&self) -> Result<MutexGuard<'_, MemoryState>, BackendError> {
        let state = self.lock();
        if state.unavailable {
            return Err(BackendError::Unavailable("memory backend offline".to_string()));
        }
        Ok(state)
    }

    /// Make `store_job_detail` fail while leaving reads working
    pub fn fail_detail_writes(&self, fails: bool) {
        self.lock().detail_writes_fail = fails;
    }

    /// Make every call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Record that `trigger_name` fired at `at`.
    ///
    /// One-shot manual triggers are complete once fired and are dropped.
    pub fn mark_fired(&self, trigger_name: &str, at: DateTime<Utc>) {
        let mut state = self.lock();
        let mut completed = Vec::new();
        for job in state.jobs.values_mut() {
            for trigger in job.triggers.iter_mut().filter(|t| t.name == trigger_name) {
                trigger.previous_fire_time = Some(at);
            }
            job.triggers.retain(|t| {
                let done = t.name == trigger_name && is_one_shot_manual(t);
                if done {
                    completed.push(t.name.clone());
                }
                !done
            });
        }
        for name in completed {
            state.states.remove(&name);
        }
    }

    /// Force the reported state of a trigger
    pub fn set_trigger_state(&self, trigger_name: &str, state: BackendTriggerState) {
        self.lock().states.insert(trigger_name.to_string(), state);
    }

    fn register_calendar(
        state: &mut MemoryState,
        trigger: &BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError> {
        if let Some(calendar) = calendar {
            state.calendars.insert(calendar.name, calendar.window);
        }
        match &trigger.calendar_name {
            Some(name) if !state.calendars.contains_key(name) => {
                Err(BackendError::CalendarNotFound(name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Drop calendars no remaining trigger is bound to
    fn release_calendars(state: &mut MemoryState, names: impl IntoIterator<Item = String>) {
        for name in names {
            let in_use = state
                .jobs
                .values()
                .flat_map(|j| j.triggers.iter())
                .any(|t| t.calendar_name.as_deref() == Some(name.as_str()));
            if !in_use {
                state.calendars.remove(&name);
            }
        }
    }

    fn prepare(mut trigger: BackendTrigger) -> BackendTrigger {
        if trigger.next_fire_time.is_none() {
            trigger.next_fire_time = Some(trigger.start_time);
        }
        trigger
    }
}

#[async_trait]
impl TriggerBackend for MemoryTriggerBackend {
    async fn schedule(
        &self,
        detail: JobDetail,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError> {
        let mut state = self.available()?;
        if state.jobs.contains_key(&detail.key) {
            return Err(BackendError::AlreadyExists(detail.key.to_string()));
        }
        Self::register_calendar(&mut state, &trigger, calendar)?;
        state
            .states
            .insert(trigger.name.clone(), BackendTriggerState::Normal);
        state.jobs.insert(
            detail.key.clone(),
            StoredJob {
                detail,
                triggers: vec![Self::prepare(trigger)],
            },
        );
        Ok(())
    }

    async fn reschedule(
        &self,
        trigger: BackendTrigger,
        calendar: Option<NamedCalendar>,
    ) -> Result<(), BackendError> {
        let mut state = self.available()?;
        Self::register_calendar(&mut state, &trigger, calendar)?;
        let job = state
            .jobs
            .get_mut(&trigger.job_key)
            .ok_or_else(|| BackendError::JobNotFound(trigger.job_key.to_string()))?;
        let slot = job
            .triggers
            .iter_mut()
            .find(|t| t.name == trigger.name)
            .ok_or_else(|| BackendError::TriggerNotFound(trigger.name.clone()))?;
        *slot = Self::prepare(trigger);
        Ok(())
    }

    async fn add_trigger(&self, trigger: BackendTrigger) -> Result<(), BackendError> {
        let mut state = self.available()?;
        let paused = state
            .jobs
            .get(&trigger.job_key)
            .ok_or_else(|| BackendError::JobNotFound(trigger.job_key.to_string()))?
            .triggers
            .iter()
            .any(|t| state.states.get(&t.name) == Some(&BackendTriggerState::Paused));
        let initial = if paused {
            BackendTriggerState::Paused
        } else {
            BackendTriggerState::Normal
        };
        state.states.insert(trigger.name.clone(), initial);
        if let Some(job) = state.jobs.get_mut(&trigger.job_key) {
            job.triggers.push(Self::prepare(trigger));
        }
        Ok(())
    }

    async fn delete_job(&self, key: &JobKey) -> Result<bool, BackendError> {
        let mut state = self.available()?;
        let Some(job) = state.jobs.remove(key) else {
            return Ok(false);
        };
        for trigger in &job.triggers {
            state.states.remove(&trigger.name);
        }
        let calendars = job.triggers.into_iter().filter_map(|t| t.calendar_name);
        Self::release_calendars(&mut state, calendars);
        Ok(true)
    }

    async fn remove_trigger(&self, key: &JobKey, trigger_name: &str) -> Result<bool, BackendError> {
        let mut state = self.available()?;
        let job = state
            .jobs
            .get_mut(key)
            .ok_or_else(|| BackendError::JobNotFound(key.to_string()))?;
        let Some(index) = job.triggers.iter().position(|t| t.name == trigger_name) else {
            return Ok(false);
        };
        let removed = job.triggers.remove(index);
        state.states.remove(&removed.name);
        Self::release_calendars(&mut state, removed.calendar_name);
        Ok(true)
    }

    async fn job_detail(&self, key: &JobKey) -> Result<Option<JobDetail>, BackendError> {
        let state = self.available()?;
        Ok(state.jobs.get(key).map(|j| j.detail.clone()))
    }

    async fn store_job_detail(&self, detail: JobDetail) -> Result<(), BackendError> {
        let mut state = self.available()?;
        if state.detail_writes_fail {
            return Err(BackendError::Unavailable("job detail store".to_string()));
        }
        let job = state
            .jobs
            .get_mut(&detail.key)
            .ok_or_else(|| BackendError::JobNotFound(detail.key.to_string()))?;
        job.detail = detail;
        Ok(())
    }

    async fn job_keys(&self) -> Result<Vec<JobKey>, BackendError> {
        let state = self.available()?;
        Ok(state.jobs.keys().cloned().collect())
    }

    async fn triggers_of_job(&self, key: &JobKey) -> Result<Vec<BackendTrigger>, BackendError> {
        let state = self.available()?;
        Ok(state
            .jobs
            .get(key)
            .map(|j| j.triggers.clone())
            .unwrap_or_default())
    }

    async fn calendar(&self, name: &str) -> Result<Option<BlockoutWindow>, BackendError> {
        let state = self.available()?;
        Ok(state.calendars.get(name).copied())
    }

    async fn set_calendar(&self, name: &str, window: BlockoutWindow) -> Result<(), BackendError> {
        let mut state = self.available()?;
        state.calendars.insert(name.to_string(), window);
        Ok(())
    }

    async fn trigger_state(&self, trigger_name: &str) -> Result<BackendTriggerState, BackendError> {
        let state = self.available()?;
        Ok(state
            .states
            .get(trigger_name)
            .copied()
            .unwrap_or(BackendTriggerState::None))
    }

    async fn pause_job(&self, key: &JobKey) -> Result<(), BackendError> {
        self.set_job_state(key, BackendTriggerState::Paused)
    }

    async fn resume_job(&self, key: &JobKey) -> Result<(), BackendError> {
        self.set_job_state(key, BackendTriggerState::Normal)
    }
}

impl MemoryTriggerBackend {
    fn set_job_state(&self, key: &JobKey, to: BackendTriggerState) -> Result<(), BackendError> {
        let mut state = self.available()?;
        let names: Vec<String> = state
            .jobs
            .get(key)
            .ok_or_else(|| BackendError::JobNotFound(key.to_string()))?
            .triggers
            .iter()
            .map(|t| t.name.clone())
            .collect();
        for name in names {
            state.states.insert(name, to);
        }
        Ok(())
    }
}

fn is_one_shot_manual(trigger: &BackendTrigger) -> bool {
    trigger.is_manual()
        && matches!(
            trigger.schedule,
            BackendSchedule::Interval {
                repeat_count: 0,
                ..
            }
        )
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
