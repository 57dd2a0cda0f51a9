// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime projection of a scheduled job

use crate::job_key::JobKey;
use crate::trigger::{BackendTriggerState, JobTrigger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Well-known job parameter names
pub mod keys {
    /// Identifies what kind of work the job runs
    pub const ACTION_ID: &str = "action-id";
    /// Epoch millis of the last fire that actually ran the work
    pub const LAST_ACTUAL_EXECUTION: &str = "last-actual-execution";
    /// Epoch millis of the last "run now" request
    pub const LAST_MANUAL_FIRE: &str = "last-manual-fire";
    /// Set when the job was recreated from an earlier instance
    pub const RECREATED_INSTANCE: &str = "recreated-instance";
    /// Correlates produced output with the run that created it
    pub const LINEAGE_ID: &str = "lineage-id";
    /// Recipient of the completion notification
    pub const EMAIL_TO: &str = "email-to";
    /// Resolved output file, injected before the work runs
    pub const OUTPUT_FILE: &str = "output-file";
    /// Schedule editor hint, kept so the trigger can be rebuilt
    pub const UI_HINT: &str = "ui-hint";
    /// Length of a blockout, in milliseconds
    pub const DURATION_MILLIS: &str = "duration-millis";
}

/// Action id of blockout-defining jobs
pub const BLOCKOUT_ACTION_ID: &str = "blockout";

/// Group every job is scheduled under
pub const DEFAULT_JOB_GROUP: &str = "default";

/// Job state, mirrored from the backend's trigger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Normal,
    Paused,
    /// An earlier instance is still running
    Blocked,
    Complete,
    Error,
    Unknown,
}

impl From<BackendTriggerState> for JobState {
    fn from(state: BackendTriggerState) -> Self {
        match state {
            BackendTriggerState::Normal => JobState::Normal,
            BackendTriggerState::Paused => JobState::Paused,
            BackendTriggerState::Blocked => JobState::Blocked,
            BackendTriggerState::Complete => JobState::Complete,
            BackendTriggerState::Error => JobState::Error,
            BackendTriggerState::None => JobState::Unknown,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Normal => "NORMAL",
            JobState::Paused => "PAUSED",
            JobState::Blocked => "BLOCKED",
            JobState::Complete => "COMPLETE",
            JobState::Error => "ERROR",
            JobState::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Free-form job parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParams(BTreeMap<String, Value>);

impl JobParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// Booleans may arrive as JSON bools or as `"true"` strings
    pub fn get_bool(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for jobs that define blockout windows themselves
    pub fn is_blockout(&self) -> bool {
        self.get_str(keys::ACTION_ID) == Some(BLOCKOUT_ACTION_ID)
    }

    pub fn last_actual_execution(&self) -> Option<DateTime<Utc>> {
        self.get_i64(keys::LAST_ACTUAL_EXECUTION)
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl FromIterator<(String, Value)> for JobParams {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the backend stores for a job besides its triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub key: JobKey,
    pub group: String,
    pub params: JobParams,
}

impl JobDetail {
    pub fn new(key: JobKey, params: JobParams) -> Self {
        Self {
            key,
            group: DEFAULT_JOB_GROUP.to_string(),
            params,
        }
    }
}

/// A job as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// The serialized [`JobKey`]
    pub id: String,
    pub name: String,
    pub owner: String,
    pub group: String,
    pub params: JobParams,
    /// `None` when the job only has "run now" triggers
    pub trigger: Option<JobTrigger>,
    pub state: JobState,
    pub next_run: Option<DateTime<Utc>>,
    pub last_run: Option<DateTime<Utc>>,
}

impl Job {
    pub fn key(&self) -> Option<JobKey> {
        JobKey::parse(&self.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_backend_state_maps_to_a_job_state() {
        assert_eq!(JobState::from(BackendTriggerState::Normal), JobState::Normal);
        assert_eq!(JobState::from(BackendTriggerState::Paused), JobState::Paused);
        assert_eq!(JobState::from(BackendTriggerState::Blocked), JobState::Blocked);
        assert_eq!(JobState::from(BackendTriggerState::Complete), JobState::Complete);
        assert_eq!(JobState::from(BackendTriggerState::Error), JobState::Error);
        assert_eq!(JobState::from(BackendTriggerState::None), JobState::Unknown);
    }

    #[test]
    fn blockout_jobs_are_recognized_by_action_id() {
        let params = JobParams::new().with(keys::ACTION_ID, BLOCKOUT_ACTION_ID);
        assert!(params.is_blockout());
        assert!(!JobParams::new().with(keys::ACTION_ID, "report").is_blockout());
        assert!(!JobParams::new().is_blockout());
    }

    #[test]
    fn bool_params_accept_strings() {
        let params = JobParams::new()
            .with("a", true)
            .with("b", "TRUE")
            .with("c", "no")
            .with("d", json!(1));
        assert!(params.get_bool("a"));
        assert!(params.get_bool("b"));
        assert!(!params.get_bool("c"));
        assert!(!params.get_bool("d"));
        assert!(!params.get_bool("missing"));
    }

    #[test]
    fn last_actual_execution_reads_epoch_millis() {
        let params = JobParams::new().with(keys::LAST_ACTUAL_EXECUTION, 1_000_i64);
        assert_eq!(
            params.last_actual_execution(),
            DateTime::from_timestamp_millis(1_000)
        );
    }
}
