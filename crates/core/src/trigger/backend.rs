// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling primitives understood by the trigger backend

use crate::job_key::JobKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of one-shot triggers added by "run now" start with this marker
pub const MANUAL_TRIGGER_PREFIX: &str = "MT_";

/// Prefix of availability calendars attached to complex triggers
pub const CALENDAR_PREFIX: &str = "availability_";

/// Unit of a backend interval trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    /// Seconds per unit. Months and years use 30 and 365 days.
    pub fn seconds(self) -> i64 {
        match self {
            IntervalUnit::Second => 1,
            IntervalUnit::Minute => 60,
            IntervalUnit::Hour => 3_600,
            IntervalUnit::Day => 86_400,
            IntervalUnit::Week => 7 * 86_400,
            IntervalUnit::Month => 30 * 86_400,
            IntervalUnit::Year => 365 * 86_400,
        }
    }
}

/// How a backend trigger repeats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendSchedule {
    Interval {
        value: i64,
        unit: IntervalUnit,
        /// -1 repeats forever
        repeat_count: i32,
    },
    Cron {
        expression: String,
        timezone: String,
    },
    /// A trigger type the backend holds but this crate does not model
    Other { name: String },
}

/// A trigger as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTrigger {
    pub name: String,
    pub job_key: JobKey,
    pub schedule: BackendSchedule,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Availability calendar the trigger is bound to
    pub calendar_name: Option<String>,
    pub next_fire_time: Option<DateTime<Utc>>,
    pub previous_fire_time: Option<DateTime<Utc>>,
}

impl BackendTrigger {
    pub fn is_manual(&self) -> bool {
        is_manual_trigger(&self.name)
    }
}

pub fn is_manual_trigger(name: &str) -> bool {
    name.starts_with(MANUAL_TRIGGER_PREFIX)
}

/// The trigger to report for a job: the first one not added by "run now".
///
/// A job that only has manual triggers reports none.
pub fn select_reported_trigger(triggers: &[BackendTrigger]) -> Option<&BackendTrigger> {
    triggers.iter().find(|t| !t.is_manual())
}

/// Trigger state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendTriggerState {
    /// The backend does not know the trigger
    None,
    Normal,
    Paused,
    Complete,
    Error,
    Blocked,
}

impl fmt::Display for BackendTriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendTriggerState::None => "none",
            BackendTriggerState::Normal => "normal",
            BackendTriggerState::Paused => "paused",
            BackendTriggerState::Complete => "complete",
            BackendTriggerState::Error => "error",
            BackendTriggerState::Blocked => "blocked",
        };
        f.write_str(name)
    }
}
