// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical, UI-facing trigger model

use crate::recurrence::RecurrenceRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display hint chosen in the schedule editor; also picks the interval unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiHint {
    Seconds,
    Minutes,
    Hours,
    Daily,
    RunOnce,
}

impl fmt::Display for UiHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiHint::Seconds => "SECONDS",
            UiHint::Minutes => "MINUTES",
            UiHint::Hours => "HOURS",
            UiHint::Daily => "DAILY",
            UiHint::RunOnce => "RUN_ONCE",
        };
        f.write_str(name)
    }
}

impl FromStr for UiHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SECONDS" => Ok(UiHint::Seconds),
            "MINUTES" => Ok(UiHint::Minutes),
            "HOURS" => Ok(UiHint::Hours),
            "DAILY" => Ok(UiHint::Daily),
            "RUN_ONCE" => Ok(UiHint::RunOnce),
            _ => Err(format!("unknown ui hint: {}", s)),
        }
    }
}

/// Wall-clock start given as calendar fields; seconds are always zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAt {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Fields shared by every trigger kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerTiming {
    /// Explicit start instant; ignored when `start_at` is set
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Start built from calendar fields in the trigger's timezone
    #[serde(default)]
    pub start_at: Option<StartAt>,
    /// `None` is unbounded
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// IANA name; `None` uses the scheduler default
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub ui_hint: Option<UiHint>,
    #[serde(default)]
    pub duration_millis: i64,
}

/// Fixed-interval repetition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTrigger {
    #[serde(flatten)]
    pub timing: TriggerTiming,
    pub repeat_interval_secs: i64,
    /// -1 repeats forever
    pub repeat_count: i32,
}

/// Calendar recurrence described field by field.
///
/// Months are zero-based here (January = 0), the way the schedule editor
/// produces them. The one-based cron form appears only in backend triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexTrigger {
    #[serde(flatten)]
    pub timing: TriggerTiming,
    #[serde(default)]
    pub seconds: Vec<RecurrenceRule>,
    #[serde(default)]
    pub minutes: Vec<RecurrenceRule>,
    #[serde(default)]
    pub hours: Vec<RecurrenceRule>,
    #[serde(default)]
    pub days_of_month: Vec<RecurrenceRule>,
    #[serde(default)]
    pub months: Vec<RecurrenceRule>,
    #[serde(default)]
    pub days_of_week: Vec<RecurrenceRule>,
    #[serde(default)]
    pub years: Vec<RecurrenceRule>,
    /// Cached cron form; reused verbatim when present
    #[serde(default)]
    pub cron_expression: Option<String>,
    /// Legacy "every N days" cadence recovered from old daily schedules
    #[serde(default)]
    pub repeat_interval_secs: Option<i64>,
}

impl ComplexTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seconds(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.seconds = rules;
        self
    }

    pub fn with_minutes(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.minutes = rules;
        self
    }

    pub fn with_hours(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.hours = rules;
        self
    }

    pub fn with_days_of_month(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.days_of_month = rules;
        self
    }

    pub fn with_months(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.months = rules;
        self
    }

    pub fn with_days_of_week(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.days_of_week = rules;
        self
    }

    pub fn with_years(mut self, rules: Vec<RecurrenceRule>) -> Self {
        self.years = rules;
        self
    }

    pub fn with_timing(mut self, timing: TriggerTiming) -> Self {
        self.timing = timing;
        self
    }
}

/// A rule describing when a job runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobTrigger {
    Simple(SimpleTrigger),
    Complex(ComplexTrigger),
}

impl JobTrigger {
    pub fn timing(&self) -> &TriggerTiming {
        match self {
            JobTrigger::Simple(t) => &t.timing,
            JobTrigger::Complex(t) => &t.timing,
        }
    }

    pub fn timing_mut(&mut self) -> &mut TriggerTiming {
        match self {
            JobTrigger::Simple(t) => &mut t.timing,
            JobTrigger::Complex(t) => &mut t.timing,
        }
    }

    pub fn ui_hint(&self) -> Option<UiHint> {
        self.timing().ui_hint
    }
}

impl From<SimpleTrigger> for JobTrigger {
    fn from(trigger: SimpleTrigger) -> Self {
        JobTrigger::Simple(trigger)
    }
}

impl From<ComplexTrigger> for JobTrigger {
    fn from(trigger: ComplexTrigger) -> Self {
        JobTrigger::Complex(trigger)
    }
}
