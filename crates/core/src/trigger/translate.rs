// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversion between canonical triggers and backend primitives
//!
//! The translator is pure: the caller supplies "now", and nothing is cached
//! between calls, so one instance can be shared freely across threads.

use super::backend::{BackendSchedule, BackendTrigger, IntervalUnit, CALENDAR_PREFIX};
use super::model::{ComplexTrigger, JobTrigger, SimpleTrigger, TriggerTiming, UiHint};
use crate::calendar::BlockoutWindow;
use crate::job_key::JobKey;
use crate::recurrence::{CodecError, CronExpression, RecurrenceRule};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

/// Interval value stored for run-once triggers (unit: years).
///
/// Marks "fires once, next repeat is far away"; it is not a real cadence.
pub const RUN_ONCE_INTERVAL: i64 = 2;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("malformed cron expression: {0}")]
    InvalidCron(#[from] CodecError),
    #[error("unsupported trigger type: {0}")]
    UnsupportedTriggerType(String),
}

/// An availability calendar together with the name it is registered under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCalendar {
    pub name: String,
    pub window: BlockoutWindow,
}

/// Everything the backend needs to schedule one trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendPlan {
    pub trigger: BackendTrigger,
    pub calendar: Option<NamedCalendar>,
}

#[derive(Debug, Clone)]
pub struct TriggerTranslator {
    default_timezone: Tz,
}

impl Default for TriggerTranslator {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl TriggerTranslator {
    pub fn new(default_timezone: Tz) -> Self {
        Self { default_timezone }
    }

    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    pub fn resolve_timezone(&self, name: Option<&str>) -> Result<Tz, TranslateError> {
        match name {
            None => Ok(self.default_timezone),
            Some(name) => name.parse::<Tz>().map_err(|e| {
                TranslateError::InvalidArgument(format!("unknown timezone {}: {}", name, e))
            }),
        }
    }

    /// Resolve the first instant a trigger may fire.
    ///
    /// Calendar fields win over an explicit instant; with neither, `now`.
    pub fn start_time(
        &self,
        timing: &TriggerTiming,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TranslateError> {
        let Some(at) = timing.start_at else {
            return Ok(timing.start_time.unwrap_or(now));
        };
        let tz = self.resolve_timezone(timing.timezone.as_deref())?;
        let local = tz
            .with_ymd_and_hms(at.year, at.month, at.day, at.hour, at.minute, 0)
            .earliest()
            .ok_or_else(|| {
                TranslateError::InvalidArgument(format!(
                    "start {:04}-{:02}-{:02} {:02}:{:02} does not exist in {}",
                    at.year,
                    at.month,
                    at.day,
                    at.hour,
                    at.minute,
                    tz.name()
                ))
            })?;
        Ok(local.with_timezone(&Utc))
    }

    pub fn to_backend(
        &self,
        trigger: &JobTrigger,
        key: &JobKey,
        now: DateTime<Utc>,
    ) -> Result<BackendPlan, TranslateError> {
        match trigger {
            JobTrigger::Simple(simple) => self.simple_to_backend(simple, key, now),
            JobTrigger::Complex(complex) => self.complex_to_backend(complex, key, now),
        }
    }

    fn simple_to_backend(
        &self,
        trigger: &SimpleTrigger,
        key: &JobKey,
        now: DateTime<Utc>,
    ) -> Result<BackendPlan, TranslateError> {
        if trigger.repeat_interval_secs < 0 {
            return Err(TranslateError::InvalidArgument(format!(
                "negative repeat interval: {}",
                trigger.repeat_interval_secs
            )));
        }
        if trigger.repeat_count < -1 {
            return Err(TranslateError::InvalidArgument(format!(
                "invalid repeat count: {}",
                trigger.repeat_count
            )));
        }

        let hint = trigger.timing.ui_hint;
        let (value, unit) = interval_for(hint, trigger.repeat_interval_secs);
        let repeat_count = match hint {
            Some(UiHint::RunOnce) => 0,
            _ => trigger.repeat_count,
        };
        let (start_time, end_time) = self.bounds(&trigger.timing, now)?;

        Ok(BackendPlan {
            trigger: BackendTrigger {
                name: key.to_string(),
                job_key: key.clone(),
                schedule: BackendSchedule::Interval {
                    value,
                    unit,
                    repeat_count,
                },
                start_time,
                end_time,
                calendar_name: None,
                next_fire_time: None,
                previous_fire_time: None,
            },
            calendar: None,
        })
    }

    fn complex_to_backend(
        &self,
        trigger: &ComplexTrigger,
        key: &JobKey,
        now: DateTime<Utc>,
    ) -> Result<BackendPlan, TranslateError> {
        let timing = &trigger.timing;
        let tz = self.resolve_timezone(timing.timezone.as_deref())?;
        let expression = match &trigger.cron_expression {
            Some(cached) => {
                CronExpression::parse(cached)?;
                cached.trim().to_string()
            }
            None => {
                let generated = cron_expression(trigger).to_string();
                // Rule sets are not range-checked on construction
                CronExpression::parse(&generated)?;
                generated
            }
        };
        let (start_time, end_time) = self.bounds(timing, now)?;

        let bounded =
            timing.start_at.is_some() || timing.start_time.is_some() || timing.end_time.is_some();
        let calendar = bounded.then(|| NamedCalendar {
            name: format!("{}{}", CALENDAR_PREFIX, key.unique_id()),
            window: BlockoutWindow::new(
                Some(start_time.timestamp_millis()),
                end_time.map(|t| t.timestamp_millis()),
            ),
        });

        Ok(BackendPlan {
            trigger: BackendTrigger {
                name: key.to_string(),
                job_key: key.clone(),
                schedule: BackendSchedule::Cron {
                    expression,
                    timezone: tz.name().to_string(),
                },
                start_time,
                end_time,
                calendar_name: calendar.as_ref().map(|c| c.name.clone()),
                next_fire_time: None,
                previous_fire_time: None,
            },
            calendar,
        })
    }

    fn bounds(
        &self,
        timing: &TriggerTiming,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, Option<DateTime<Utc>>), TranslateError> {
        let start = self.start_time(timing, now)?;
        if let Some(end) = timing.end_time {
            if end < start {
                return Err(TranslateError::InvalidArgument(format!(
                    "end {} is before start {}",
                    end, start
                )));
            }
        }
        Ok((start, timing.end_time))
    }

    /// Rebuild the canonical trigger from backend state.
    ///
    /// `ui_hint` is the hint recorded when the job was scheduled; backends do
    /// not keep it themselves.
    pub fn from_backend(
        &self,
        trigger: &BackendTrigger,
        calendar: Option<&BlockoutWindow>,
        ui_hint: Option<UiHint>,
    ) -> Result<JobTrigger, TranslateError> {
        match &trigger.schedule {
            BackendSchedule::Interval {
                value,
                unit,
                repeat_count,
            } => {
                let (hint, repeat_interval_secs) =
                    if *unit == IntervalUnit::Year && *value == RUN_ONCE_INTERVAL {
                        (UiHint::RunOnce, 0)
                    } else {
                        (
                            ui_hint.unwrap_or_else(|| hint_for_unit(*unit)),
                            interval_seconds(*value, *unit),
                        )
                    };
                Ok(JobTrigger::Simple(SimpleTrigger {
                    timing: TriggerTiming {
                        start_time: Some(trigger.start_time),
                        end_time: trigger.end_time,
                        ui_hint: Some(hint),
                        ..TriggerTiming::default()
                    },
                    repeat_interval_secs,
                    repeat_count: *repeat_count,
                }))
            }
            BackendSchedule::Cron {
                expression,
                timezone,
            } => {
                let cron = CronExpression::parse(expression)?;
                let (start_time, end_time) = match calendar {
                    Some(window) => (
                        window
                            .start_time
                            .and_then(DateTime::from_timestamp_millis)
                            .unwrap_or(trigger.start_time),
                        window
                            .end_time
                            .and_then(DateTime::from_timestamp_millis)
                            .or(trigger.end_time),
                    ),
                    None => (trigger.start_time, trigger.end_time),
                };

                let mut complex = ComplexTrigger {
                    timing: TriggerTiming {
                        start_time: Some(start_time),
                        end_time,
                        timezone: Some(timezone.clone()),
                        ui_hint,
                        ..TriggerTiming::default()
                    },
                    months: shift_months(&cron.months, |m| m.saturating_sub(1)),
                    seconds: cron.seconds,
                    minutes: cron.minutes,
                    hours: cron.hours,
                    days_of_month: cron.days_of_month,
                    days_of_week: cron.days_of_week,
                    years: cron.years,
                    cron_expression: Some(expression.clone()),
                    repeat_interval_secs: None,
                };
                if complex.days_of_week.is_empty() && ui_hint == Some(UiHint::Daily) {
                    complex.repeat_interval_secs = legacy_daily_cadence(&complex.days_of_month);
                }
                Ok(JobTrigger::Complex(complex))
            }
            BackendSchedule::Other { name } => {
                Err(TranslateError::UnsupportedTriggerType(name.clone()))
            }
        }
    }
}

/// Build the cron form of a complex trigger, moving months to one-based
pub fn cron_expression(trigger: &ComplexTrigger) -> CronExpression {
    CronExpression {
        seconds: trigger.seconds.clone(),
        minutes: trigger.minutes.clone(),
        hours: trigger.hours.clone(),
        days_of_month: trigger.days_of_month.clone(),
        months: shift_months(&trigger.months, |m| m + 1),
        days_of_week: trigger.days_of_week.clone(),
        years: trigger.years.clone(),
    }
}

fn shift_months(rules: &[RecurrenceRule], f: impl Fn(u32) -> u32 + Copy) -> Vec<RecurrenceRule> {
    rules.iter().map(|rule| rule.map_values(f)).collect()
}

/// Interval value and unit for a repeat interval under a display hint.
///
/// No hint means daily. An interval that does not divide evenly into the
/// hinted unit is kept in seconds so the cadence is never rounded.
pub fn interval_for(hint: Option<UiHint>, repeat_interval_secs: i64) -> (i64, IntervalUnit) {
    let unit = match hint.unwrap_or(UiHint::Daily) {
        UiHint::Seconds => IntervalUnit::Second,
        UiHint::Minutes => IntervalUnit::Minute,
        UiHint::Hours => IntervalUnit::Hour,
        UiHint::Daily => IntervalUnit::Day,
        UiHint::RunOnce => return (RUN_ONCE_INTERVAL, IntervalUnit::Year),
    };
    if repeat_interval_secs % unit.seconds() == 0 {
        (repeat_interval_secs / unit.seconds(), unit)
    } else {
        (repeat_interval_secs, IntervalUnit::Second)
    }
}

pub fn interval_seconds(value: i64, unit: IntervalUnit) -> i64 {
    value.saturating_mul(unit.seconds())
}

/// Parse a stored hint; anything unrecognized is an invalid argument
pub fn parse_ui_hint(text: &str) -> Result<UiHint, TranslateError> {
    text.parse().map_err(TranslateError::InvalidArgument)
}

fn hint_for_unit(unit: IntervalUnit) -> UiHint {
    match unit {
        IntervalUnit::Second => UiHint::Seconds,
        IntervalUnit::Minute => UiHint::Minutes,
        IntervalUnit::Hour => UiHint::Hours,
        _ => UiHint::Daily,
    }
}

/// Old daily schedules were stored as `*/N` on the day of month
fn legacy_daily_cadence(days_of_month: &[RecurrenceRule]) -> Option<i64> {
    match days_of_month {
        [RecurrenceRule::Step { interval, .. }] => Some(i64::from(*interval) * SECONDS_PER_DAY),
        _ => None,
    }
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
