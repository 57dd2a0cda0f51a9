// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rj-core: pure model of the recurring job scheduler
//!
//! This crate provides:
//! - Cron recurrence rules and the field-level codec
//! - Job keys, job state and parameters
//! - The canonical trigger model and its translation to backend primitives
//! - Availability windows bound to backend triggers
//!
//! Nothing here performs I/O; collaborators live in `rj-adapters`.

pub mod calendar;
pub mod clock;
pub mod id;
pub mod job;
pub mod job_key;
pub mod path;
pub mod recurrence;
pub mod trigger;

pub use calendar::BlockoutWindow;
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::{keys, Job, JobDetail, JobParams, JobState, BLOCKOUT_ACTION_ID, DEFAULT_JOB_GROUP};
pub use job_key::{JobKey, JobKeyError};
pub use recurrence::{
    encode_field, parse_field, CodecError, CronExpression, CronField, RecurrenceRule, Weekday,
    WeekdayOrdinal,
};
pub use trigger::{
    select_reported_trigger, BackendPlan, BackendSchedule, BackendTrigger, BackendTriggerState,
    ComplexTrigger, IntervalUnit, JobTrigger, NamedCalendar, SimpleTrigger, StartAt,
    TranslateError, TriggerTiming, TriggerTranslator, UiHint,
};
