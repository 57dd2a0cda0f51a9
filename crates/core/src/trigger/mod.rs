// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers: the canonical model, backend primitives, and translation
//! between the two

mod backend;
mod model;
mod translate;

pub use backend::{
    is_manual_trigger, select_reported_trigger, BackendSchedule, BackendTrigger,
    BackendTriggerState, IntervalUnit, CALENDAR_PREFIX, MANUAL_TRIGGER_PREFIX,
};
pub use model::{ComplexTrigger, JobTrigger, SimpleTrigger, StartAt, TriggerTiming, UiHint};
pub use translate::{
    cron_expression, interval_for, interval_seconds, parse_ui_hint, BackendPlan, NamedCalendar,
    TranslateError, TriggerTranslator, RUN_ONCE_INTERVAL,
};
