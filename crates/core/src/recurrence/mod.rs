// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron recurrence rules
//!
//! This module provides:
//! - **RecurrenceRule**: one constraint on a single cron field
//! - **parse_field / encode_field**: the field-level codec
//! - **CronExpression**: all six or seven fields of an expression

mod codec;
mod expression;
mod rule;

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;

#[cfg(test)]
#[path = "expression_tests.rs"]
mod expression_tests;

pub use codec::{encode_field, parse_field, CodecError};
pub use expression::CronExpression;
pub use rule::{CronField, RecurrenceRule, Weekday, WeekdayOrdinal};
