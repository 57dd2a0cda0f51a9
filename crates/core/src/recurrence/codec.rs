// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field-level cron codec
//!
//! [`parse_field`] turns one cron field into an ordered rule list and
//! [`encode_field`] turns a rule list back into field syntax. An empty rule
//! list means "unconstrained" and encodes as `*`.
//!
//! Ranges must run low to high. Wrap-around ranges such as `22-2` in the
//! hour field are rejected; write them as a list (`22-23,0-2`) instead.

use super::rule::{CronField, RecurrenceRule, Weekday, WeekdayOrdinal};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid {field} expression: {text:?}")]
    InvalidExpression { field: CronField, text: String },
    #[error("cron expression needs 6 or 7 fields, got {count}: {text:?}")]
    FieldCount { count: usize, text: String },
}

#[allow(clippy::expect_used)]
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+|\*)/(\d+)$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static NTH_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)#(\d+)$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static LAST_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)L$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static NAME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3})-([A-Za-z]{3})$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").expect("constant regex pattern is valid"));

/// Parse one cron field into rules, preserving encounter order.
///
/// Runs of plain integers collect into a single `ValueList`; the run is
/// flushed whenever another kind of token interrupts it.
pub fn parse_field(field: CronField, text: &str) -> Result<Vec<RecurrenceRule>, CodecError> {
    let trimmed = text.trim();
    if trimmed == "*" || trimmed == "?" {
        return Ok(Vec::new());
    }

    let invalid = || CodecError::InvalidExpression {
        field,
        text: text.to_string(),
    };

    let mut rules = Vec::new();
    let mut pending: Vec<u32> = Vec::new();

    for token in trimmed.split(',').map(str::trim) {
        if let Ok(value) = token.parse::<u32>() {
            if !field.accepts(value) {
                return Err(invalid());
            }
            if !pending.contains(&value) {
                pending.push(value);
            }
            continue;
        }

        flush(&mut pending, &mut rules);
        let rule = classify(field, token).ok_or_else(invalid)?;
        rules.push(rule);
    }
    flush(&mut pending, &mut rules);

    Ok(rules)
}

/// Encode rules as comma-joined field syntax; no rules encodes as `*`
pub fn encode_field(rules: &[RecurrenceRule]) -> String {
    if rules.is_empty() {
        return "*".to_string();
    }
    rules
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn flush(pending: &mut Vec<u32>, rules: &mut Vec<RecurrenceRule>) {
    if !pending.is_empty() {
        rules.push(RecurrenceRule::ValueList {
            values: std::mem::take(pending),
        });
    }
}

/// Classify a non-integer token. Precedence follows the order of the checks.
fn classify(field: CronField, token: &str) -> Option<RecurrenceRule> {
    if let Some(caps) = RANGE.captures(token) {
        let from = bounded(field, &caps[1])?;
        let to = bounded(field, &caps[2])?;
        return (from <= to).then_some(RecurrenceRule::Range { from, to });
    }

    if let Some(caps) = STEP.captures(token) {
        let start = match &caps[1] {
            "*" => None,
            digits => Some(bounded(field, digits)?),
        };
        let interval: u32 = caps[2].parse().ok()?;
        return (interval > 0).then_some(RecurrenceRule::Step { start, interval });
    }

    if field == CronField::DayOfWeek {
        if let Some(caps) = NTH_WEEKDAY.captures(token) {
            let weekday = weekday(&caps[1])?;
            let ordinal: u8 = caps[2].parse().ok()?;
            return (1..=5).contains(&ordinal).then_some(RecurrenceRule::QualifiedWeekday {
                ordinal: WeekdayOrdinal::Nth(ordinal),
                weekday,
            });
        }
        if let Some(caps) = LAST_WEEKDAY.captures(token) {
            return Some(RecurrenceRule::QualifiedWeekday {
                ordinal: WeekdayOrdinal::Last,
                weekday: weekday(&caps[1])?,
            });
        }
    }

    if field == CronField::DayOfMonth && token.eq_ignore_ascii_case("L") {
        return Some(RecurrenceRule::LastDayOfMonth);
    }

    if let Some(caps) = NAME_RANGE.captures(token) {
        let from = field.lookup_name(&caps[1])?;
        let to = field.lookup_name(&caps[2])?;
        return (from <= to).then_some(RecurrenceRule::Range { from, to });
    }

    if NAME.is_match(token) {
        let value = field.lookup_name(token)?;
        return Some(RecurrenceRule::ValueList {
            values: vec![value],
        });
    }

    None
}

fn bounded(field: CronField, digits: &str) -> Option<u32> {
    let value: u32 = digits.parse().ok()?;
    field.accepts(value).then_some(value)
}

fn weekday(digits: &str) -> Option<Weekday> {
    Weekday::from_number(digits.parse().ok()?)
}
