// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole cron expressions: `sec min hour dom month dow [year]`

use super::codec::{encode_field, parse_field, CodecError};
use super::rule::{CronField, RecurrenceRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cron expression split into per-field rule lists.
///
/// Values are cron-native: months 1-12, weekdays 1-7 with Sunday = 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronExpression {
    pub seconds: Vec<RecurrenceRule>,
    pub minutes: Vec<RecurrenceRule>,
    pub hours: Vec<RecurrenceRule>,
    pub days_of_month: Vec<RecurrenceRule>,
    pub months: Vec<RecurrenceRule>,
    pub days_of_week: Vec<RecurrenceRule>,
    pub years: Vec<RecurrenceRule>,
}

impl CronExpression {
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 7 {
            return Err(CodecError::FieldCount {
                count: fields.len(),
                text: text.to_string(),
            });
        }

        let mut expression = CronExpression::default();
        for (field, raw) in CronField::ALL.iter().zip(&fields) {
            *expression.rules_mut(*field) = parse_field(*field, raw)?;
        }
        Ok(expression)
    }

    pub fn rules(&self, field: CronField) -> &[RecurrenceRule] {
        match field {
            CronField::Second => &self.seconds,
            CronField::Minute => &self.minutes,
            CronField::Hour => &self.hours,
            CronField::DayOfMonth => &self.days_of_month,
            CronField::Month => &self.months,
            CronField::DayOfWeek => &self.days_of_week,
            CronField::Year => &self.years,
        }
    }

    pub fn rules_mut(&mut self, field: CronField) -> &mut Vec<RecurrenceRule> {
        match field {
            CronField::Second => &mut self.seconds,
            CronField::Minute => &mut self.minutes,
            CronField::Hour => &mut self.hours,
            CronField::DayOfMonth => &mut self.days_of_month,
            CronField::Month => &mut self.months,
            CronField::DayOfWeek => &mut self.days_of_week,
            CronField::Year => &mut self.years,
        }
    }
}

impl fmt::Display for CronExpression {
    /// Only one day field is ever written. Day-of-month wins when both are
    /// populated and the other becomes `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (dom, dow) = match (self.days_of_month.is_empty(), self.days_of_week.is_empty()) {
            (false, _) => (encode_field(&self.days_of_month), "?".to_string()),
            (true, false) => ("?".to_string(), encode_field(&self.days_of_week)),
            (true, true) => ("*".to_string(), "?".to_string()),
        };
        write!(
            f,
            "{} {} {} {} {} {}",
            encode_field(&self.seconds),
            encode_field(&self.minutes),
            encode_field(&self.hours),
            dom,
            encode_field(&self.months),
            dow
        )?;
        if !self.years.is_empty() {
            write!(f, " {}", encode_field(&self.years))?;
        }
        Ok(())
    }
}

impl FromStr for CronExpression {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
