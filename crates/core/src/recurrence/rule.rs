// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurrence rule types: one parsed constraint on one cron field

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven positions of a cron expression, in expression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CronField {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

const WEEKDAY_NAMES: &[(&str, u32)] = &[
    ("SUN", 1),
    ("MON", 2),
    ("TUE", 3),
    ("WED", 4),
    ("THU", 5),
    ("FRI", 6),
    ("SAT", 7),
];

const MONTH_NAMES: &[(&str, u32)] = &[
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

impl CronField {
    /// All fields in expression order
    pub const ALL: [CronField; 7] = [
        CronField::Second,
        CronField::Minute,
        CronField::Hour,
        CronField::DayOfMonth,
        CronField::Month,
        CronField::DayOfWeek,
        CronField::Year,
    ];

    /// Inclusive range of values the field accepts
    pub fn bounds(self) -> (u32, u32) {
        match self {
            CronField::Second | CronField::Minute => (0, 59),
            CronField::Hour => (0, 23),
            CronField::DayOfMonth => (1, 31),
            CronField::Month => (1, 12),
            CronField::DayOfWeek => (1, 7),
            CronField::Year => (1970, 2099),
        }
    }

    pub fn accepts(self, value: u32) -> bool {
        let (lo, hi) = self.bounds();
        (lo..=hi).contains(&value)
    }

    /// Symbolic names the field accepts in place of numbers
    pub fn names(self) -> &'static [(&'static str, u32)] {
        match self {
            CronField::DayOfWeek => WEEKDAY_NAMES,
            CronField::Month => MONTH_NAMES,
            _ => &[],
        }
    }

    pub fn lookup_name(self, name: &str) -> Option<u32> {
        self.names()
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CronField::Second => "second",
            CronField::Minute => "minute",
            CronField::Hour => "hour",
            CronField::DayOfMonth => "day-of-month",
            CronField::Month => "month",
            CronField::DayOfWeek => "day-of-week",
            CronField::Year => "year",
        };
        f.write_str(name)
    }
}

/// Day of week, numbered the cron way (Sunday = 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    pub fn from_number(n: u32) -> Option<Self> {
        Some(match n {
            1 => Weekday::Sunday,
            2 => Weekday::Monday,
            3 => Weekday::Tuesday,
            4 => Weekday::Wednesday,
            5 => Weekday::Thursday,
            6 => Weekday::Friday,
            7 => Weekday::Saturday,
            _ => return None,
        })
    }

    pub fn number(self) -> u32 {
        self as u32
    }
}

/// Which occurrence of a weekday within a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayOrdinal {
    /// 1st through 5th
    Nth(u8),
    Last,
}

/// One constraint on a single cron field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Exact matches, e.g. `1,15,30`. Values are unique and keep encounter order.
    ValueList { values: Vec<u32> },
    /// Inclusive run, e.g. `10-20`
    Range { from: u32, to: u32 },
    /// `start/interval`; a `None` start is written `*/interval`
    Step { start: Option<u32>, interval: u32 },
    /// `6#3` (third Friday) or `2L` (last Monday)
    QualifiedWeekday {
        ordinal: WeekdayOrdinal,
        weekday: Weekday,
    },
    /// `L` in the day-of-month field
    LastDayOfMonth,
}

impl RecurrenceRule {
    pub fn values(values: impl IntoIterator<Item = u32>) -> Self {
        let mut list = Vec::new();
        for v in values {
            if !list.contains(&v) {
                list.push(v);
            }
        }
        RecurrenceRule::ValueList { values: list }
    }

    pub fn range(from: u32, to: u32) -> Self {
        RecurrenceRule::Range { from, to }
    }

    pub fn every(interval: u32) -> Self {
        RecurrenceRule::Step {
            start: None,
            interval,
        }
    }

    pub fn step(start: u32, interval: u32) -> Self {
        RecurrenceRule::Step {
            start: Some(start),
            interval,
        }
    }

    pub fn nth_weekday(ordinal: u8, weekday: Weekday) -> Self {
        RecurrenceRule::QualifiedWeekday {
            ordinal: WeekdayOrdinal::Nth(ordinal),
            weekday,
        }
    }

    pub fn last_weekday(weekday: Weekday) -> Self {
        RecurrenceRule::QualifiedWeekday {
            ordinal: WeekdayOrdinal::Last,
            weekday,
        }
    }

    /// Apply `f` to every plain number in the rule.
    ///
    /// Weekday qualifiers and `L` carry no field value and are left alone.
    pub fn map_values(&self, f: impl Fn(u32) -> u32) -> Self {
        match self {
            RecurrenceRule::ValueList { values } => RecurrenceRule::ValueList {
                values: values.iter().map(|v| f(*v)).collect(),
            },
            RecurrenceRule::Range { from, to } => RecurrenceRule::Range {
                from: f(*from),
                to: f(*to),
            },
            RecurrenceRule::Step { start, interval } => RecurrenceRule::Step {
                start: start.map(&f),
                interval: *interval,
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::ValueList { values } => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&joined.join(","))
            }
            RecurrenceRule::Range { from, to } => write!(f, "{}-{}", from, to),
            RecurrenceRule::Step {
                start: Some(start),
                interval,
            } => write!(f, "{}/{}", start, interval),
            RecurrenceRule::Step {
                start: None,
                interval,
            } => write!(f, "*/{}", interval),
            RecurrenceRule::QualifiedWeekday {
                ordinal: WeekdayOrdinal::Nth(n),
                weekday,
            } => write!(f, "{}#{}", weekday.number(), n),
            RecurrenceRule::QualifiedWeekday {
                ordinal: WeekdayOrdinal::Last,
                weekday,
            } => write!(f, "{}L", weekday.number()),
            RecurrenceRule::LastDayOfMonth => f.write_str("L"),
        }
    }
}
