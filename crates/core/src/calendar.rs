// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Availability calendar bound to a backend trigger
//!
//! A window *includes* the times a trigger may fire. Either end may be open.
//! Times are epoch milliseconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockoutWindow {
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl BlockoutWindow {
    pub fn new(start_time: Option<i64>, end_time: Option<i64>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// True when `t` lies in `[start_time, end_time]`
    pub fn is_included(&self, t: i64) -> bool {
        let after_start = self.start_time.map_or(true, |start| t >= start);
        let before_end = self.end_time.map_or(true, |end| t <= end);
        after_start && before_end
    }

    /// Next included time after `t`; `0` means there is none
    pub fn next_included_time(&self, t: i64) -> i64 {
        if self.is_included(t) {
            return t.checked_add(1).unwrap_or(0);
        }
        match self.start_time {
            Some(start) if t < start => start,
            _ => 0,
        }
    }
}
