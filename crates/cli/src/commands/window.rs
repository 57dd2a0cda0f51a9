// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Availability window commands

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use rj_core::BlockoutWindow;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct WindowArgs {
    #[command(subcommand)]
    pub command: WindowCommand,
}

#[derive(Subcommand)]
pub enum WindowCommand {
    /// Check whether an instant falls inside a window
    Check {
        /// Window start, epoch milliseconds
        #[arg(long)]
        start: Option<i64>,
        /// Window end, epoch milliseconds
        #[arg(long)]
        end: Option<i64>,
        /// Instant to check, epoch milliseconds
        at: i64,
    },
}

#[derive(Serialize)]
struct WindowCheck {
    window: BlockoutWindow,
    at: i64,
    included: bool,
    /// 0 when no later time is included
    next_included_time: i64,
}

impl fmt::Display for WindowCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.included { "included" } else { "excluded" };
        write!(f, "{}: {}", self.at, verdict)?;
        if self.next_included_time == 0 {
            write!(f, " (no later included time)")
        } else {
            write!(f, " (next included {})", self.next_included_time)
        }
    }
}

pub fn handle(command: WindowCommand, format: OutputFormat) -> Result<()> {
    match command {
        WindowCommand::Check { start, end, at } => {
            let window = BlockoutWindow::new(start, end);
            let check = WindowCheck {
                window,
                at,
                included: window.is_included(at),
                next_included_time: window.next_included_time(at),
            };
            output::print(&check, format)?;
        }
    }
    Ok(())
}
