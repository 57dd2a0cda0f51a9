// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger translation commands

use super::read_input;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rj_core::trigger::parse_ui_hint;
use rj_core::{
    BackendPlan, BackendSchedule, BackendTrigger, BlockoutWindow, JobKey, JobTrigger, UuidIdGen,
};
use rj_engine::SchedulerConfig;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct TriggerArgs {
    #[command(subcommand)]
    pub command: TriggerCommand,
}

#[derive(Subcommand)]
pub enum TriggerCommand {
    /// Translate a job trigger (JSON) into the backend plan
    Translate {
        /// Trigger file; stdin when omitted or `-`
        file: Option<PathBuf>,
        /// Serialized job key; a fresh `preview` key when omitted
        #[arg(long)]
        key: Option<String>,
        /// Reference "now" (RFC 3339) for triggers without a start
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Rebuild the job trigger from a backend trigger (JSON)
    Describe {
        /// Backend trigger file; stdin when omitted or `-`
        file: Option<PathBuf>,
        /// UI hint recorded with the job
        #[arg(long)]
        hint: Option<String>,
        /// Availability window start, epoch milliseconds
        #[arg(long)]
        window_start: Option<i64>,
        /// Availability window end, epoch milliseconds
        #[arg(long)]
        window_end: Option<i64>,
    },
}

#[derive(Serialize)]
struct PlanView<'a>(&'a BackendPlan);

impl fmt::Display for PlanView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trigger = &self.0.trigger;
        writeln!(f, "Trigger:  {}", trigger.name.replace('\t', ":"))?;
        match &trigger.schedule {
            BackendSchedule::Interval {
                value,
                unit,
                repeat_count,
            } => writeln!(
                f,
                "Schedule: every {} {:?} (repeat count {})",
                value, unit, repeat_count
            )?,
            BackendSchedule::Cron {
                expression,
                timezone,
            } => writeln!(f, "Schedule: cron {} ({})", expression, timezone)?,
            BackendSchedule::Other { name } => writeln!(f, "Schedule: {}", name)?,
        }
        write!(f, "Start:    {}", trigger.start_time.to_rfc3339())?;
        if let Some(end) = trigger.end_time {
            write!(f, "\nEnd:      {}", end.to_rfc3339())?;
        }
        if let Some(calendar) = &self.0.calendar {
            write!(
                f,
                "\nCalendar: {} [{}, {}]",
                calendar.name,
                bound(calendar.window.start_time),
                bound(calendar.window.end_time)
            )?;
        }
        Ok(())
    }
}

fn bound(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[derive(Serialize)]
struct TriggerView(JobTrigger);

impl fmt::Display for TriggerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

pub fn handle(command: TriggerCommand, config: &SchedulerConfig, format: OutputFormat) -> Result<()> {
    let translator = config.translator()?;
    match command {
        TriggerCommand::Translate { file, key, now } => {
            let text = read_input(file.as_deref())?;
            let trigger: JobTrigger =
                serde_json::from_str(&text).context("parsing job trigger")?;
            let key = match key {
                Some(id) => JobKey::parse(&id)?,
                None => JobKey::create("preview", "rj", &UuidIdGen)?,
            };
            let plan = translator.to_backend(&trigger, &key, now.unwrap_or_else(Utc::now))?;
            output::print(&PlanView(&plan), format)?;
        }
        TriggerCommand::Describe {
            file,
            hint,
            window_start,
            window_end,
        } => {
            let text = read_input(file.as_deref())?;
            let trigger: BackendTrigger =
                serde_json::from_str(&text).context("parsing backend trigger")?;
            let hint = hint.as_deref().map(parse_ui_hint).transpose()?;
            let window = match (window_start, window_end) {
                (None, None) => None,
                (start, end) => Some(BlockoutWindow::new(start, end)),
            };
            let rebuilt = translator.from_backend(&trigger, window.as_ref(), hint)?;
            output::print(&TriggerView(rebuilt), format)?;
        }
    }
    Ok(())
}
