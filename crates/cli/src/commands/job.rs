// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job commands
//!
//! Jobs live in an in-memory backend for the lifetime of one invocation, so
//! these commands preview what the scheduler would store and report.

use super::read_input;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rj_adapters::{MemoryTriggerBackend, TracedTriggerBackend};
use rj_core::{Job, JobParams, JobTrigger, SystemClock, UuidIdGen};
use rj_engine::{JobScheduler, SchedulerConfig};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Create a job from a trigger (JSON) and show how it is reported
    Preview {
        /// Trigger file; stdin when omitted or `-`
        file: Option<PathBuf>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        /// Job parameter as KEY=VALUE (repeatable)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Also fire the job once right away
        #[arg(long)]
        run_now: bool,
        /// Pause the job after creating it
        #[arg(long)]
        pause: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))?;
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct JobView(Job);

impl fmt::Display for JobView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let job = &self.0;
        writeln!(f, "Job: {}", job.id.replace('\t', ":"))?;
        writeln!(f, "  Name:  {}", job.name)?;
        writeln!(f, "  Owner: {}", job.owner)?;
        write!(f, "  State: {}", job.state)?;
        if let Some(next) = job.next_run {
            write!(f, "\n  Next run: {}", next.to_rfc3339())?;
        }
        if !job.params.is_empty() {
            write!(f, "\n  Params:")?;
            for (key, value) in job.params.iter() {
                write!(f, "\n    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

pub async fn handle(command: JobCommand, config: &SchedulerConfig, format: OutputFormat) -> Result<()> {
    match command {
        JobCommand::Preview {
            file,
            name,
            owner,
            params,
            run_now,
            pause,
        } => {
            let text = read_input(file.as_deref())?;
            let trigger: JobTrigger =
                serde_json::from_str(&text).context("parsing job trigger")?;
            let params = params
                .into_iter()
                .fold(JobParams::new(), |acc, (key, value)| acc.with(key, value));

            let scheduler = JobScheduler::new(
                TracedTriggerBackend::new(MemoryTriggerBackend::new()),
                config.translator()?,
                SystemClock,
                UuidIdGen,
            );
            let mut job = scheduler.create_job(&name, &owner, params, trigger).await?;
            if run_now {
                job = scheduler.trigger_now(&job.id).await?;
            }
            if pause {
                job = scheduler.pause_job(&job.id).await?;
            }
            tracing::debug!(job_id = %job.id, state = %job.state, "job previewed");
            output::print(&JobView(job), format)?;
        }
    }
    Ok(())
}
