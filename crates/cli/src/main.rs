// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rj - recurring job scheduler tools

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{cron, job, key, trigger, window};
use output::OutputFormat;
use rj_engine::SchedulerConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rj", version, about = "Recurring job scheduler tools")]
struct Cli {
    /// Scheduler configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect cron expressions
    Cron(cron::CronArgs),
    /// Create and decode job keys
    Key(key::KeyArgs),
    /// Translate triggers to backend form
    Trigger(trigger::TriggerArgs),
    /// Check availability windows
    Window(window::WindowArgs),
    /// Schedule a job against an in-memory backend
    Job(job::JobArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Cron(args) => cron::handle(args.command, cli.format),
        Commands::Key(args) => key::handle(args.command, cli.format),
        Commands::Trigger(args) => trigger::handle(args.command, &config, cli.format),
        Commands::Window(args) => window::handle(args.command, cli.format),
        Commands::Job(args) => job::handle(args.command, &config, cli.format).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SchedulerConfig::default()),
    }
}
