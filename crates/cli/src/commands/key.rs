// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job key commands

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use rj_core::{JobKey, UuidIdGen};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Create a key with a fresh unique id
    New {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
    },
    /// Decode a serialized key (tab or legacy colon delimited)
    Decode { id: String },
}

#[derive(Serialize)]
struct KeyInfo {
    id: String,
    owner: String,
    name: String,
    unique_id: String,
}

impl From<&JobKey> for KeyInfo {
    fn from(key: &JobKey) -> Self {
        Self {
            id: key.to_string(),
            owner: key.owner().to_string(),
            name: key.name().to_string(),
            unique_id: key.unique_id().to_string(),
        }
    }
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Owner:     {}", self.owner)?;
        writeln!(f, "Name:      {}", self.name)?;
        write!(f, "Unique id: {}", self.unique_id)
    }
}

pub fn handle(command: KeyCommand, format: OutputFormat) -> Result<()> {
    let key = match command {
        KeyCommand::New { name, owner } => JobKey::create(&name, &owner, &UuidIdGen)?,
        KeyCommand::Decode { id } => JobKey::parse(&id)?,
    };
    output::print(&KeyInfo::from(&key), format)?;
    Ok(())
}
