// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod cron;
pub mod job;
pub mod key;
pub mod trigger;
pub mod window;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when the path is `-` or absent
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
