// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron expression commands

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use rj_core::{encode_field, parse_field, CronExpression, CronField, RecurrenceRule};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct CronArgs {
    #[command(subcommand)]
    pub command: CronCommand,
}

#[derive(Subcommand)]
pub enum CronCommand {
    /// Parse a whole expression and print it field by field
    Parse {
        /// Six or seven space-separated fields, quoted
        expression: String,
    },
    /// Parse one field and print its rules
    Field {
        #[arg(value_enum)]
        field: FieldArg,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl From<FieldArg> for CronField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Second => CronField::Second,
            FieldArg::Minute => CronField::Minute,
            FieldArg::Hour => CronField::Hour,
            FieldArg::DayOfMonth => CronField::DayOfMonth,
            FieldArg::Month => CronField::Month,
            FieldArg::DayOfWeek => CronField::DayOfWeek,
            FieldArg::Year => CronField::Year,
        }
    }
}

#[derive(Serialize)]
struct FieldInfo {
    field: CronField,
    text: String,
    rules: Vec<RecurrenceRule>,
}

impl fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14} {}", self.field.to_string(), self.text)
    }
}

#[derive(Serialize)]
struct ExpressionInfo {
    expression: String,
    fields: Vec<FieldInfo>,
}

impl fmt::Display for ExpressionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)?;
        for field in &self.fields {
            write!(f, "\n  {}", field)?;
        }
        Ok(())
    }
}

pub fn handle(command: CronCommand, format: OutputFormat) -> Result<()> {
    match command {
        CronCommand::Parse { expression } => {
            let parsed = CronExpression::parse(&expression)?;
            let fields = CronField::ALL
                .iter()
                .map(|&field| field_info(field, parsed.rules(field).to_vec()))
                .collect();
            let info = ExpressionInfo {
                expression: parsed.to_string(),
                fields,
            };
            output::print(&info, format)?;
        }
        CronCommand::Field { field, text } => {
            let field = CronField::from(field);
            let rules = parse_field(field, &text)?;
            output::print(&field_info(field, rules), format)?;
        }
    }
    Ok(())
}

fn field_info(field: CronField, rules: Vec<RecurrenceRule>) -> FieldInfo {
    FieldInfo {
        field,
        text: encode_field(&rules),
        rules,
    }
}
