// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity: `{owner, name, unique id}` packed into one string

use crate::id::IdGen;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical separator, always used when encoding
pub const KEY_SEPARATOR: char = '\t';
/// Separator of identifiers written by older releases; accepted on decode only
pub const LEGACY_KEY_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobKeyError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid job key format: {0:?}")]
    InvalidFormat(String),
}

/// Immutable identifier of a scheduled job
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobKey {
    owner: String,
    name: String,
    unique_id: String,
}

impl JobKey {
    /// Create a key for a new job with a freshly generated unique id
    pub fn create(
        name: &str,
        owner: &str,
        id_gen: &impl IdGen,
    ) -> Result<Self, JobKeyError> {
        if name.is_empty() {
            return Err(JobKeyError::InvalidArgument("job name is empty".into()));
        }
        if owner.is_empty() {
            return Err(JobKeyError::InvalidArgument("owner name is empty".into()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            unique_id: id_gen.next(),
        })
    }

    /// Decode a serialized key. Tab-delimited keys are split on tabs; anything
    /// else is treated as a legacy colon-delimited key.
    pub fn parse(serialized: &str) -> Result<Self, JobKeyError> {
        let separator = if serialized.contains(KEY_SEPARATOR) {
            KEY_SEPARATOR
        } else {
            LEGACY_KEY_SEPARATOR
        };
        let tokens: Vec<&str> = serialized.split(separator).collect();
        if tokens.len() < 3 || tokens[0].is_empty() || tokens[1].is_empty() {
            return Err(JobKeyError::InvalidFormat(serialized.to_string()));
        }
        // Extra legacy tokens belong to the unique id (older ids were allowed
        // to contain the separator).
        Ok(Self {
            owner: tokens[0].to_string(),
            name: tokens[1].to_string(),
            unique_id: tokens[2..].join(&separator.to_string()),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.owner,
            self.name,
            self.unique_id,
            sep = KEY_SEPARATOR
        )
    }
}

impl FromStr for JobKey {
    type Err = JobKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for JobKey {
    type Error = JobKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JobKey> for String {
    fn from(key: JobKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
#[path = "job_key_tests.rs"]
mod tests;
