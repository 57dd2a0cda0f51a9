// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unit of work a job runs, and its optional capabilities

use crate::completion::CompletionSignal;
use async_trait::async_trait;
use rj_adapters::OutputStream;
use rj_core::JobParams;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[async_trait]
pub trait Action: Send {
    /// Run the work. `params` already carries injected values such as the
    /// resolved output file and the lineage id.
    async fn execute(&mut self, params: &JobParams) -> Result<(), ActionError>;

    /// Whether the last execution produced a usable result
    fn is_successful(&self) -> bool {
        true
    }

    /// Present when the work writes to an output stream
    fn output_sink(&mut self) -> Option<&mut dyn OutputSink> {
        None
    }

    /// Present when the work produces files besides its main output
    fn post_processing(&self) -> Option<&dyn PostProcessing> {
        None
    }
}

/// Accepts the stream the work writes its output to
pub trait OutputSink: Send {
    fn set_output(&mut self, path: &str, stream: OutputStream);

    /// Hand the stream back so it can be closed once the run ends
    fn take_output(&mut self) -> Option<OutputStream>;
}

pub trait PostProcessing {
    /// Repository paths of the extra files produced by the last execution
    fn outputs(&self) -> Vec<String>;
}

/// Where a streaming job writes, and how it reports asynchronous completion
#[derive(Clone)]
pub struct StreamProvider {
    /// Full output path (folder and file name pattern) the job was
    /// scheduled with
    pub output_path: String,
    /// Set when the producer finishes writing after `execute` returns
    pub completion: Option<CompletionSignal>,
}

impl StreamProvider {
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            completion: None,
        }
    }

    pub fn with_completion(mut self, signal: CompletionSignal) -> Self {
        self.completion = Some(signal);
        self
    }

    /// Split the output path into folder and file name pattern
    pub fn split(&self) -> (Option<&str>, &str) {
        match self.output_path.rsplit_once(rj_core::path::SEPARATOR) {
            Some((folder, pattern)) => (Some(folder), pattern),
            None => (None, self.output_path.as_str()),
        }
    }
}
