// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Recurring job scheduling engine

mod action;
mod blockout;
mod completion;
mod config;
mod coordinator;
mod error;
mod gate;
mod listener;
mod resolver;
mod scheduler;

pub use action::{Action, ActionError, OutputSink, PostProcessing, StreamProvider};
pub use blockout::BlockoutManager;
pub use completion::{CompletionSignal, CompletionState, WaitTimedOut};
pub use config::{ConfigError, FeatureFlags, SchedulerConfig, DEFAULT_OUTPUT_SETTING};
pub use coordinator::{ActionExecutionCoordinator, RunOutcome};
pub use error::SchedulerError;
pub use gate::{BlockoutGate, ExecutionClass, FireOutcome};
pub use listener::{ExecutionListener, ExecutionStatus, NoOpListener, RecordingListener};
pub use resolver::OutputPathResolver;
pub use scheduler::JobScheduler;
