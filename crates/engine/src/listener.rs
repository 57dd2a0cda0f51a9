// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run status callbacks

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
}

pub trait ExecutionListener: Clone + Send + Sync + 'static {
    /// Called as a run identified by `lineage_id` changes status
    fn on_status(&self, lineage_id: &str, status: ExecutionStatus);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpListener;

impl ExecutionListener for NoOpListener {
    fn on_status(&self, _lineage_id: &str, _status: ExecutionStatus) {}
}

/// Keeps every status it is told, in order
#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<(String, ExecutionStatus)>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, ExecutionStatus)> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn statuses(&self) -> Vec<ExecutionStatus> {
        self.events().into_iter().map(|(_, s)| s).collect()
    }
}

impl ExecutionListener for RecordingListener {
    fn on_status(&self, lineage_id: &str, status: ExecutionStatus) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((lineage_id.to_string(), status));
    }
}
