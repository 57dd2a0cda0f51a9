// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake authorizer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Authorizer, Identity};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Allows everyone except explicitly denied identities
#[derive(Clone, Default)]
pub struct FakeAuthorizer {
    denied: Arc<Mutex<BTreeSet<Identity>>>,
}

impl FakeAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny(&self, identity: impl Into<Identity>) {
        self.denied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(identity.into());
    }
}

#[async_trait]
impl Authorizer for FakeAuthorizer {
    async fn can_schedule(&self, identity: &Identity) -> bool {
        !self
            .denied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(identity)
    }
}
