// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blockout predicate: may ordinary work fire right now?

use crate::backend::BackendError;
use async_trait::async_trait;

#[async_trait]
pub trait BlockoutPredicate: Clone + Send + Sync + 'static {
    /// `false` while a blockout window is in effect
    async fn should_fire_now(&self) -> Result<bool, BackendError>;
}

/// Predicate that never blocks
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBlockouts;

#[async_trait]
impl BlockoutPredicate for NoBlockouts {
    async fn should_fire_now(&self) -> Result<bool, BackendError> {
        Ok(true)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBlockoutPredicate;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy)]
    enum Mode {
        Allow,
        Block,
        Unavailable,
    }

    /// Scriptable predicate that counts how often it was consulted
    #[derive(Clone)]
    pub struct FakeBlockoutPredicate {
        mode: Arc<Mutex<Mode>>,
        checks: Arc<Mutex<usize>>,
    }

    impl Default for FakeBlockoutPredicate {
        fn default() -> Self {
            Self {
                mode: Arc::new(Mutex::new(Mode::Allow)),
                checks: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl FakeBlockoutPredicate {
        pub fn allowing() -> Self {
            Self::default()
        }

        pub fn blocking() -> Self {
            let fake = Self::default();
            fake.set(Mode::Block);
            fake
        }

        pub fn unavailable() -> Self {
            let fake = Self::default();
            fake.set(Mode::Unavailable);
            fake
        }

        fn set(&self, mode: Mode) {
            *self.mode.lock().unwrap_or_else(|e| e.into_inner()) = mode;
        }

        pub fn checks(&self) -> usize {
            *self.checks.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl BlockoutPredicate for FakeBlockoutPredicate {
        async fn should_fire_now(&self) -> Result<bool, BackendError> {
            *self.checks.lock().unwrap_or_else(|e| e.into_inner()) += 1;
            let mode = *self.mode.lock().unwrap_or_else(|e| e.into_inner());
            match mode {
                Mode::Allow => Ok(true),
                Mode::Block => Ok(false),
                Mode::Unavailable => Err(BackendError::Unavailable(
                    "blockout manager".to_string(),
                )),
            }
        }
    }
}
