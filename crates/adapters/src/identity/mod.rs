// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity context and authorization
//!
//! Impersonation is scoped to the future passed to
//! [`IdentityContext::run_as`]; it never outlives that future and never
//! leaks into other tasks.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAuthorizer;

/// The user an operation acts as
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who is acting right now, and running work as someone else
pub trait IdentityContext: Clone + Send + Sync + 'static {
    fn current_identity(&self) -> Option<Identity>;

    /// Drive `work` with `identity` as the current identity
    fn run_as<F>(&self, identity: Identity, work: F) -> impl Future<Output = F::Output> + Send
    where
        F: Future + Send,
        F::Output: Send;
}

tokio::task_local! {
    static ACTING_IDENTITY: Identity;
}

/// Identity context backed by a tokio task-local.
///
/// Outside any `run_as` scope the session identity (if any) is current.
#[derive(Clone, Debug, Default)]
pub struct TaskLocalIdentity {
    session: Option<Identity>,
}

impl TaskLocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(identity: Identity) -> Self {
        Self {
            session: Some(identity),
        }
    }
}

impl IdentityContext for TaskLocalIdentity {
    fn current_identity(&self) -> Option<Identity> {
        ACTING_IDENTITY
            .try_with(Identity::clone)
            .ok()
            .or_else(|| self.session.clone())
    }

    fn run_as<F>(&self, identity: Identity, work: F) -> impl Future<Output = F::Output> + Send
    where
        F: Future + Send,
        F::Output: Send,
    {
        ACTING_IDENTITY.scope(identity, work)
    }
}

/// Decides whether an identity may schedule work at all
#[async_trait]
pub trait Authorizer: Clone + Send + Sync + 'static {
    async fn can_schedule(&self, identity: &Identity) -> bool;
}

/// Authorizer that permits everyone
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn can_schedule(&self, _identity: &Identity) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
