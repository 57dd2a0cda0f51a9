// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the scheduler's collaborators: trigger backend, content
//! repository, settings, identity and notifications

pub mod backend;
pub mod blockout;
pub mod content;
pub mod identity;
pub mod notify;
pub mod settings;
pub mod traced;

pub use backend::{BackendError, MemoryTriggerBackend, TriggerBackend};
pub use blockout::{BlockoutPredicate, NoBlockouts};
pub use content::{ContentError, ContentStore, Metadata, OutputStream, Permission, RepositoryFile};
pub use identity::{AllowAll, Authorizer, Identity, IdentityContext, TaskLocalIdentity};
pub use notify::{NoOpNotifyAdapter, Notification, NotifyAdapter, NotifyError};
pub use settings::{MemorySettings, SettingsError, SettingsStore};
pub use traced::{TracedContentStore, TracedTriggerBackend};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use blockout::FakeBlockoutPredicate;
#[cfg(any(test, feature = "test-support"))]
pub use content::{ContentCall, FakeContentStore};
#[cfg(any(test, feature = "test-support"))]
pub use identity::FakeAuthorizer;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
