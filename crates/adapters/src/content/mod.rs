// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content repository adapter
//!
//! Checks run against whichever identity is current when the call is made;
//! callers impersonate through [`crate::IdentityContext::run_as`].

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ContentCall, FakeContentStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Access rights checked on repository paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    Read,
    Write,
    Delete,
}

/// A file or folder in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFile {
    pub id: String,
    pub path: String,
    pub size: u64,
    pub folder: bool,
}

/// Stream content is written to; the file exists once the stream is opened
pub type OutputStream = Box<dyn Write + Send>;

pub type Metadata = BTreeMap<String, String>;

#[async_trait]
pub trait ContentStore: Clone + Send + Sync + 'static {
    async fn folder_exists(&self, path: &str) -> Result<bool, ContentError>;

    /// True when the current identity holds every permission on `path`
    async fn has_access(&self, path: &str, permissions: &[Permission])
        -> Result<bool, ContentError>;

    async fn get_file(&self, path: &str) -> Result<Option<RepositoryFile>, ContentError>;

    async fn delete_file(&self, id: &str) -> Result<(), ContentError>;

    async fn metadata(&self, id: &str) -> Result<Metadata, ContentError>;

    async fn set_metadata(&self, id: &str, metadata: Metadata) -> Result<(), ContentError>;

    /// Create (or truncate) the file at `path` and return a stream into it
    async fn open_output(&self, path: &str) -> Result<OutputStream, ContentError>;

    /// Home folder of a user
    fn home_folder(&self, user: &str) -> String {
        format!("/home/{}", user)
    }
}
