// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake content store with call recording for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ContentError, ContentStore, Metadata, OutputStream, Permission, RepositoryFile};
use crate::identity::{IdentityContext, TaskLocalIdentity};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Recorded call to the content store, with the identity it ran as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCall {
    FolderExists { path: String, user: Option<String> },
    HasAccess { path: String, user: Option<String> },
    GetFile { path: String },
    DeleteFile { id: String },
    SetMetadata { id: String },
    OpenOutput { path: String, user: Option<String> },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ContentCall>,
    folders: BTreeSet<String>,
    /// (user, path) pairs granted read and write
    grants: BTreeSet<(String, String)>,
    files: BTreeMap<String, FakeFile>,
    metadata: HashMap<String, Metadata>,
    next_id: u64,
    failing_paths: BTreeSet<String>,
    metadata_fails: bool,
}

struct FakeFile {
    id: String,
    content: Vec<u8>,
}

/// In-memory repository that records every call
#[derive(Clone)]
pub struct FakeContentStore {
    state: Arc<Mutex<FakeState>>,
    identity: TaskLocalIdentity,
}

impl Default for FakeContentStore {
    fn default() -> Self {
        Self::new(TaskLocalIdentity::new())
    }
}

impl FakeContentStore {
    /// Permission checks use the identity `identity` reports as current
    pub fn new(identity: TaskLocalIdentity) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            identity,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_user(&self) -> Option<String> {
        self.identity.current_identity().map(|i| i.0)
    }

    /// Add a folder that `user` can read and write
    pub fn add_folder(&self, path: &str, user: &str) {
        let mut state = self.lock();
        state.folders.insert(path.to_string());
        state.grants.insert((user.to_string(), path.to_string()));
    }

    /// Add a folder nobody has access to
    pub fn add_locked_folder(&self, path: &str) {
        self.lock().folders.insert(path.to_string());
    }

    /// Make every call on `path` fail as if the repository were down
    pub fn fail_path(&self, path: &str) {
        self.lock().failing_paths.insert(path.to_string());
    }

    pub fn fail_metadata(&self, fails: bool) {
        self.lock().metadata_fails = fails;
    }

    pub fn add_file(&self, path: &str, content: &[u8]) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("file-{}", state.next_id);
        state.files.insert(
            path.to_string(),
            FakeFile {
                id: id.clone(),
                content: content.to_vec(),
            },
        );
        id
    }

    pub fn file_content(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().files.get(path).map(|f| f.content.clone())
    }

    pub fn file_metadata(&self, path: &str) -> Option<Metadata> {
        let state = self.lock();
        let id = &state.files.get(path)?.id;
        state.metadata.get(id).cloned()
    }

    pub fn calls(&self) -> Vec<ContentCall> {
        self.lock().calls.clone()
    }

    /// Number of existence checks issued for `path`
    pub fn exists_checks(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ContentCall::FolderExists { path: p, .. } if p == path))
            .count()
    }

    /// Number of permission checks issued for `path`
    pub fn access_checks(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ContentCall::HasAccess { path: p, .. } if p == path))
            .count()
    }

    fn check_available(state: &FakeState, path: &str) -> Result<(), ContentError> {
        if state.failing_paths.contains(path) {
            return Err(ContentError::Unavailable(path.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn folder_exists(&self, path: &str) -> Result<bool, ContentError> {
        let user = self.current_user();
        let mut state = self.lock();
        state.calls.push(ContentCall::FolderExists {
            path: path.to_string(),
            user,
        });
        Self::check_available(&state, path)?;
        Ok(state.folders.contains(path))
    }

    async fn has_access(
        &self,
        path: &str,
        permissions: &[Permission],
    ) -> Result<bool, ContentError> {
        let user = self.current_user();
        let mut state = self.lock();
        state.calls.push(ContentCall::HasAccess {
            path: path.to_string(),
            user: user.clone(),
        });
        Self::check_available(&state, path)?;
        let Some(user) = user else {
            return Ok(false);
        };
        let granted = state.grants.contains(&(user, path.to_string()));
        Ok(granted
            && permissions
                .iter()
                .all(|p| matches!(p, Permission::Read | Permission::Write)))
    }

    async fn get_file(&self, path: &str) -> Result<Option<RepositoryFile>, ContentError> {
        let mut state = self.lock();
        state.calls.push(ContentCall::GetFile {
            path: path.to_string(),
        });
        Self::check_available(&state, path)?;
        Ok(state.files.get(path).map(|f| RepositoryFile {
            id: f.id.clone(),
            path: path.to_string(),
            size: f.content.len() as u64,
            folder: false,
        }))
    }

    async fn delete_file(&self, id: &str) -> Result<(), ContentError> {
        let mut state = self.lock();
        state.calls.push(ContentCall::DeleteFile { id: id.to_string() });
        let path = state
            .files
            .iter()
            .find(|(_, f)| f.id == id)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| ContentError::NotFound(id.to_string()))?;
        state.files.remove(&path);
        state.metadata.remove(id);
        Ok(())
    }

    async fn metadata(&self, id: &str) -> Result<Metadata, ContentError> {
        let state = self.lock();
        if state.metadata_fails {
            return Err(ContentError::Unavailable("metadata".to_string()));
        }
        Ok(state.metadata.get(id).cloned().unwrap_or_default())
    }

    async fn set_metadata(&self, id: &str, metadata: Metadata) -> Result<(), ContentError> {
        let mut state = self.lock();
        state.calls.push(ContentCall::SetMetadata { id: id.to_string() });
        if state.metadata_fails {
            return Err(ContentError::Unavailable("metadata".to_string()));
        }
        state.metadata.insert(id.to_string(), metadata);
        Ok(())
    }

    async fn open_output(&self, path: &str) -> Result<OutputStream, ContentError> {
        let user = self.current_user();
        let mut state = self.lock();
        state.calls.push(ContentCall::OpenOutput {
            path: path.to_string(),
            user,
        });
        Self::check_available(&state, path)?;
        state.next_id += 1;
        let id = format!("file-{}", state.next_id);
        state.files.insert(
            path.to_string(),
            FakeFile {
                id,
                content: Vec::new(),
            },
        );
        Ok(Box::new(FakeOutput {
            path: path.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// Writes straight into the fake file
struct FakeOutput {
    path: String,
    state: Arc<Mutex<FakeState>>,
}

impl Write for FakeOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.files.get_mut(&self.path) {
            Some(file) => {
                file.content.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, self.path.clone())),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
