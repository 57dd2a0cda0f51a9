// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::identity::Identity;

#[tokio::test]
async fn access_follows_the_impersonated_identity() {
    let identity = TaskLocalIdentity::with_session(Identity::new("caller"));
    let store = FakeContentStore::new(identity.clone());
    store.add_folder("/home/admin", "admin");

    let perms = [Permission::Read, Permission::Write];
    assert!(!store.has_access("/home/admin", &perms).await.unwrap());

    let inner = store.clone();
    let granted = identity
        .run_as(Identity::new("admin"), async move {
            inner.has_access("/home/admin", &perms).await
        })
        .await
        .unwrap();
    assert!(granted);

    let calls = store.calls();
    assert_eq!(
        calls[1],
        ContentCall::HasAccess {
            path: "/home/admin".to_string(),
            user: Some("admin".to_string()),
        }
    );
}

#[tokio::test]
async fn delete_permission_is_never_granted() {
    let identity = TaskLocalIdentity::with_session(Identity::new("admin"));
    let store = FakeContentStore::new(identity);
    store.add_folder("/public", "admin");
    assert!(!store
        .has_access("/public", &[Permission::Delete])
        .await
        .unwrap());
}

#[tokio::test]
async fn failing_paths_error_but_are_recorded() {
    let store = FakeContentStore::default();
    store.fail_path("/broken");
    assert!(store.folder_exists("/broken").await.is_err());
    assert_eq!(store.exists_checks("/broken"), 1);
}

#[tokio::test]
async fn output_stream_writes_into_file() {
    let store = FakeContentStore::default();
    let mut out = store.open_output("/home/admin/report.txt").await.unwrap();
    assert_eq!(store.file_content("/home/admin/report.txt"), Some(Vec::new()));

    out.write_all(b"hello").unwrap();
    drop(out);

    let file = store.get_file("/home/admin/report.txt").await.unwrap().unwrap();
    assert_eq!(file.size, 5);
    store.delete_file(&file.id).await.unwrap();
    assert!(store.get_file("/home/admin/report.txt").await.unwrap().is_none());
}
