// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_notify_records_sends() {
    let adapter = FakeNotifyAdapter::new();

    adapter
        .notify(Notification::new("a@example.com", "Report ready", "done").with_output("/out/a.pdf"))
        .await
        .unwrap();

    let sent = adapter.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "a@example.com");
    assert_eq!(sent[0].output_path.as_deref(), Some("/out/a.pdf"));
}

#[tokio::test]
async fn failing_fake_still_records_attempt() {
    let adapter = FakeNotifyAdapter::new();
    adapter.set_failing(true);

    let result = adapter
        .notify(Notification::new("a@example.com", "s", "b"))
        .await;

    assert!(result.is_err());
    assert_eq!(adapter.sent().len(), 1);
}
