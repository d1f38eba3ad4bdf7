// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_backend_replays_scripted_outcomes_in_order() {
    let backend = test_support::FakeBackend::new(vec![
        Err(BackendError::ProcessFailed("first try".into())),
        Ok(()),
    ]);
    assert!(backend.download("cpu:m").await.is_err());
    assert!(backend.download("cpu:m").await.is_ok());
    assert_eq!(backend.call_count(), 2);
}
