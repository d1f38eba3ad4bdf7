// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::FakeBackend;

#[test]
fn resolves_each_prefix_to_its_own_backend() {
    let router = BackendRouter::new(
        FakeBackend::succeeding(),
        FakeBackend::failing("gpu down"),
        FakeBackend::succeeding(),
    );
    assert!(router.resolve("cpu:m").is_ok());
    assert!(router.resolve("gpu:m").is_ok());
    assert!(router.resolve("ollama:m").is_ok());
    assert!(router.resolve("weird:m").is_err());
}
