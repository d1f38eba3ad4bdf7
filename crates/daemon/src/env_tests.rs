// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_mode_reads_the_env_var() {
    std::env::remove_var("FMDMD_TEST_MODE");
    assert!(!test_mode());
    std::env::set_var("FMDMD_TEST_MODE", "1");
    assert!(test_mode());
    std::env::remove_var("FMDMD_TEST_MODE");
}
