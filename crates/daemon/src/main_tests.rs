// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn log_file_path_ends_in_the_expected_subdirectory() {
    let path = log_file_path();
    assert_eq!(path.file_name().unwrap(), "fmdmd.log");
    assert_eq!(path.parent().unwrap().file_name().unwrap(), "fmdmd");
}
