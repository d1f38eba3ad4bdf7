// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn pong_serializes_with_tag() {
    let json = serde_json::to_string(&Response::Pong { id: "r1".to_string() }).unwrap();
    assert!(json.contains(r#""type":"pong""#));
    assert!(json.contains(r#""id":"r1""#));
}

#[test]
fn action_failure_omits_error_field_when_none() {
    let json = serde_json::to_string(&Response::action_success("r1")).unwrap();
    assert!(!json.contains("error"));
}
