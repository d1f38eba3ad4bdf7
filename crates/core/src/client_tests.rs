// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_session_starts_unknown_and_uninitialized() {
    let session = ClientSession::new(Uuid::nil(), Utc::now());
    assert_eq!(session.kind, ClientType::Unknown);
    assert!(!session.initialized);
}

#[test]
fn client_type_rejects_unknown_strings() {
    assert_eq!(ClientType::parse("tui"), Some(ClientType::Tui));
    assert_eq!(ClientType::parse("robot"), None);
}
