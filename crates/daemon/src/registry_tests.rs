// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn info(pid: u32, ws_port: u16) -> RegistryInfo {
    RegistryInfo { pid, http_port: 0, ws_port, start_time: Utc::now(), version: "0.1.0".to_string() }
}

#[test]
fn register_then_discover_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.json");
    let mut registry = Registry::new(path.clone());
    registry.register(info(std::process::id(), 31850)).unwrap();

    let discovered = Registry::discover(&path).unwrap();
    assert_eq!(discovered.ws_port, 31850);
}

#[test]
fn second_register_on_same_file_handle_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.json");
    let mut first = Registry::new(path.clone());
    first.register(info(std::process::id(), 31850)).unwrap();

    let mut second = Registry::new(path);
    let err = second.register(info(std::process::id(), 31851)).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRunning { .. }));
}

#[test]
fn discover_ignores_dead_pid_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.json");
    // A pid essentially guaranteed not to be alive in a test sandbox.
    let stale = info(u32::MAX - 1, 31850);
    fs::write(&path, serde_json::to_vec(&stale).unwrap()).unwrap();

    assert_eq!(Registry::discover(&path), None);
}

#[test]
fn cleanup_only_removes_entries_owned_by_this_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.json");
    fs::write(&path, serde_json::to_vec(&info(u32::MAX - 1, 31850)).unwrap()).unwrap();

    let mut registry = Registry::new(path.clone());
    registry.lock_file = None; // never actually registered by us
    registry.cleanup();
    assert!(path.exists(), "cleanup must not remove another pid's entry");
}
