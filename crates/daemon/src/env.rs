// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment knobs consumed by the core (spec.md §6).

use std::time::Duration;

/// Default WebSocket port (spec.md §6: "default `31850`").
pub const DEFAULT_PORT: u16 = 31850;

/// Whether the process should run with tightened throttler timings for
/// fast test execution (`FMDMD_TEST_MODE=1`).
pub fn test_mode() -> bool {
    std::env::var("FMDMD_TEST_MODE").map(|v| v == "1").unwrap_or(false)
}

/// Throttler tuning: `(max_updates_per_second, debounce)`.
pub fn throttler_tuning() -> (u32, Duration) {
    if test_mode() {
        (50, Duration::from_millis(5))
    } else {
        (10, Duration::from_millis(100))
    }
}

/// WebSocket port override via `FMDMD_PORT`, falling back to the CLI value
/// or [`DEFAULT_PORT`].
pub fn port_override() -> Option<u16> {
    std::env::var("FMDMD_PORT").ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

