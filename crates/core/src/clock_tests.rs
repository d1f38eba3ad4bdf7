// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_both_axes() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let u0 = clock.utc_now();
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.now() - t0, Duration::from_secs(5));
    assert_eq!(clock.utc_now() - u0, chrono::Duration::seconds(5));
}
