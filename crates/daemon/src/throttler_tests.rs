// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test(start_paused = true)]
async fn coalesces_bursts_into_a_single_flush_of_the_latest_emitter() {
    let throttler = Throttler::spawn(50, Duration::from_millis(5));
    let last_seen = Arc::new(AtomicUsize::new(0));
    let flushes = Arc::new(AtomicUsize::new(0));

    for i in 1..=10 {
        let seen = Arc::clone(&last_seen);
        let count = Arc::clone(&flushes);
        throttler.request_broadcast(move || {
            seen.store(i, Ordering::SeqCst);
            count.fetch_add(1, Ordering::SeqCst);
        });
    }

    tokio::time::advance(Duration::from_millis(50)).await;
    tokio::task::yield_now().await;

    assert_eq!(flushes.load(Ordering::SeqCst), 1);
    assert_eq!(last_seen.load(Ordering::SeqCst), 10);
    throttler.dispose();
}

#[tokio::test(start_paused = true)]
async fn token_bucket_bounds_flush_rate_under_flood() {
    let throttler = Throttler::spawn(2, Duration::from_millis(10));
    let flushes = Arc::new(AtomicUsize::new(0));

    for _ in 0..100 {
        let count = Arc::clone(&flushes);
        throttler.request_broadcast(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::advance(Duration::from_millis(1)).await;
    }
    tokio::time::advance(Duration::from_millis(500)).await;
    tokio::task::yield_now().await;

    let observed = flushes.load(Ordering::SeqCst);
    assert!(observed >= 1 && observed <= 2, "observed {observed} flushes");
    throttler.dispose();
}
