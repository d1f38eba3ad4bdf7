// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broadcast throttler: trailing-edge debounce plus a token bucket
//! (spec.md §4.C). A small actor owning its own timer rather than
//! blocking the caller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

type Emitter = Box<dyn Fn() + Send + Sync>;

struct Shared {
    latest: Mutex<Option<Emitter>>,
    wake: Notify,
}

/// Coalesces many `requestBroadcast` calls into bursts bounded by
/// `maxUpdatesPerSecond`, each a `debounceMs` trailing-edge flush.
pub struct Throttler {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Throttler {
    pub fn spawn(max_updates_per_second: u32, debounce: Duration) -> Self {
        let shared = Arc::new(Shared { latest: Mutex::new(None), wake: Notify::new() });
        let worker = Arc::clone(&shared);
        let task = tokio::spawn(async move { run(worker, max_updates_per_second, debounce).await });
        Self { shared, task: Mutex::new(Some(task)) }
    }

    /// Register the latest emitter and ensure a flush is scheduled.
    /// Intermediate calls before the flush fires are coalesced: only the
    /// most recently registered emitter is ever invoked.
    pub fn request_broadcast(&self, emit: impl Fn() + Send + Sync + 'static) {
        *self.shared.latest.lock() = Some(Box::new(emit));
        self.shared.wake.notify_one();
    }

    /// Cancel the worker task. No further scheduled flush will fire.
    /// Idempotent: disposing twice (e.g. from a shared `Arc<Throttler>`
    /// during shutdown) is a no-op the second time.
    pub fn dispose(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

async fn run(shared: Arc<Shared>, max_updates_per_second: u32, debounce: Duration) {
    let token_interval = Duration::from_secs(1) / max_updates_per_second.max(1);
    let mut next_token_at = Instant::now();

    loop {
        shared.wake.notified().await;
        tokio::time::sleep(debounce).await;

        let now = Instant::now();
        if now < next_token_at {
            tokio::time::sleep(next_token_at - now).await;
        }

        let emitter = shared.latest.lock().take();
        if let Some(emit) = emitter {
            trace!("flushing coalesced broadcast");
            emit();
            next_token_at = Instant::now() + token_interval;
        }
    }
}

#[cfg(test)]
#[path = "throttler_tests.rs"]
mod tests;

