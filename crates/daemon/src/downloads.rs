// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Model Download Manager (spec.md §4.F): deduplicated, priority-ordered,
//! single-flight-per-`modelId` download queue driving FMDM state.
//!
//! The queue/active bookkeeping lives behind a `parking_lot::Mutex` that is
//! never held across an `.await`; the actual download runs in a dedicated
//! worker task woken by a `Notify`, splitting "update shared state" from
//! "run the long-lived loop".

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fmdm_backends::{BackendRouter, ProgressCurve, CADENCE_MS};
use fmdm_core::{DownloadPriority, DownloadRequest};
use parking_lot::Mutex;
use tokio::sync::{broadcast, Notify};
use tracing::{info, warn};

use crate::store::{ModelDownloadEvent, Store};

/// Default wait for `ensure_model_available` when the caller does not name
/// a tighter bound.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct Outcome {
    model_id: String,
    success: bool,
}

struct State {
    active: Option<DownloadRequest>,
    queue: Vec<DownloadRequest>,
}

struct Inner {
    store: Store,
    router: BackendRouter,
    state: Mutex<State>,
    notify: Notify,
    outcomes: broadcast::Sender<Outcome>,
}

#[derive(Clone)]
pub struct DownloadManager {
    inner: Arc<Inner>,
}

impl DownloadManager {
    pub fn spawn(store: Store, router: BackendRouter) -> Self {
        let (outcomes, _) = broadcast::channel(64);
        let inner =
            Arc::new(Inner { store, router, state: Mutex::new(State { active: None, queue: Vec::new() }), notify: Notify::new(), outcomes });
        let worker = Arc::clone(&inner);
        tokio::spawn(async move { run(worker).await });
        Self { inner }
    }

    fn is_installed(&self, model_id: &str) -> bool {
        self.inner.store.snapshot().curated_models.iter().any(|m| m.id == model_id && m.installed)
    }

    /// Idempotent admission: merges into an active or queued request for the
    /// same `modelId`, otherwise enqueues.
    pub fn request_download(
        &self,
        model_id: &str,
        requesting_folders: impl IntoIterator<Item = PathBuf>,
        priority: DownloadPriority,
    ) {
        if self.is_installed(model_id) {
            return;
        }
        let folders: BTreeSet<PathBuf> = requesting_folders.into_iter().collect();

        let mut state = self.inner.state.lock();
        if let Some(active) = &mut state.active {
            if active.model_id == model_id {
                active.merge(priority, folders);
                return;
            }
        }
        if let Some(pos) = state.queue.iter().position(|r| r.model_id == model_id) {
            state.queue[pos].merge(priority, folders);
        } else {
            state.queue.push(DownloadRequest { model_id: model_id.to_string(), priority, requesting_folders: folders });
        }
        // Only actually reorders when a priority was upgraded; a stable sort
        // over an already-sorted vector is a no-op otherwise.
        state.queue.sort_by(|a, b| b.priority.cmp(&a.priority));
        drop(state);
        self.inner.notify.notify_one();
    }

    pub fn is_model_available(&self, model_id: &str) -> bool {
        if self.is_installed(model_id) {
            return true;
        }
        let state = self.inner.state.lock();
        state.active.as_ref().is_some_and(|a| a.model_id == model_id) || state.queue.iter().any(|r| r.model_id == model_id)
    }

    /// Request at `high` priority and wait cooperatively until installed,
    /// failed, or `timeout` elapses. Holds no lock across the wait.
    pub async fn ensure_model_available(&self, model_id: &str, folder: PathBuf, timeout: Duration) -> bool {
        if self.is_installed(model_id) {
            return true;
        }
        let mut outcomes = self.inner.outcomes.subscribe();
        self.request_download(model_id, [folder], DownloadPriority::High);

        let wait = async {
            loop {
                match outcomes.recv().await {
                    Ok(outcome) if outcome.model_id == model_id => break outcome.success,
                    Ok(_) => continue,
                    Err(_) => break self.is_installed(model_id),
                }
            }
        };
        tokio::time::timeout(timeout, wait).await.unwrap_or(false)
    }

    /// Clears the queue and marks any active download failed immediately,
    /// without awaiting the backend (spec.md §9 Open Questions: fire-and-
    /// forget release of the slot).
    pub fn cancel_all(&self) {
        let (queued, active) = {
            let mut state = self.inner.state.lock();
            (std::mem::take(&mut state.queue), state.active.take())
        };
        for request in queued.into_iter().chain(active) {
            self.inner.store.update_model_download_status(&request.model_id, ModelDownloadEvent::Failed("cancelled".to_string()));
            let _ = self.inner.outcomes.send(Outcome { model_id: request.model_id, success: false });
        }
        self.inner.notify.notify_one();
    }
}

async fn run(inner: Arc<Inner>) {
    loop {
        let next = {
            let mut state = inner.state.lock();
            if state.active.is_none() && !state.queue.is_empty() {
                let request = state.queue.remove(0);
                state.active = Some(request.clone());
                Some(request)
            } else {
                None
            }
        };

        let Some(request) = next else {
            inner.notify.notified().await;
            continue;
        };

        execute_download(&inner, request).await;
        inner.state.lock().active = None;
        inner.notify.notify_one();
    }
}

async fn execute_download(inner: &Arc<Inner>, request: DownloadRequest) {
    let model_id = request.model_id;
    info!(model_id = %model_id, folders = request.requesting_folders.len(), "starting model download");
    inner.store.update_model_download_status(&model_id, ModelDownloadEvent::Started);

    let backend = match inner.router.resolve(&model_id) {
        Ok(backend) => backend,
        Err(err) => {
            warn!(model_id = %model_id, %err, "no backend for model");
            finish(inner, &model_id, Err(err.to_string()));
            return;
        }
    };

    let download = backend.download(&model_id);
    tokio::pin!(download);

    let mut curve = ProgressCurve::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(CADENCE_MS));
    ticker.tick().await; // the first tick fires immediately; progress already starts at START_PCT via `Started`

    let result = loop {
        tokio::select! {
            outcome = &mut download => break outcome,
            _ = ticker.tick() => {
                let pct = curve.advance();
                inner.store.update_model_download_status(&model_id, ModelDownloadEvent::Progress(pct));
            }
        }
    };

    finish(inner, &model_id, result.map_err(|err| err.to_string()));
}

fn finish(inner: &Arc<Inner>, model_id: &str, result: Result<(), String>) {
    match result {
        Ok(()) => {
            info!(model_id, "model download completed");
            inner.store.update_model_download_status(model_id, ModelDownloadEvent::Completed);
            let _ = inner.outcomes.send(Outcome { model_id: model_id.to_string(), success: true });
        }
        Err(message) => {
            warn!(model_id, %message, "model download failed");
            inner.store.update_model_download_status(model_id, ModelDownloadEvent::Failed(message));
            let _ = inner.outcomes.send(Outcome { model_id: model_id.to_string(), success: false });
        }
    }
}

#[cfg(test)]
#[path = "downloads_tests.rs"]
mod tests;

