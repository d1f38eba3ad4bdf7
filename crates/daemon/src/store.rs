// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The FMDM store: the single authoritative snapshot and its subscription
//! bus (spec.md §4.B). Lock, mutate a plain struct, clone an immutable
//! value out; never hold the lock across anything that could block or
//! `.await`.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use fmdm_backends::START_PCT;
use fmdm_core::{ClientSession, CuratedModelInfo, Fmdm, FolderEntry, FolderStatus, ModelCheckStatus};
use parking_lot::Mutex;

/// A reconciliation event for a single curated model's download lifecycle,
/// fed into [`Store::update_model_download_status`] by the download manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelDownloadEvent {
    /// A download has begun: `downloading=true`, progress starts at
    /// [`START_PCT`] — spec.md's monotone-progress invariant holds from the
    /// first `fmdm.update`, not just from the first timer tick.
    Started,
    /// Progress simulator or backend tick.
    Progress(u8),
    /// Backend finished successfully.
    Completed,
    /// Backend failed with the given message.
    Failed(String),
}

type Subscriber = Arc<dyn Fn(Arc<Fmdm>) + Send + Sync>;
type DownloadEventSubscriber = Arc<dyn Fn(&str, &ModelDownloadEvent) + Send + Sync>;

#[derive(Clone)]
struct Subscription {
    id: u64,
    callback: Subscriber,
}

#[derive(Clone)]
struct DownloadEventSubscription {
    id: u64,
    callback: DownloadEventSubscriber,
}

struct State {
    snapshot: Arc<Fmdm>,
    subscribers: Vec<Subscription>,
    download_event_subscribers: Vec<DownloadEventSubscription>,
    next_sub_id: u64,
}

/// Handle returned by [`Store::subscribe`]; dropping it does nothing on its
/// own — call [`SubscriptionHandle::unsubscribe`] explicitly, matching the
/// spec's `subscribe(fn) -> unsubscribe handle` contract rather than relying
/// on RAII semantics a caller might not expect.
pub struct SubscriptionHandle {
    id: u64,
    store: Arc<Mutex<State>>,
}

impl SubscriptionHandle {
    pub fn unsubscribe(self) {
        self.store.lock().subscribers.retain(|s| s.id != self.id);
    }
}

/// Handle returned by [`Store::subscribe_model_download_events`].
pub struct DownloadEventSubscriptionHandle {
    id: u64,
    store: Arc<Mutex<State>>,
}

impl DownloadEventSubscriptionHandle {
    pub fn unsubscribe(self) {
        self.store.lock().download_event_subscribers.retain(|s| s.id != self.id);
    }
}

/// Holds the authoritative FMDM snapshot and notifies subscribers, in
/// registration order, on every mutation.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<State>>,
}

impl Store {
    pub fn new(daemon_version: impl Into<String>) -> Self {
        let state = State {
            snapshot: Arc::new(Fmdm::empty(daemon_version)),
            subscribers: Vec::new(),
            download_event_subscribers: Vec::new(),
            next_sub_id: 0,
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    pub fn snapshot(&self) -> Arc<Fmdm> {
        Arc::clone(&self.state.lock().snapshot)
    }

    /// Register a subscriber, called synchronously with every new snapshot.
    pub fn subscribe(&self, callback: impl Fn(Arc<Fmdm>) + Send + Sync + 'static) -> SubscriptionHandle {
        let mut state = self.state.lock();
        let id = state.next_sub_id;
        state.next_sub_id += 1;
        state.subscribers.push(Subscription { id, callback: Arc::new(callback) });
        SubscriptionHandle { id, store: Arc::clone(&self.state) }
    }

    /// Register a subscriber for discrete model-download lifecycle events
    /// (spec.md §6 `model_download_start/_progress/_complete/_error`),
    /// called synchronously alongside the `fmdm.update` this event produces.
    pub fn subscribe_model_download_events(
        &self,
        callback: impl Fn(&str, &ModelDownloadEvent) + Send + Sync + 'static,
    ) -> DownloadEventSubscriptionHandle {
        let mut state = self.state.lock();
        let id = state.next_sub_id;
        state.next_sub_id += 1;
        state.download_event_subscribers.push(DownloadEventSubscription { id, callback: Arc::new(callback) });
        DownloadEventSubscriptionHandle { id, store: Arc::clone(&self.state) }
    }

    /// Replace the full folder list (bootstrap from persisted config).
    pub fn update_folders(&self, folders: Vec<FolderEntry>) {
        self.mutate(|fmdm| fmdm.folders = folders);
    }

    /// `updateFolderStatus`: a no-op if `path` is unknown — this call must
    /// never create a folder.
    pub fn update_folder_status(
        &self,
        path: &Path,
        status: FolderStatus,
        progress: Option<u8>,
        last_error: Option<String>,
    ) {
        self.mutate(|fmdm| {
            if let Some(folder) = fmdm.folders.iter_mut().find(|f| f.path == path) {
                folder.status = status;
                folder.progress = progress;
                folder.last_error = last_error;
            }
        });
    }

    /// `updateModelDownloadStatus`: reconciles the `CuratedModelInfo` and
    /// every folder currently waiting on `model_id`. A no-op if `model_id`
    /// is unknown.
    pub fn update_model_download_status(&self, model_id: &str, event: ModelDownloadEvent) {
        let mut model_found = false;
        self.mutate(|fmdm| {
            let Some(model) = fmdm.curated_models.iter_mut().find(|m| m.id == model_id) else { return };
            model_found = true;

            match &event {
                ModelDownloadEvent::Started => {
                    model.downloading = true;
                    model.download_progress = START_PCT;
                    model.download_error = None;
                }
                ModelDownloadEvent::Progress(pct) => {
                    model.downloading = true;
                    model.download_progress = *pct;
                }
                ModelDownloadEvent::Completed => {
                    model.installed = true;
                    model.downloading = false;
                    model.download_progress = 100;
                    model.download_error = None;
                }
                ModelDownloadEvent::Failed(message) => {
                    model.downloading = false;
                    model.download_progress = 0;
                    model.download_error = Some(message.clone());
                }
            }
            model.last_checked = Utc::now();

            for folder in fmdm.folders.iter_mut() {
                if folder.model != model_id || folder.status != FolderStatus::DownloadingModel {
                    continue;
                }
                match &event {
                    ModelDownloadEvent::Started => folder.progress = Some(START_PCT),
                    ModelDownloadEvent::Progress(pct) => folder.progress = Some(*pct),
                    ModelDownloadEvent::Completed => {
                        folder.status = FolderStatus::Pending;
                        folder.progress = None;
                    }
                    ModelDownloadEvent::Failed(message) => {
                        folder.status = FolderStatus::Error;
                        folder.progress = None;
                        folder.last_error = Some(message.clone());
                    }
                }
            }
        });

        if model_found {
            let callbacks: Vec<DownloadEventSubscriber> =
                self.state.lock().download_event_subscribers.iter().map(|s| Arc::clone(&s.callback)).collect();
            for callback in callbacks {
                callback(model_id, &event);
            }
        }
    }

    pub fn set_curated_models(&self, models: Vec<CuratedModelInfo>, check_status: ModelCheckStatus) {
        self.mutate(|fmdm| {
            fmdm.curated_models = models;
            fmdm.model_check_status = check_status;
        });
    }

    pub fn update_clients(&self, clients: Vec<ClientSession>) {
        self.mutate(|fmdm| fmdm.clients = clients);
    }

    /// Lock, clone-and-mutate the snapshot, publish, notify — never hold
    /// the lock while invoking a subscriber (a subscriber calling back into
    /// the store, e.g. to log via another mutation, must not deadlock).
    fn mutate(&self, f: impl FnOnce(&mut Fmdm)) {
        let (new_snapshot, callbacks) = {
            let mut state = self.state.lock();
            let mut fmdm = (*state.snapshot).clone();
            f(&mut fmdm);
            let new_snapshot = Arc::new(fmdm);
            state.snapshot = Arc::clone(&new_snapshot);
            let callbacks: Vec<Subscriber> = state.subscribers.iter().map(|s| Arc::clone(&s.callback)).collect();
            (new_snapshot, callbacks)
        };
        for callback in callbacks {
            callback(Arc::clone(&new_snapshot));
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

