// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon Orchestrator (spec.md §4.I): registers with the discovery
//! registry, wires every other component, and translates signals into a
//! graceful, RAII-style shutdown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fmdm_config::{Configuration, FolderConfigEntry};
use fmdm_core::{CuratedModelInfo, DaemonEvent, FolderEntry, ModelCheckStatus};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::downloads::DownloadManager;
use crate::handlers::HandlerContext;
use crate::lifecycle::{LifecycleManager, StubIndexer};
use crate::registry::{Registry, RegistryError, RegistryInfo};
use crate::server::Server;
use crate::store::Store;
use crate::throttler::Throttler;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to load persisted folders: {0}")]
    Config(String),
    #[error("server failed: {0}")]
    Server(#[from] std::io::Error),
}

pub struct OrchestratorConfig {
    pub host: String,
    pub port: u16,
    pub daemon_version: String,
    pub registry_path: PathBuf,
    pub max_updates_per_second: u32,
    pub debounce: Duration,
}

/// Owns every long-lived component and the single `stop()` entry point.
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: Registry,
    store: Store,
    throttler: Arc<Throttler>,
    server: Arc<Server>,
    downloads: DownloadManager,
    lifecycle: Arc<LifecycleManager>,
    events: broadcast::Sender<DaemonEvent>,
}

impl Orchestrator {
    pub fn bootstrap(
        config: OrchestratorConfig,
        configuration: Arc<dyn Configuration>,
        curated_models: Vec<CuratedModelInfo>,
    ) -> Result<Self, OrchestratorError> {
        let store = Store::new(config.daemon_version.clone());
        store.set_curated_models(curated_models, ModelCheckStatus::Done);

        let persisted = configuration.load_folders().map_err(|e| OrchestratorError::Config(e.to_string()))?;
        let folders: Vec<FolderEntry> = persisted.iter().map(|f| FolderEntry::new(f.path.clone(), f.model.clone())).collect();
        store.update_folders(folders.clone());

        let downloads = DownloadManager::spawn(store.clone(), fmdm_backends::BackendRouter::production());
        let lifecycle = Arc::new(LifecycleManager::new(store.clone(), downloads.clone(), Arc::new(StubIndexer)));
        for entry in folders {
            lifecycle.start_folder(entry);
        }

        let throttler = Arc::new(Throttler::spawn(config.max_updates_per_second, config.debounce));
        let ctx = Arc::new(HandlerContext { store: store.clone(), config: configuration, lifecycle: Arc::clone(&lifecycle), downloads: downloads.clone() });
        let server = Arc::new(Server::new(store.clone(), ctx, Arc::clone(&throttler)));
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            registry: Registry::new(config.registry_path.clone()),
            config,
            store,
            throttler,
            server,
            downloads,
            lifecycle,
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DaemonEvent> {
        self.events.subscribe()
    }

    /// Registers as the host's daemon, then serves until cancelled via
    /// `stop()` or the returned future completing with an error.
    ///
    /// Takes `&mut self` rather than `self` so a caller racing this future
    /// against a signal handler in a `tokio::select!` still owns the
    /// `Orchestrator` afterward and can call `stop()` on it.
    pub async fn run(&mut self) -> Result<(), OrchestratorError> {
        let info = RegistryInfo { pid: std::process::id(), http_port: 0, ws_port: self.config.port, start_time: Utc::now(), version: self.config.daemon_version.clone() };
        self.registry.register(info)?;
        let _ = self.events.send(DaemonEvent::Started);
        info!(port = self.config.port, "daemon registered and starting");

        let result = self.server.start(&self.config.host, self.config.port).await;
        if let Err(err) = &result {
            warn!(%err, "server loop exited with an error");
            let _ = self.events.send(DaemonEvent::Error(err.to_string()));
        }
        result.map_err(OrchestratorError::from)
    }

    /// Graceful shutdown: cancel the throttler, stop admitting new
    /// downloads, and unregister — each step best-effort so one failure
    /// does not block the rest (spec.md §5).
    pub fn stop(&mut self) {
        info!("shutting down");
        self.downloads.cancel_all();
        self.throttler.dispose();
        self.registry.cleanup();
        let _ = self.events.send(DaemonEvent::Stopped);
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

