// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folder Lifecycle Manager (spec.md §4.G): one state machine per folder
//! path, coupling model availability with indexing.
//!
//! One supervision task per folder path, tracked in a
//! `HashMap<PathBuf, JoinHandle<()>>` behind a `parking_lot::Mutex`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fmdm_core::{FolderEntry, FolderStatus, ValidationError, ValidationWarning};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::downloads::{DownloadManager, DEFAULT_DOWNLOAD_TIMEOUT};
use crate::store::Store;

#[derive(Debug, Error)]
#[error("indexing failed: {0}")]
pub struct IndexError(pub String);

/// Performs the actual indexing work for one folder. Chunking/embedding is
/// out of scope (spec.md §1); this is the seam a real indexer plugs into.
#[async_trait]
pub trait Indexer: Send + Sync + 'static {
    async fn index(&self, path: &Path) -> Result<(), IndexError>;
}

/// Deterministic stand-in indexer: always succeeds. Gives tests a
/// controllable "indexing" phase without a real indexer collaborator.
pub struct StubIndexer;

#[async_trait]
impl Indexer for StubIndexer {
    async fn index(&self, _path: &Path) -> Result<(), IndexError> {
        Ok(())
    }
}

/// Validate a candidate folder path against the existing folder set
/// (spec.md §4.G validation rules). Used by both `folder.validate` and
/// `folder.add`.
pub fn validate(path: &Path, existing: &[FolderEntry]) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
    if !path.exists() {
        return (vec![ValidationError::NotExists], Vec::new());
    }
    if !path.is_dir() {
        return (vec![ValidationError::NotDirectory], Vec::new());
    }
    if let Err(io_err) = std::fs::read_dir(path) {
        if io_err.kind() == std::io::ErrorKind::PermissionDenied {
            return (vec![ValidationError::PermissionDenied], Vec::new());
        }
    }

    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut errors = Vec::new();
    let mut affected_ancestors = Vec::new();

    for entry in existing {
        if entry.path == canonical {
            errors.push(ValidationError::Duplicate);
        } else if entry.is_ancestor_of(&canonical) {
            errors.push(ValidationError::Subfolder);
        } else if entry.is_descendant_of(&canonical) {
            affected_ancestors.push(entry.path.clone());
        }
    }

    let warnings = if affected_ancestors.is_empty() {
        Vec::new()
    } else {
        vec![ValidationWarning::Ancestor { affected_folders: affected_ancestors }]
    };
    (errors, warnings)
}

/// Drives each indexed folder through `pending -> downloading-model? ->
/// indexing -> active|error`.
pub struct LifecycleManager {
    store: Store,
    downloads: DownloadManager,
    indexer: Arc<dyn Indexer>,
    tasks: Mutex<HashMap<PathBuf, JoinHandle<()>>>,
}

impl LifecycleManager {
    pub fn new(store: Store, downloads: DownloadManager, indexer: Arc<dyn Indexer>) -> Self {
        Self { store, downloads, indexer, tasks: Mutex::new(HashMap::new()) }
    }

    /// Idempotent per path: a no-op if a lifecycle is already running for
    /// `entry.path`.
    pub fn start_folder(&self, entry: FolderEntry) {
        let mut tasks = self.tasks.lock();
        if tasks.contains_key(&entry.path) {
            return;
        }
        let path = entry.path.clone();
        let store = self.store.clone();
        let downloads = self.downloads.clone();
        let indexer = Arc::clone(&self.indexer);
        let handle = tokio::spawn(async move { run_folder(store, downloads, indexer, entry).await });
        tasks.insert(path, handle);
    }

    /// Cancels in-flight work scoped to this folder only; a shared model
    /// download keeps running for other folders waiting on it.
    pub fn stop_folder(&self, path: &Path) {
        if let Some(handle) = self.tasks.lock().remove(path) {
            handle.abort();
        }
    }
}

async fn run_folder(store: Store, downloads: DownloadManager, indexer: Arc<dyn Indexer>, entry: FolderEntry) {
    let model_installed = store.snapshot().curated_models.iter().any(|m| m.id == entry.model && m.installed);

    if !model_installed {
        store.update_folder_status(&entry.path, FolderStatus::DownloadingModel, Some(0), None);
        let ready = downloads.ensure_model_available(&entry.model, entry.path.clone(), DEFAULT_DOWNLOAD_TIMEOUT).await;
        if !ready {
            // A hard failure already moved the folder to `error` via the
            // store's own model-download reconciliation; a timeout leaves
            // the folder waiting for the in-flight download to finish on
            // its own and publish a later transition.
            return;
        }
    }

    store.update_folder_status(&entry.path, FolderStatus::Indexing, None, None);
    match indexer.index(&entry.path).await {
        Ok(()) => {
            info!(path = %entry.path.display(), "folder indexed");
            store.update_folder_status(&entry.path, FolderStatus::Active, None, None);
        }
        Err(err) => {
            error!(path = %entry.path.display(), %err, "indexing failed");
            store.update_folder_status(&entry.path, FolderStatus::Error, None, Some(err.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

