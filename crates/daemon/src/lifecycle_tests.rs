// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fmdm_backends::test_support::FakeBackend;
use fmdm_backends::BackendRouter;
use fmdm_core::{CuratedModelInfo, ModelCheckStatus, ModelKind};
use std::time::Duration;

fn store_with_model(model_id: &str, installed: bool) -> Store {
    let store = Store::new("0.1.0");
    let mut model = CuratedModelInfo::new(model_id, ModelKind::Cpu, chrono::Utc::now());
    model.installed = installed;
    model.download_progress = if installed { 100 } else { 0 };
    store.set_curated_models(vec![model], ModelCheckStatus::Done);
    store
}

#[tokio::test]
async fn already_installed_model_skips_straight_to_indexing() {
    let store = store_with_model("cpu:m", true);
    let downloads = DownloadManager::spawn(
        store.clone(),
        BackendRouter::new(FakeBackend::succeeding(), FakeBackend::succeeding(), FakeBackend::succeeding()),
    );
    let manager = LifecycleManager::new(store.clone(), downloads, Arc::new(StubIndexer));

    manager.start_folder(FolderEntry::new(PathBuf::from("/a"), "cpu:m"));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(store.snapshot().folders[0].status, FolderStatus::Active);
}

#[tokio::test]
async fn missing_model_downloads_then_indexes() {
    let store = store_with_model("cpu:m", false);
    store.update_folders(vec![FolderEntry::new(PathBuf::from("/a"), "cpu:m")]);
    let downloads = DownloadManager::spawn(
        store.clone(),
        BackendRouter::new(FakeBackend::succeeding(), FakeBackend::succeeding(), FakeBackend::succeeding()),
    );
    let manager = LifecycleManager::new(store.clone(), downloads, Arc::new(StubIndexer));

    manager.start_folder(store.snapshot().folders[0].clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.snapshot().folders[0].status, FolderStatus::Active);
}

#[tokio::test]
async fn start_folder_is_idempotent_per_path() {
    let store = store_with_model("cpu:m", true);
    let downloads = DownloadManager::spawn(
        store.clone(),
        BackendRouter::new(FakeBackend::succeeding(), FakeBackend::succeeding(), FakeBackend::succeeding()),
    );
    let manager = LifecycleManager::new(store, downloads, Arc::new(StubIndexer));
    let entry = FolderEntry::new(PathBuf::from("/a"), "cpu:m");

    manager.start_folder(entry.clone());
    manager.start_folder(entry);
    assert_eq!(manager.tasks.lock().len(), 1);
}

#[test]
fn subfolder_of_existing_folder_is_rejected() {
    let parent = tempfile::tempdir().unwrap();
    let child = parent.path().join("child");
    std::fs::create_dir(&child).unwrap();
    let canonical_parent = std::fs::canonicalize(parent.path()).unwrap();
    let existing = vec![FolderEntry::new(canonical_parent, "cpu:m")];

    let (errors, _) = validate(&child, &existing);
    assert_eq!(errors, vec![ValidationError::Subfolder]);
}

#[test]
fn duplicate_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let existing = vec![FolderEntry::new(std::fs::canonicalize(dir.path()).unwrap(), "cpu:m")];
    let (errors, _) = validate(dir.path(), &existing);
    assert_eq!(errors, vec![ValidationError::Duplicate]);
}

#[test]
fn ancestor_of_existing_folder_is_a_warning_not_an_error() {
    let parent = tempfile::tempdir().unwrap();
    let child = parent.path().join("child");
    std::fs::create_dir(&child).unwrap();
    let canonical_child = std::fs::canonicalize(&child).unwrap();
    let existing = vec![FolderEntry::new(canonical_child.clone(), "cpu:m")];

    let (errors, warnings) = validate(parent.path(), &existing);
    assert!(errors.is_empty());
    assert_eq!(warnings, vec![ValidationWarning::Ancestor { affected_folders: vec![canonical_child] }]);
}
