// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fmdm_backends::test_support::FakeBackend;
use fmdm_backends::{BackendError, ModelBackend};
use fmdm_core::{CuratedModelInfo, ModelCheckStatus, ModelKind};

fn router_with(onnx: Arc<dyn ModelBackend>) -> BackendRouter {
    BackendRouter::new(onnx, FakeBackend::succeeding(), FakeBackend::succeeding())
}

fn store_with_model(model_id: &str) -> Store {
    let store = Store::new("0.1.0");
    store.set_curated_models(vec![CuratedModelInfo::new(model_id, ModelKind::Cpu, chrono::Utc::now())], ModelCheckStatus::Done);
    store
}

#[tokio::test]
async fn ensure_model_available_resolves_true_on_backend_success() {
    let store = store_with_model("cpu:m");
    let manager = DownloadManager::spawn(store.clone(), router_with(FakeBackend::succeeding()));

    let ok = manager.ensure_model_available("cpu:m", PathBuf::from("/a"), Duration::from_secs(5)).await;
    assert!(ok);
    assert!(store.snapshot().curated_models[0].installed);
}

#[tokio::test]
async fn ensure_model_available_resolves_false_on_backend_failure() {
    let store = store_with_model("cpu:m");
    let manager = DownloadManager::spawn(store.clone(), router_with(FakeBackend::failing("boom")));

    let ok = manager.ensure_model_available("cpu:m", PathBuf::from("/a"), Duration::from_secs(5)).await;
    assert!(!ok);
    assert_eq!(store.snapshot().curated_models[0].download_error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn concurrent_requests_for_the_same_model_share_one_download() {
    let store = store_with_model("cpu:m");
    let manager = DownloadManager::spawn(store, router_with(FakeBackend::succeeding()));

    for i in 0..50 {
        manager.request_download("cpu:m", [PathBuf::from(format!("/f{i}"))], DownloadPriority::Normal);
    }
    let ok = manager.ensure_model_available("cpu:m", PathBuf::from("/last"), Duration::from_secs(5)).await;
    assert!(ok);
}

#[derive(Default)]
struct NeverBackend;

#[async_trait::async_trait]
impl ModelBackend for NeverBackend {
    async fn download(&self, _model_id: &str) -> Result<(), BackendError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn ensure_model_available_times_out_without_hanging() {
    let store = store_with_model("cpu:m");
    let manager = DownloadManager::spawn(store, router_with(Arc::new(NeverBackend)));

    let ok = manager.ensure_model_available("cpu:m", PathBuf::from("/a"), Duration::from_millis(50)).await;
    assert!(!ok);
}

#[tokio::test]
async fn cancel_all_marks_active_and_queued_failed() {
    let store = store_with_model("cpu:m");
    let manager = DownloadManager::spawn(store.clone(), router_with(Arc::new(NeverBackend)));
    manager.request_download("cpu:m", [PathBuf::from("/a")], DownloadPriority::High);
    tokio::task::yield_now().await;

    manager.cancel_all();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(store.snapshot().curated_models[0].download_error.as_deref(), Some("cancelled"));
}
