// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::Store;
use fmdm_backends::test_support::FakeBackend;
use fmdm_backends::BackendRouter;
use fmdm_config::MemoryConfiguration;
use fmdm_core::CuratedModelInfo;

fn context() -> HandlerContext {
    let store = Store::new("0.1.0");
    store.set_curated_models(
        vec![CuratedModelInfo::new("cpu:m", fmdm_core::ModelKind::Cpu, chrono::Utc::now())],
        fmdm_core::ModelCheckStatus::Done,
    );
    let downloads = DownloadManager::spawn(
        store.clone(),
        BackendRouter::new(FakeBackend::succeeding(), FakeBackend::succeeding(), FakeBackend::succeeding()),
    );
    let lifecycle = Arc::new(LifecycleManager::new(store.clone(), downloads.clone(), Arc::new(crate::lifecycle::StubIndexer)));
    HandlerContext { store, config: Arc::new(MemoryConfiguration::new(None)), lifecycle, downloads }
}

#[tokio::test]
async fn ping_dispatches_to_pong() {
    let ctx = context();
    match dispatch(&ctx, Request::Ping { id: "r1".to_string() }) {
        Dispatched::Responses(responses) => assert_eq!(responses, vec![Response::Pong { id: "r1".to_string() }]),
        _ => panic!("expected Responses"),
    }
}

#[tokio::test]
async fn unknown_client_type_is_rejected_without_mutating_state() {
    let ctx = context();
    match dispatch(&ctx, Request::ConnectionInit { client_type: "robot".to_string() }) {
        Dispatched::Responses(responses) => assert_eq!(responses.len(), 1),
        Dispatched::ConnectionInit { .. } => panic!("unknown clientType must not be accepted"),
    }
}
