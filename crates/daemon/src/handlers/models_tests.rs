// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::downloads::DownloadManager;
use crate::lifecycle::{LifecycleManager, StubIndexer};
use crate::store::Store;
use fmdm_backends::test_support::FakeBackend;
use fmdm_backends::BackendRouter;
use fmdm_config::MemoryConfiguration;
use fmdm_core::{CuratedModelInfo, ModelCheckStatus, ModelKind};
use std::sync::Arc;

#[tokio::test]
async fn lists_curated_model_ids_and_installed_state() {
    let store = Store::new("0.1.0");
    let mut model = CuratedModelInfo::new("cpu:m", ModelKind::Cpu, chrono::Utc::now());
    model.installed = true;
    model.download_progress = 100;
    store.set_curated_models(vec![model], ModelCheckStatus::Done);

    let downloads = DownloadManager::spawn(
        store.clone(),
        BackendRouter::new(FakeBackend::succeeding(), FakeBackend::succeeding(), FakeBackend::succeeding()),
    );
    let lifecycle = Arc::new(LifecycleManager::new(store.clone(), downloads.clone(), Arc::new(StubIndexer)));
    let ctx = HandlerContext { store, config: Arc::new(MemoryConfiguration::new(None)), lifecycle, downloads };

    match list(&ctx, "r1") {
        Response::ModelsListResponse { data, .. } => {
            assert_eq!(data.models, vec!["cpu:m".to_string()]);
            assert_eq!(data.cached.unwrap().get("cpu:m"), Some(&true));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
