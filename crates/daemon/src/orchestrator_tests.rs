// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fmdm_config::MemoryConfiguration;
use fmdm_core::ModelKind;

fn test_config(registry_path: PathBuf) -> OrchestratorConfig {
    OrchestratorConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        daemon_version: "0.1.0-test".to_string(),
        registry_path,
        max_updates_per_second: 50,
        debounce: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn bootstrap_projects_persisted_folders_into_fmdm_as_pending() {
    let dir = tempfile::tempdir().unwrap();
    let configuration: Arc<dyn Configuration> = Arc::new(MemoryConfiguration::with_folders(
        vec![FolderConfigEntry { path: PathBuf::from("/a"), model: "cpu:m".to_string() }],
        None,
    ));
    let models = vec![CuratedModelInfo::new("cpu:m", ModelKind::Cpu, Utc::now())];

    let orchestrator = Orchestrator::bootstrap(test_config(dir.path().join("daemon.json")), configuration, models).unwrap();
    let snapshot = orchestrator.store.snapshot();
    assert_eq!(snapshot.folders.len(), 1);
    assert_eq!(snapshot.folders[0].status, fmdm_core::FolderStatus::Pending);
}
