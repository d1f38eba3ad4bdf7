// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn model_kind_parses_known_prefixes() {
    assert_eq!(ModelKind::from_model_id("cpu:xenova-e5-small"), Some(ModelKind::Cpu));
    assert_eq!(ModelKind::from_model_id("gpu:bge-m3"), Some(ModelKind::Gpu));
    assert_eq!(ModelKind::from_model_id("ollama:nomic-embed-text"), Some(ModelKind::Ollama));
    assert_eq!(ModelKind::from_model_id("unknown"), None);
}

#[test]
fn priority_ordering_is_high_normal_low() {
    assert!(DownloadPriority::High > DownloadPriority::Normal);
    assert!(DownloadPriority::Normal > DownloadPriority::Low);
}

#[test]
fn merge_unions_folders_and_upgrades_priority_only() {
    let mut req = DownloadRequest::new("cpu:m", DownloadPriority::Low, PathBuf::from("/a"));
    req.merge(DownloadPriority::Normal, [PathBuf::from("/b")]);
    assert_eq!(req.priority, DownloadPriority::Normal);
    assert_eq!(req.requesting_folders.len(), 2);

    // A lower incoming priority never downgrades the request.
    req.merge(DownloadPriority::Low, [PathBuf::from("/c")]);
    assert_eq!(req.priority, DownloadPriority::Normal);
    assert_eq!(req.requesting_folders.len(), 3);
}

#[test]
fn invariants_reject_contradictory_states() {
    let mut model = CuratedModelInfo::new("cpu:m", ModelKind::Cpu, Utc::now());
    assert!(model.satisfies_invariants());

    model.downloading = true;
    model.download_progress = 50;
    assert!(model.satisfies_invariants());

    model.installed = true; // downloading + installed is invalid
    assert!(!model.satisfies_invariants());
}
