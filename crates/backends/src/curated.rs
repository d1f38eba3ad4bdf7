// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The curated-models dataset (spec.md §4.I "curated-models dataset",
//! §3 CuratedModelInfo). A small, fixed catalogue of embedding models known
//! to the daemon at startup; the set itself is out of scope for this crate's
//! download logic, which only needs the `id`/`type` pairing to seed the FMDM
//! store before any folder references them.

use chrono::Utc;
use fmdm_core::{CuratedModelInfo, ModelKind};

/// Default catalogue, one entry per supported backend family.
pub fn default_models() -> Vec<CuratedModelInfo> {
    let now = Utc::now();
    vec![
        CuratedModelInfo::new("cpu:xenova-e5-small", ModelKind::Cpu, now),
        CuratedModelInfo::new("gpu:e5-large-v2", ModelKind::Gpu, now),
        CuratedModelInfo::new("ollama:nomic-embed-text", ModelKind::Ollama, now),
    ]
}

#[cfg(test)]
#[path = "curated_tests.rs"]
mod tests;

