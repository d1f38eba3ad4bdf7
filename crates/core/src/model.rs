// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Curated-model entities and the internal download-request record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Backend family a curated model belongs to, derived from its id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Gpu,
    Cpu,
    Ollama,
}

impl ModelKind {
    /// Resolve the backend family from a `modelId` such as `cpu:xenova-e5-small`.
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        if let Some((prefix, _)) = model_id.split_once(':') {
            match prefix {
                "gpu" => Some(Self::Gpu),
                "cpu" => Some(Self::Cpu),
                "ollama" => Some(Self::Ollama),
                _ => None,
            }
        } else {
            None
        }
    }
}

/// A curated embedding model known to the daemon at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedModelInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub installed: bool,
    pub downloading: bool,
    pub download_progress: u8,
    pub download_error: Option<String>,
    pub last_checked: DateTime<Utc>,
}

impl CuratedModelInfo {
    pub fn new(id: impl Into<String>, kind: ModelKind, checked_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            kind,
            installed: false,
            downloading: false,
            download_progress: 0,
            download_error: None,
            last_checked: checked_at,
        }
    }

    /// Spec.md §3 invariant: `downloading` implies not installed and progress in `[0, 100)`.
    /// `installed` implies not downloading and progress `== 100`.
    pub fn satisfies_invariants(&self) -> bool {
        if self.downloading && (self.installed || self.download_progress >= 100) {
            return false;
        }
        if self.installed && (self.downloading || self.download_progress != 100) {
            return false;
        }
        true
    }
}

/// Priority bucket for a queued download. Ordered `High > Normal > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadPriority {
    Low,
    Normal,
    High,
}

crate::simple_display! {
    DownloadPriority {
        High => "high",
        Normal => "normal",
        Low => "low",
    }
}

/// Internal queue/active record for the download manager (spec.md §3, §4.F).
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub model_id: String,
    pub priority: DownloadPriority,
    pub requesting_folders: BTreeSet<PathBuf>,
}

impl DownloadRequest {
    pub fn new(model_id: impl Into<String>, priority: DownloadPriority, folder: PathBuf) -> Self {
        let mut requesting_folders = BTreeSet::new();
        requesting_folders.insert(folder);
        Self { model_id: model_id.into(), priority, requesting_folders }
    }

    /// Merge another request for the same model: union the folder sets and
    /// keep the higher of the two priorities (spec.md §4.F, §8 idempotence law).
    pub fn merge(&mut self, priority: DownloadPriority, folders: impl IntoIterator<Item = PathBuf>) {
        self.requesting_folders.extend(folders);
        if priority > self.priority {
            self.priority = priority;
        }
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

