// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Folder-Model Data Model: the authoritative snapshot broadcast to
//! every connected client (spec.md §3 "FMDM snapshot").

use serde::{Deserialize, Serialize};

use crate::{ClientSession, CuratedModelInfo, FolderEntry};

/// Status of the last curated-model availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ModelCheckStatus {
    NotStarted,
    Checking,
    Done,
    Failed { message: String },
}

/// Immutable-per-publish snapshot owned by the FMDM store. Subscribers hold
/// their own `Arc<Fmdm>`; a new publish never mutates an outstanding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fmdm {
    pub daemon_version: String,
    pub folders: Vec<FolderEntry>,
    pub curated_models: Vec<CuratedModelInfo>,
    pub clients: Vec<ClientSession>,
    pub model_check_status: ModelCheckStatus,
}

impl Fmdm {
    pub fn empty(daemon_version: impl Into<String>) -> Self {
        Self {
            daemon_version: daemon_version.into(),
            folders: Vec::new(),
            curated_models: Vec::new(),
            clients: Vec::new(),
            model_check_status: ModelCheckStatus::NotStarted,
        }
    }
}
