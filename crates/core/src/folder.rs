// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folder entity: the unit of work tracked by the lifecycle manager.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lifecycle status of an indexed folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderStatus {
    Pending,
    DownloadingModel,
    Indexing,
    Active,
    Error,
}

crate::simple_display! {
    FolderStatus {
        Pending => "pending",
        DownloadingModel => "downloading-model",
        Indexing => "indexing",
        Active => "active",
        Error => "error",
    }
}

/// A folder the daemon has been asked to index against a particular model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub model: String,
    pub status: FolderStatus,
    /// Meaningful only in `DownloadingModel`/`Indexing`.
    pub progress: Option<u8>,
    pub last_error: Option<String>,
}

impl FolderEntry {
    pub fn new(path: PathBuf, model: impl Into<String>) -> Self {
        Self { path, model: model.into(), status: FolderStatus::Pending, progress: None, last_error: None }
    }

    /// True if `other` is a proper ancestor of `self` (`self` is nested under `other`).
    pub fn is_descendant_of(&self, other: &Path) -> bool {
        self.path != other && self.path.starts_with(other)
    }

    /// True if `other` is a proper descendant of `self`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other != self.path && other.starts_with(&self.path)
    }
}

/// Validation error kinds for `folder.validate`/`folder.add` (spec.md §4.G).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    NotExists,
    NotDirectory,
    Duplicate,
    Subfolder,
    PermissionDenied,
}

crate::simple_display! {
    ValidationError {
        NotExists => "not_exists",
        NotDirectory => "not_directory",
        Duplicate => "duplicate",
        Subfolder => "subfolder",
        PermissionDenied => "permission_denied",
    }
}

/// Validation warning kinds. Currently only `ancestor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarning {
    /// `path` is a proper ancestor of one or more existing folders.
    Ancestor { affected_folders: Vec<PathBuf> },
}

#[cfg(test)]
#[path = "folder_tests.rs"]
mod tests;

