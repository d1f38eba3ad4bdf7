// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folder.validate` / `folder.add` / `folder.remove` handlers (spec.md
//! §4.E, §4.G).

use std::path::PathBuf;

use fmdm_config::FolderConfigEntry;
use fmdm_core::{FolderEntry, ValidationWarning};

use crate::handlers::HandlerContext;
use crate::lifecycle;
use crate::protocol::{Response, ValidationItem};

pub fn validate(ctx: &HandlerContext, id: &str, path: &str) -> Response {
    let existing = ctx.store.snapshot().folders.clone();
    let (errors, warnings) = lifecycle::validate(&PathBuf::from(path), &existing);

    Response::ValidationResponse {
        id: id.to_string(),
        valid: errors.is_empty(),
        errors: errors
            .into_iter()
            .map(|e| ValidationItem { kind: e.to_string(), message: format!("{e} ({path})"), affected_folders: None })
            .collect(),
        warnings: warnings
            .into_iter()
            .map(|w| {
                let ValidationWarning::Ancestor { affected_folders } = w;
                ValidationItem {
                    kind: "ancestor".to_string(),
                    message: "path is an ancestor of one or more existing folders".to_string(),
                    affected_folders: Some(affected_folders.iter().map(|p| p.display().to_string()).collect()),
                }
            })
            .collect(),
    }
}

pub fn add(ctx: &HandlerContext, id: &str, path: &str, model: &str) -> Response {
    let path_buf = PathBuf::from(path);
    let snapshot = ctx.store.snapshot();

    if !snapshot.curated_models.iter().any(|m| m.id == model) {
        return Response::action_failure(id, "unknown_model");
    }

    let (errors, _warnings) = lifecycle::validate(&path_buf, &snapshot.folders);
    if !errors.is_empty() {
        let reason = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        return Response::action_failure(id, reason);
    }

    let canonical = std::fs::canonicalize(&path_buf).unwrap_or(path_buf);

    let mut persisted = ctx.config.load_folders().unwrap_or_default();
    persisted.push(FolderConfigEntry { path: canonical.clone(), model: model.to_string() });
    if let Err(err) = ctx.config.save_folders(&persisted) {
        return Response::action_failure(id, err.to_string());
    }

    let entry = FolderEntry::new(canonical, model);
    let mut folders = ctx.store.snapshot().folders.clone();
    folders.push(entry.clone());
    ctx.store.update_folders(folders);
    ctx.lifecycle.start_folder(entry);

    Response::action_success(id)
}

pub fn remove(ctx: &HandlerContext, id: &str, path: &str) -> Response {
    let path_buf = PathBuf::from(path);
    let canonical = std::fs::canonicalize(&path_buf).unwrap_or(path_buf);

    ctx.lifecycle.stop_folder(&canonical);

    let mut persisted = ctx.config.load_folders().unwrap_or_default();
    persisted.retain(|f| f.path != canonical);
    if let Err(err) = ctx.config.save_folders(&persisted) {
        return Response::action_failure(id, err.to_string());
    }

    let mut folders = ctx.store.snapshot().folders.clone();
    folders.retain(|f| f.path != canonical);
    ctx.store.update_folders(folders);

    Response::action_success(id)
}

#[cfg(test)]
#[path = "folder_tests.rs"]
mod tests;

