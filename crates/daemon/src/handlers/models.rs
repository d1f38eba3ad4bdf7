// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `models.list` handler (spec.md §4.E, §6).

use std::collections::BTreeMap;

use crate::handlers::HandlerContext;
use crate::protocol::{ModelsListData, Response};

pub fn list(ctx: &HandlerContext, id: &str) -> Response {
    let snapshot = ctx.store.snapshot();
    let models = snapshot.curated_models.iter().map(|m| m.id.clone()).collect();
    let cached: BTreeMap<String, bool> = snapshot.curated_models.iter().map(|m| (m.id.clone(), m.installed)).collect();

    Response::ModelsListResponse {
        id: id.to_string(),
        data: ModelsListData { models, backend: "mixed".to_string(), cached: Some(cached) },
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

