// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client Protocol State Machine dispatch (spec.md §4.E): routes a decoded
//! [`Request`] to its handler. Per-family logic lives in the sibling
//! modules; this file only wires them together.

pub mod connection;
pub mod folder;
pub mod models;
pub mod ping;

use std::sync::Arc;

use fmdm_config::Configuration;
use fmdm_core::ClientType;

use crate::downloads::DownloadManager;
use crate::lifecycle::LifecycleManager;
use crate::protocol::{Request, Response};
use crate::store::Store;

/// Shared collaborators every handler needs.
pub struct HandlerContext {
    pub store: Store,
    pub config: Arc<dyn Configuration>,
    pub lifecycle: Arc<LifecycleManager>,
    pub downloads: DownloadManager,
}

/// Result of dispatching one request. `connection.init` is singled out
/// because only the server (which owns the session map) can flip a
/// session's `initialized` flag and schedule the bypass push.
pub enum Dispatched {
    ConnectionInit { client_type: ClientType },
    Responses(Vec<Response>),
}

pub fn dispatch(ctx: &HandlerContext, request: Request) -> Dispatched {
    match request {
        Request::ConnectionInit { client_type } => match connection::parse(&client_type) {
            Ok(kind) => Dispatched::ConnectionInit { client_type: kind },
            Err(response) => Dispatched::Responses(vec![response]),
        },
        Request::Ping { id } => Dispatched::Responses(vec![ping::pong(&id)]),
        Request::FolderValidate { id, payload } => Dispatched::Responses(vec![folder::validate(ctx, &id, &payload.path)]),
        Request::FolderAdd { id, payload } => {
            Dispatched::Responses(vec![folder::add(ctx, &id, &payload.path, &payload.model)])
        }
        Request::FolderRemove { id, payload } => Dispatched::Responses(vec![folder::remove(ctx, &id, &payload.path)]),
        Request::ModelsList { id } => Dispatched::Responses(vec![models::list(ctx, &id)]),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

