// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client → server request family (spec.md §4.E, §6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderValidatePayload {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderAddPayload {
    pub path: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRemovePayload {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "connection.init")]
    ConnectionInit { #[serde(rename = "clientType")] client_type: String },
    #[serde(rename = "folder.validate")]
    FolderValidate { id: String, payload: FolderValidatePayload },
    #[serde(rename = "folder.add")]
    FolderAdd { id: String, payload: FolderAddPayload },
    #[serde(rename = "folder.remove")]
    FolderRemove { id: String, payload: FolderRemovePayload },
    #[serde(rename = "ping")]
    Ping { id: String },
    #[serde(rename = "models.list")]
    ModelsList { id: String },
}

impl Request {
    /// Every request except `connection.init` requires a non-empty
    /// correlation id (spec.md §4.E).
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Request::ConnectionInit { .. } => None,
            Request::FolderValidate { id, .. }
            | Request::FolderAdd { id, .. }
            | Request::FolderRemove { id, .. }
            | Request::Ping { id }
            | Request::ModelsList { id } => Some(id.as_str()),
        }
    }

    pub fn requires_correlation_id(&self) -> bool {
        !matches!(self, Request::ConnectionInit { .. })
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

