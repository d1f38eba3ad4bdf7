// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server → client response/push family (spec.md §4.E, §6).

use std::collections::BTreeMap;

use fmdm_core::Fmdm;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(rename = "affectedFolders", skip_serializing_if = "Option::is_none")]
    pub affected_folders: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsListData {
    pub models: Vec<String>,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDownloadData {
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    #[serde(rename = "connection.ack")]
    ConnectionAck { #[serde(rename = "clientId")] client_id: String },
    #[serde(rename = "fmdm.update")]
    FmdmUpdate { fmdm: Arc<Fmdm> },
    #[serde(rename = "validation-response")]
    ValidationResponse { id: String, valid: bool, errors: Vec<ValidationItem>, warnings: Vec<ValidationItem> },
    #[serde(rename = "action-response")]
    ActionResponse { id: String, success: bool, #[serde(skip_serializing_if = "Option::is_none")] error: Option<String> },
    #[serde(rename = "pong")]
    Pong { id: String },
    #[serde(rename = "models.list.response")]
    ModelsListResponse { id: String, data: ModelsListData },
    #[serde(rename = "error")]
    Error { message: String, #[serde(skip_serializing_if = "Option::is_none")] code: Option<String> },
    #[serde(rename = "model_download_start")]
    ModelDownloadStart { data: ModelDownloadData },
    #[serde(rename = "model_download_progress")]
    ModelDownloadProgress { data: ModelDownloadData },
    #[serde(rename = "model_download_complete")]
    ModelDownloadComplete { data: ModelDownloadData },
    #[serde(rename = "model_download_error")]
    ModelDownloadError { data: ModelDownloadData },
    #[serde(rename = "activity.event")]
    ActivityEvent { payload: serde_json::Value },
}

impl Response {
    pub fn error(message: impl Into<String>, code: Option<&str>) -> Self {
        Response::Error { message: message.into(), code: code.map(str::to_string) }
    }

    pub fn action_success(id: impl Into<String>) -> Self {
        Response::ActionResponse { id: id.into(), success: true, error: None }
    }

    pub fn action_failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Response::ActionResponse { id: id.into(), success: false, error: Some(error.into()) }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

