// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cpu:*` models: installed via a local ONNX runtime fetcher.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{BackendError, ModelBackend};

/// Invokes an external ONNX model-fetcher binary to materialize a `cpu:*`
/// model into the local cache. The fetcher itself is an external
/// collaborator (spec.md §1); this adapter only owns process plumbing.
pub struct OnnxBackend {
    fetcher_command: String,
}

impl OnnxBackend {
    pub fn new() -> Self {
        Self { fetcher_command: "onnx-model-fetch".to_string() }
    }

    pub fn with_command(command: impl Into<String>) -> Self {
        Self { fetcher_command: command.into() }
    }
}

impl Default for OnnxBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for OnnxBackend {
    async fn download(&self, model_id: &str) -> Result<(), BackendError> {
        debug!(model_id, command = %self.fetcher_command, "dispatching onnx fetch");
        let output = Command::new(&self.fetcher_command)
            .arg("--model")
            .arg(model_id)
            .output()
            .await
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.fetcher_command)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(model_id, %stderr, "onnx fetch failed");
            Err(BackendError::ProcessFailed(stderr))
        }
    }
}
