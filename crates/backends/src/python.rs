// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gpu:*` models: installed via a Python `sentence-transformers` bridge.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{BackendError, ModelBackend};

/// Invokes an external Python download script (typically a venv wrapping
/// `sentence-transformers`) to materialize a `gpu:*` model.
pub struct PythonBackend {
    interpreter: String,
    script: String,
}

impl PythonBackend {
    pub fn new() -> Self {
        Self { interpreter: "python3".to_string(), script: "scripts/download_model.py".to_string() }
    }

    pub fn with_script(interpreter: impl Into<String>, script: impl Into<String>) -> Self {
        Self { interpreter: interpreter.into(), script: script.into() }
    }
}

impl Default for PythonBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for PythonBackend {
    async fn download(&self, model_id: &str) -> Result<(), BackendError> {
        debug!(model_id, script = %self.script, "dispatching python fetch");
        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(model_id)
            .output()
            .await
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.interpreter)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(model_id, %stderr, "python fetch failed");
            Err(BackendError::ProcessFailed(stderr))
        }
    }
}
