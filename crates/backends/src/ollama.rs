// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ollama:*` models: installed via the local `ollama` CLI (`ollama pull`).

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{BackendError, ModelBackend};

pub struct OllamaBackend {
    cli: String,
}

impl OllamaBackend {
    pub fn new() -> Self {
        Self { cli: "ollama".to_string() }
    }

    pub fn with_cli(cli: impl Into<String>) -> Self {
        Self { cli: cli.into() }
    }

    /// Strip the `ollama:` prefix the daemon uses internally; the CLI wants
    /// the bare model tag.
    fn tag<'a>(&self, model_id: &'a str) -> &'a str {
        model_id.strip_prefix("ollama:").unwrap_or(model_id)
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    async fn download(&self, model_id: &str) -> Result<(), BackendError> {
        let tag = self.tag(model_id);
        debug!(model_id, tag, "dispatching ollama pull");
        let output = Command::new(&self.cli)
            .arg("pull")
            .arg(tag)
            .output()
            .await
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.cli)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(model_id, %stderr, "ollama pull failed");
            Err(BackendError::ProcessFailed(stderr))
        }
    }
}

#[cfg(test)]
#[path = "ollama_tests.rs"]
mod tests;

