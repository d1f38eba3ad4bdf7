// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch a `modelId` to its backend by prefix: one adapter per backend
//! family, held and reused; every call just re-derives the prefix, since a
//! given `modelId` always belongs to the same backend.

use std::sync::Arc;

use fmdm_core::ModelKind;

use crate::{BackendError, ModelBackend, OllamaBackend, OnnxBackend, PythonBackend};

/// Holds one backend per [`ModelKind`] and resolves a `modelId` to the
/// right one (spec.md §4.F step 2).
pub struct BackendRouter {
    onnx: Arc<dyn ModelBackend>,
    python: Arc<dyn ModelBackend>,
    ollama: Arc<dyn ModelBackend>,
}

impl BackendRouter {
    pub fn new(
        onnx: Arc<dyn ModelBackend>,
        python: Arc<dyn ModelBackend>,
        ollama: Arc<dyn ModelBackend>,
    ) -> Self {
        Self { onnx, python, ollama }
    }

    /// Resolve with the production backend implementations.
    pub fn production() -> Self {
        Self::new(Arc::new(OnnxBackend::new()), Arc::new(PythonBackend::new()), Arc::new(OllamaBackend::new()))
    }

    pub fn resolve(&self, model_id: &str) -> Result<Arc<dyn ModelBackend>, BackendError> {
        match ModelKind::from_model_id(model_id) {
            Some(ModelKind::Cpu) => Ok(Arc::clone(&self.onnx)),
            Some(ModelKind::Gpu) => Ok(Arc::clone(&self.python)),
            Some(ModelKind::Ollama) => Ok(Arc::clone(&self.ollama)),
            None => Err(BackendError::Unavailable(format!("unrecognized model id: {model_id}"))),
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

