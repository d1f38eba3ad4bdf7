// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Model download backends.
//!
//! Actually installing a model (shelling out to an ONNX fetcher, a Python
//! `sentence-transformers` environment, or the Ollama CLI) is an external
//! collaborator per spec.md §1; this crate only owns the trait boundary,
//! the prefix-based dispatch, and the progress-simulator curve the download
//! manager drives while a backend call is in flight.

mod curated;
mod ollama;
mod onnx;
mod progress;
mod python;
mod router;

pub use curated::default_models;
pub use ollama::OllamaBackend;
pub use onnx::OnnxBackend;
pub use progress::{ProgressCurve, CADENCE_MS, CAP_PCT, START_PCT};
pub use python::PythonBackend;
pub use router::BackendRouter;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend process failed: {0}")]
    ProcessFailed(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// A provider capable of installing a curated model (spec.md GLOSSARY
/// "Backend").
#[async_trait]
pub trait ModelBackend: Send + Sync + 'static {
    /// Download and install `model_id`. Long-running; cancellation is by
    /// caller-side timeout only (spec.md §5).
    async fn download(&self, model_id: &str) -> Result<(), BackendError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Scripted backend for tests: returns queued outcomes in order, looping
    /// the last one once exhausted.
    pub struct FakeBackend {
        outcomes: Mutex<Vec<Result<(), BackendError>>>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        pub fn new(outcomes: Vec<Result<(), BackendError>>) -> Self {
            Self { outcomes: Mutex::new(outcomes), calls: AtomicUsize::new(0) }
        }

        pub fn succeeding() -> Arc<Self> {
            Arc::new(Self::new(vec![Ok(())]))
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self::new(vec![Err(BackendError::ProcessFailed(message.to_string()))]))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelBackend for FakeBackend {
        async fn download(&self, _model_id: &str) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().await;
            if outcomes.len() > 1 {
                outcomes.remove(0)
            } else {
                outcomes.first().cloned().unwrap_or(Ok(()))
            }
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

