//! Generation backend abstraction.
//!
//! The pipeline depends only on the [`GenerationBackend`] trait; any
//! capability satisfying it can be substituted (a real Ollama endpoint, a
//! mock, a record/replay fixture).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a generation backend.
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    /// The endpoint could not be reached, or the call timed out.
    #[error("backend unreachable: {0}")]
    Unavailable(String),

    /// The endpoint responded but refused the request (e.g. unknown model).
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// A text-generation capability.
///
/// Implementations must be safe to share across concurrent calls: the map
/// stage issues one `generate` per chunk against a single instance.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for `prompt` using `model`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError>;

    /// List the model names the backend serves, in the backend's order.
    async fn list_models(&self) -> Result<Vec<String>, BackendError>;
}

/// Mock backend for tests.
///
/// Without a configured response it echoes the prompt back, which lets
/// tests correlate outputs with the chunks that produced them. Every
/// received prompt is recorded, so tests can assert call counts.
#[derive(Debug, Default)]
pub struct MockBackend {
    response: Option<String>,
    models: Vec<String>,
    fail_all: bool,
    fail_marker: Option<String>,
    latency: Duration,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create a mock that echoes prompts and serves no models.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `response` for every generate call instead of echoing.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Serve the given model names from `list_models`.
    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Reject every generate call.
    pub fn with_failure(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Reject generate calls whose prompt contains `marker`.
    pub fn with_failure_when(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Sleep for `latency` before answering each generate call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of generate calls received so far.
    pub fn generate_calls(&self) -> usize {
        self.log().len()
    }

    /// Prompts received so far, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.log().clone()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.log().push(prompt.to_string());

        if self.fail_all {
            return Err(BackendError::Rejected(format!(
                "mock rejected model '{model}'"
            )));
        }
        if let Some(marker) = &self.fail_marker {
            if prompt.contains(marker) {
                return Err(BackendError::Rejected(format!(
                    "mock rejected prompt containing '{marker}'"
                )));
            }
        }

        Ok(match &self.response {
            Some(response) => response.clone(),
            None => prompt.to_string(),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.models.clone())
    }
}
