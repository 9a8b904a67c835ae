//! End-to-end summarization.
//!
//! Wires the splitter, the concurrent map stage and the reduce stage
//! together against an injected generation backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::llm::GenerationBackend;
use crate::{RecapError, Result};

use super::chunker;
use super::style::{SummaryContext, SummaryStyle};
use super::{map, reduce};

/// Tunable limits for a summarization run.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters of trailing context carried between consecutive chunks.
    pub overlap: usize,
    /// Maximum generate calls in flight at once.
    pub concurrency: usize,
    /// Upper bound on any single backend call.
    pub per_call_timeout: Duration,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            chunk_size: 2048,
            overlap: 200,
            concurrency: 4,
            per_call_timeout: Duration::from_secs(120),
        }
    }
}

/// Transcript summarizer over an injected [`GenerationBackend`].
pub struct Summarizer {
    backend: Arc<dyn GenerationBackend>,
    options: SummarizeOptions,
}

impl Summarizer {
    /// Create a summarizer with default options.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_options(backend, SummarizeOptions::default())
    }

    pub fn with_options(backend: Arc<dyn GenerationBackend>, options: SummarizeOptions) -> Self {
        Self { backend, options }
    }

    /// Summarize `transcript` with `model`, in the given style.
    ///
    /// Input validation happens before the first backend call. A run over
    /// `n` chunks issues at most `n + 1` generate calls.
    pub async fn summarize(
        &self,
        transcript: &str,
        model: &str,
        style: SummaryStyle,
        context: Option<&SummaryContext>,
    ) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(RecapError::InvalidInput("transcript is empty".to_string()));
        }
        if self.options.concurrency == 0 {
            return Err(RecapError::InvalidInput(
                "concurrency limit must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();
        let chunks = chunker::split(transcript, self.options.chunk_size, self.options.overlap)?;
        if chunks.is_empty() {
            return Err(RecapError::InvalidInput("transcript is empty".to_string()));
        }
        tracing::info!(
            chunks = chunks.len(),
            style = %style,
            model,
            "summarizing transcript"
        );

        let partials = map::run(
            self.backend.clone(),
            model,
            style,
            context,
            &chunks,
            self.options.concurrency,
            self.options.per_call_timeout,
        )
        .await?;

        let summary = reduce::run(
            self.backend.clone(),
            model,
            style,
            &partials,
            self.options.per_call_timeout,
        )
        .await?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "summary complete"
        );
        Ok(summary)
    }

    /// Model names served by the backend, in the backend's order.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.backend.list_models().await?)
    }
}
