//! recap - A lightweight CLI tool for summarizing long video transcripts with local LLMs
//!
//! The core is a map/reduce pipeline: a transcript is split into bounded
//! chunks, each chunk is summarized through a generation backend, and the
//! partial summaries are combined into one final summary.

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;

use thiserror::Error;

use crate::llm::BackendError;

/// Main error type for recap
#[derive(Error, Debug)]
pub enum RecapError {
    /// Caller-supplied input failed validation; detected before any
    /// backend call, never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generation backend could not be reached, or a call timed out.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The generation backend responded but rejected a request.
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A chunk failed mid-pipeline; results computed for other chunks are
    /// discarded, never partially returned.
    #[error("Pipeline aborted at chunk {chunk_index}: {source}")]
    PipelineAborted {
        chunk_index: usize,
        source: BackendError,
    },
}

impl From<BackendError> for RecapError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(message) => RecapError::BackendUnavailable(message),
            BackendError::Rejected(message) => RecapError::BackendError(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecapError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "recap";
