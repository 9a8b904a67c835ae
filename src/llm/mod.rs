//! Generation backend boundary.
//!
//! The trait the pipeline consumes, the Ollama adapter implementing it,
//! and a mock for tests.

mod backend;
mod ollama;

pub use backend::{BackendError, GenerationBackend, MockBackend};
pub use ollama::{OllamaClient, DEFAULT_OLLAMA_HOST, DEFAULT_TEMPERATURE};
