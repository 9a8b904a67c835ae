//! Ollama HTTP adapter.
//!
//! Talks to an Ollama server's `/api/generate` and `/api/tags` endpoints.
//! Generation is non-streaming: one request, one complete response body.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::backend::{BackendError, GenerationBackend};

/// Default Ollama server URL.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Default sampling temperature for generation calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OllamaClient {
    http: Client,
    host: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(host: &str, temperature: f32) -> Result<Self> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            anyhow::bail!("Ollama host is empty. Set ollama.host in config or RECAP_OLLAMA_HOST.");
        }

        Ok(Self {
            // Connect-bounded only; the per-call timeout belongs to the pipeline.
            http: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .context("Failed to build Ollama HTTP client")?,
            host: host.to_string(),
            temperature,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.ollama.host, settings.ollama.temperature)
    }

    /// The server URL this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.host);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected(format!(
                "Ollama returned {status} for model '{model}': {detail}"
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Rejected(format!("Failed to parse generate response: {e}")))?;

        Ok(payload.response)
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/tags", self.host);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(BackendError::Rejected(format!(
                "Ollama returned {} when listing models",
                response.status()
            )));
        }

        let payload: TagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Rejected(format!("Failed to parse model list: {e}")))?;

        Ok(payload.models.into_iter().map(|m| m.name).collect())
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_connect() || err.is_timeout() {
        BackendError::Unavailable(err.to_string())
    } else {
        BackendError::Rejected(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_host() {
        let client = OllamaClient::new("http://localhost:11434/", DEFAULT_TEMPERATURE).unwrap();
        assert_eq!(client.host(), "http://localhost:11434");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = match OllamaClient::new("  ", DEFAULT_TEMPERATURE) {
            Ok(_) => panic!("expected client creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Ollama host is empty"));
    }

    #[test]
    fn generate_request_is_non_streaming() {
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "summarize this",
            stream: false,
            options: GenerateOptions { temperature: 0.5 },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"stream\":false"));
        assert!(json.contains("llama3.2"));
        assert!(json.contains("summarize this"));
        assert!(json.contains("temperature"));
    }

    #[test]
    fn tags_response_parses_model_names() {
        let json = r#"{"models":[{"name":"llama3.2","size":2019393189},{"name":"mistral"}]}"#;
        let payload: TagsResponse = serde_json::from_str(json).unwrap();
        let names: Vec<String> = payload.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama3.2".to_string(), "mistral".to_string()]);
    }

    #[test]
    fn generate_response_parses_text() {
        let json = r#"{"model":"llama3.2","response":"This segment covers testing.","done":true}"#;
        let payload: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.response, "This segment covers testing.");
    }
}
