//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::llm::{DEFAULT_OLLAMA_HOST, DEFAULT_TEMPERATURE};
use crate::pipeline::{SummarizeOptions, SummaryStyle};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Ollama endpoint settings
    #[serde(default)]
    pub ollama: OllamaSettings,

    /// Summarization settings
    #[serde(default)]
    pub summary: SummarySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server
    #[serde(default = "default_host")]
    pub host: String,

    /// Model to summarize with (empty = must be given on the command line)
    #[serde(default)]
    pub model: String,

    /// Sampling temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Default summary style (detailed, concise, key-takeaways)
    #[serde(default = "default_style")]
    pub style: SummaryStyle,

    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap carried between consecutive chunks, in characters
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Maximum concurrent generate calls
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_host() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_style() -> SummaryStyle {
    SummaryStyle::Detailed
}

fn default_chunk_size() -> usize {
    2048
}

fn default_overlap() -> usize {
    200
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: String::new(),
            temperature: default_temperature(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            style: default_style(),
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama: OllamaSettings::default(),
            summary: SummarySettings::default(),
        }
    }
}

impl SummarySettings {
    /// Pipeline options carrying these settings.
    pub fn options(&self) -> SummarizeOptions {
        SummarizeOptions {
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            concurrency: self.concurrency,
            per_call_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    ///
    /// `RECAP_OLLAMA_HOST` takes precedence over the configured host.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("RECAP_OLLAMA_HOST") {
            if !host.trim().is_empty() {
                self.ollama.host = host;
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "recap", "recap")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let settings = Settings::default();
        assert_eq!(settings.ollama.host, "http://localhost:11434");
        assert!(settings.ollama.model.is_empty());
        assert_eq!(settings.summary.style, SummaryStyle::Detailed);
    }

    #[test]
    fn summary_defaults_match_pipeline_defaults() {
        let options = Settings::default().summary.options();
        let defaults = SummarizeOptions::default();
        assert_eq!(options.chunk_size, defaults.chunk_size);
        assert_eq!(options.overlap, defaults.overlap);
        assert_eq!(options.concurrency, defaults.concurrency);
        assert_eq!(options.per_call_timeout, defaults.per_call_timeout);
    }

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [ollama]
            model = "llama3.2"

            [summary]
            style = "concise"
            "#,
        )
        .unwrap();

        assert_eq!(settings.ollama.model, "llama3.2");
        assert_eq!(settings.ollama.host, "http://localhost:11434");
        assert_eq!(settings.summary.style, SummaryStyle::Concise);
        assert_eq!(settings.summary.chunk_size, 2048);
        assert_eq!(settings.summary.timeout_secs, 120);
    }

    #[test]
    fn unknown_style_in_config_fails_to_parse() {
        let result = toml::from_str::<Settings>(
            r#"
            [summary]
            style = "casual"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Settings::write_default(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.contains("[ollama]"));
        assert!(content.contains("[summary]"));
        let parsed: Settings = toml::from_str(&content).unwrap();
        assert_eq!(parsed.summary.overlap, 200);
    }
}
