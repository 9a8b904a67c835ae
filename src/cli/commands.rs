//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::args::{ConfigCommand, SummarizeArgs};
use crate::config::Settings;
use crate::llm::OllamaClient;
use crate::pipeline::{list_styles, SummaryContext, SummaryStyle, Summarizer};

/// Summarize a transcript from a file or stdin.
pub async fn summarize(settings: &Settings, args: SummarizeArgs) -> Result<()> {
    let transcript = read_transcript(args.file.as_deref())?;

    let model = match &args.model {
        Some(model) => model.clone(),
        None if !settings.ollama.model.trim().is_empty() => settings.ollama.model.clone(),
        None => {
            anyhow::bail!(
                "No model configured. Pass --model or set ollama.model in the config file."
            );
        }
    };

    let style = match &args.style {
        Some(name) => name.parse::<SummaryStyle>()?,
        None => settings.summary.style,
    };

    let context = build_context(&args)?;

    let mut options = settings.summary.options();
    if let Some(chunk_size) = args.chunk_size {
        options.chunk_size = chunk_size;
    }
    if let Some(overlap) = args.overlap {
        options.overlap = overlap;
    }
    if let Some(concurrency) = args.concurrency {
        options.concurrency = concurrency;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        options.per_call_timeout = Duration::from_secs(timeout_secs);
    }

    let client = OllamaClient::from_settings(settings)?;
    let summarizer = Summarizer::with_options(Arc::new(client), options);

    let summary = summarizer
        .summarize(&transcript, &model, style, context.as_ref())
        .await?;

    println!("{}", summary);

    Ok(())
}

/// List models served by the configured Ollama endpoint.
pub async fn list_models(settings: &Settings) -> Result<()> {
    let client = OllamaClient::from_settings(settings)?;
    let host = client.host().to_string();
    let summarizer = Summarizer::new(Arc::new(client));

    let models = summarizer.list_models().await?;

    if models.is_empty() {
        println!("No models installed on {}", host);
        println!("Pull one with: ollama pull llama3.2");
        return Ok(());
    }

    for model in models {
        println!("{}", model);
    }

    Ok(())
}

/// Print available summary styles with their descriptions.
pub fn show_styles() {
    for (name, description) in list_styles() {
        println!("{:<14} {}", name, description);
    }
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn read_transcript(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript from stdin")?;
            Ok(buffer)
        }
    }
}

/// All four context flags travel together; a partial set is an error.
fn build_context(args: &SummarizeArgs) -> Result<Option<SummaryContext>> {
    match (&args.purpose, &args.audience, args.formality, args.detail) {
        (None, None, None, None) => Ok(None),
        (Some(purpose), Some(audience), Some(formality), Some(detail)) => Ok(Some(
            SummaryContext::new(purpose.as_str(), audience.as_str(), formality, detail)?,
        )),
        _ => anyhow::bail!(
            "--purpose, --audience, --formality and --detail must be given together"
        ),
    }
}
