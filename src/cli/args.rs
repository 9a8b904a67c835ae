//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// recap - Summarize long transcripts with local LLMs
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a transcript file or stdin
    Summarize(SummarizeArgs),

    /// List models served by the Ollama endpoint
    Models,

    /// List available summary styles
    Styles,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Transcript file to read ("-" or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Model to summarize with (overrides ollama.model from the config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Summary style: detailed, concise, key-takeaways
    #[arg(short, long)]
    pub style: Option<String>,

    /// What the summary will be used for (requires the other context flags)
    #[arg(long)]
    pub purpose: Option<String>,

    /// Who the summary is written for
    #[arg(long)]
    pub audience: Option<String>,

    /// Formality level from 1 (casual) to 5 (formal)
    #[arg(long)]
    pub formality: Option<u8>,

    /// Detail level from 1 (terse) to 5 (thorough)
    #[arg(long)]
    pub detail: Option<u8>,

    /// Maximum chunk length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks, in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Maximum concurrent generate calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
