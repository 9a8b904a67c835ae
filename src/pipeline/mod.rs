//! Transcript summarization pipeline.
//!
//! Splits a transcript into chunks, summarizes them concurrently and
//! reduces the partial summaries into one final text.

mod chunker;
mod map;
mod orchestrator;
mod prompts;
mod reduce;
mod style;

pub use chunker::{split, Chunk};
pub use map::PartialSummary;
pub use orchestrator::{SummarizeOptions, Summarizer};
pub use style::{list_styles, SummaryContext, SummaryStyle};
