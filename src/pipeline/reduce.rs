//! Combining partial summaries into the final text.
//!
//! Key-takeaway output is a verbatim bullet list. Other styles concatenate,
//! and batches above [`SYNTHESIS_THRESHOLD`] get exactly one synthesis call,
//! keeping total backend traffic bounded at one call per chunk plus one.

use std::sync::Arc;
use std::time::Duration;

use crate::llm::GenerationBackend;
use crate::{RecapError, Result};

use super::map::PartialSummary;
use super::prompts;
use super::style::SummaryStyle;

/// Partial counts above this get a final synthesis pass.
const SYNTHESIS_THRESHOLD: usize = 3;

const BULLET: &str = "\u{2022} ";

/// Reduce `partials` to the final summary text.
///
/// `partials` arrive in chunk order; every combination path preserves it.
pub(crate) async fn run(
    backend: Arc<dyn GenerationBackend>,
    model: &str,
    style: SummaryStyle,
    partials: &[PartialSummary],
    per_call_timeout: Duration,
) -> Result<String> {
    if !style.synthesizes() {
        tracing::debug!(partials = partials.len(), "rendering bullet list");
        return Ok(bullet_list(partials));
    }
    if partials.len() <= SYNTHESIS_THRESHOLD {
        tracing::debug!(partials = partials.len(), "concatenating partial summaries");
        return Ok(join_partials(partials));
    }

    tracing::debug!(partials = partials.len(), "synthesizing combined summary");
    let prompt = prompts::build_reduce_prompt(&join_partials(partials));

    let synthesized =
        match tokio::time::timeout(per_call_timeout, backend.generate(model, &prompt)).await {
            Ok(generated) => generated?,
            Err(_) => {
                return Err(RecapError::BackendUnavailable(format!(
                    "synthesis call timed out after {}s",
                    per_call_timeout.as_secs()
                )))
            }
        };

    Ok(synthesized.trim().to_string())
}

fn bullet_list(partials: &[PartialSummary]) -> String {
    partials
        .iter()
        .map(|partial| format!("{BULLET}{}", partial.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_partials(partials: &[PartialSummary]) -> String {
    partials
        .iter()
        .map(|partial| partial.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
