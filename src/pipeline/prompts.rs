//! Prompt construction.
//!
//! Pure string assembly; the only dynamic parts are the chunk text and the
//! optional tailoring context.

use super::style::{SummaryContext, SummaryStyle};

const CHUNK_PLACEHOLDER: &str = "{chunk}";

/// Render the per-chunk instruction for `style`, substituting `chunk_text`
/// into the style template.
pub(crate) fn build_chunk_prompt(
    style: SummaryStyle,
    context: Option<&SummaryContext>,
    chunk_text: &str,
) -> String {
    let mut prompt = style
        .chunk_template()
        .replace(CHUNK_PLACEHOLDER, chunk_text);
    if let Some(context) = context {
        prompt.push_str("\n\n");
        prompt.push_str(&context_clause(context));
    }
    prompt
}

/// Render the synthesis instruction for the reduce stage.
pub(crate) fn build_reduce_prompt(combined: &str) -> String {
    format!("Synthesize these summary points into a coherent summary: {combined}")
}

fn context_clause(context: &SummaryContext) -> String {
    format!(
        "Write for this audience: {}. Purpose: {}. Formality: {}/5. Detail level: {}/5.",
        context.audience(),
        context.purpose(),
        context.formality(),
        context.detail_level()
    )
}
