//! Summary styles and tailoring context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RecapError, Result};

/// Named summary format.
///
/// Each style fixes the per-chunk instruction template and the policy the
/// reduce stage uses to combine partial summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    /// Narrative summary covering main points and supporting details.
    Detailed,
    /// Key points condensed into a few clear sentences.
    Concise,
    /// The most important takeaways as bullet points.
    KeyTakeaways,
}

impl SummaryStyle {
    /// All styles, in listing order.
    pub fn all() -> &'static [SummaryStyle] {
        &[Self::Detailed, Self::Concise, Self::KeyTakeaways]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Concise => "concise",
            Self::KeyTakeaways => "key-takeaways",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Detailed => "Narrative summary covering main points and supporting details",
            Self::Concise => "Key points condensed into a few clear sentences",
            Self::KeyTakeaways => "The most important takeaways as bullet points",
        }
    }

    /// Per-chunk instruction template with a single `{chunk}` placeholder.
    pub(crate) fn chunk_template(&self) -> &'static str {
        match self {
            Self::Detailed => {
                "Create a detailed summary of this video segment. Focus on the main points \
                 and supporting details. Begin your response with 'This segment covers' or \
                 'This portion discusses': {chunk}"
            }
            Self::Concise => {
                "Create a concise summary of the key points from this video segment. Focus \
                 only on the most important information. Format as 2-3 clear sentences: {chunk}"
            }
            Self::KeyTakeaways => {
                "Extract the 1-2 most important takeaways from this video segment. Format \
                 as brief, clear bullet points: {chunk}"
            }
        }
    }

    /// Whether the reduce stage may issue a synthesis call for this style.
    ///
    /// Bullet lists are concatenated verbatim and never re-narrated.
    pub(crate) fn synthesizes(&self) -> bool {
        !matches!(self, Self::KeyTakeaways)
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SummaryStyle {
    type Err = RecapError;

    /// Parse a user-supplied style name. Unknown names are an error, never
    /// silently mapped to a default style.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "concise" => Ok(Self::Concise),
            "key-takeaways" => Ok(Self::KeyTakeaways),
            other => Err(RecapError::InvalidInput(format!(
                "unknown summary style '{other}'"
            ))),
        }
    }
}

/// Name and description pairs for every style, in listing order.
pub fn list_styles() -> Vec<(&'static str, &'static str)> {
    SummaryStyle::all()
        .iter()
        .map(|style| (style.name(), style.description()))
        .collect()
}

/// Optional tailoring layered onto a style's prompt.
///
/// Formality and detail level are 1-5 scales. Out-of-range values are
/// rejected at construction rather than clamped; clamping, if wanted,
/// belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryContext {
    purpose: String,
    audience: String,
    formality: u8,
    detail_level: u8,
}

impl SummaryContext {
    pub fn new(
        purpose: impl Into<String>,
        audience: impl Into<String>,
        formality: u8,
        detail_level: u8,
    ) -> Result<Self> {
        check_scale("formality", formality)?;
        check_scale("detail level", detail_level)?;
        Ok(Self {
            purpose: purpose.into(),
            audience: audience.into(),
            formality,
            detail_level,
        })
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn formality(&self) -> u8 {
        self.formality
    }

    pub fn detail_level(&self) -> u8 {
        self.detail_level
    }
}

fn check_scale(field: &str, value: u8) -> Result<()> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(RecapError::InvalidInput(format!(
            "{field} must be between 1 and 5, got {value}"
        )))
    }
}
