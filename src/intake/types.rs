//! Shared types for document intake.
//!
//! Fragments come from a [`DocumentSource`](super::source::DocumentSource);
//! lines are produced by [`reconstruct_lines`](super::lines::reconstruct_lines)
//! and consumed by the validator and the record extractor.

use serde::{Deserialize, Serialize};

/// A positioned text run from a page's text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// Left edge in document space.
    pub x: f32,
    /// Baseline position (bottom-up: larger is higher on the page).
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// All fragments of one page, in source order.
pub type PageFragments = Vec<TextFragment>;

/// Fragments sharing a `y` bucket, sorted by ascending `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedLine {
    /// Bucketed `y` shared by every fragment on the line.
    pub bucket: i64,
    pub fragments: Vec<TextFragment>,
    /// Fragment texts joined with a single space.
    pub text: String,
}
