//! Report-type gate run before any record is extracted.

use crate::error::{ReconError, Result};

/// Characters of the document header inspected for a marker phrase.
pub const DEFAULT_HEADER_WINDOW: usize = 70;

/// Which report a workflow expects, recognized by header marker phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProfile {
    /// Number of leading characters searched.
    pub header_window: usize,
    /// Uppercase marker phrases; any one of them must appear in the window.
    pub markers: Vec<String>,
}

impl Default for DocumentProfile {
    fn default() -> Self {
        Self {
            header_window: DEFAULT_HEADER_WINDOW,
            markers: vec!["EXISTENCIAS".to_string(), "LISTA DE PRODUCTOS".to_string()],
        }
    }
}

impl DocumentProfile {
    /// Check the first `header_window` characters of `text` for a marker.
    ///
    /// `text` is the full document text with whitespace already collapsed
    /// (see [`document_text`](super::lines::document_text)).
    pub fn validate(&self, text: &str) -> Result<()> {
        let header: String = text
            .chars()
            .take(self.header_window)
            .collect::<String>()
            .to_uppercase();

        if self
            .markers
            .iter()
            .any(|marker| header.contains(&marker.to_uppercase()))
        {
            return Ok(());
        }

        Err(ReconError::InvalidDocumentType {
            message: format!(
                "The uploaded file is not the expected report. Its header must contain one of: {}",
                self.markers.join(", ")
            ),
        })
    }
}
