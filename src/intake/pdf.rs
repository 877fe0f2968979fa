//! PDF text-layer source backed by `pdfium-render`.
//!
//! Each pdfium text segment becomes one [`TextFragment`] positioned at the
//! segment's left edge and bottom. Pdfium's coordinate system is bottom-up,
//! which is what line reconstruction expects.
//!
//! Scanned PDFs without a text layer yield empty pages; intake then fails the
//! header check rather than guessing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use pdfium_render::prelude::*;
use tracing::debug;

use super::source::DocumentSource;
use super::types::{PageFragments, TextFragment};

/// Reads fragments from a PDF file on disk.
pub struct PdfFragmentSource {
    path: PathBuf,
}

impl PdfFragmentSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn extract_pages(bytes: &[u8]) -> Result<Vec<PageFragments>> {
        let pdfium = Pdfium::default();
        let doc = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .context("Failed to parse PDF")?;

        let mut pages = Vec::new();
        for (page_idx, page) in doc.pages().iter().enumerate() {
            let text = page.text().context("Failed to extract text from page")?;
            let mut fragments = Vec::new();
            for segment in text.segments().iter() {
                let content = segment.text();
                if content.trim().is_empty() {
                    continue;
                }
                let bounds = segment.bounds();
                fragments.push(TextFragment {
                    text: content.trim().to_string(),
                    x: bounds.left().value,
                    y: bounds.bottom().value,
                });
            }
            debug!(page = page_idx, fragments = fragments.len(), "read pdf page");
            pages.push(fragments);
        }

        Ok(pages)
    }
}

#[async_trait]
impl DocumentSource for PdfFragmentSource {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn read_pages(&self) -> Result<Vec<PageFragments>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        // pdfium is a blocking FFI call.
        tokio::task::spawn_blocking(move || Self::extract_pages(&bytes))
            .await
            .context("pdf extraction task panicked")?
    }
}
