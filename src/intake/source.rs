//! Document sources: anything that can hand over positioned text per page.
//!
//! The core never parses binary document formats itself. A source turns a
//! document into [`PageFragments`]; reading is the only await point of intake.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::types::PageFragments;

/// Supplies the positioned text layer of a document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Read every page's fragments, in page order.
    async fn read_pages(&self) -> Result<Vec<PageFragments>>;
}

/// Reads a pre-extracted text layer stored as JSON.
///
/// The file holds an array of pages, each an array of
/// `{"text": "...", "x": 0.0, "y": 0.0}` objects.
pub struct JsonFragmentSource {
    path: PathBuf,
}

impl JsonFragmentSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DocumentSource for JsonFragmentSource {
    fn name(&self) -> &str {
        "json"
    }

    async fn read_pages(&self) -> Result<Vec<PageFragments>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid fragment JSON in {}", self.path.display()))
    }
}

/// Pages already held in memory.
pub struct StaticSource {
    pages: Vec<PageFragments>,
}

impl StaticSource {
    pub fn new(pages: Vec<PageFragments>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn read_pages(&self) -> Result<Vec<PageFragments>> {
        Ok(self.pages.clone())
    }
}
