//! Report intake: positioned text in, numbered product collection out.
//!
//! # Pipeline
//!
//! ```text
//! DocumentSource → pages of fragments → line reconstruction → header check → record extraction → ProductCollection
//! ```
//!
//! Header validation runs before extraction, and nothing is written to the
//! store unless both succeed.
//!
//! # Example
//!
//! ```rust
//! use stockrecon::config::IntakeConfig;
//! use stockrecon::intake::{IntakePipeline, TextFragment};
//!
//! let page = vec![
//!     TextFragment::new("REPORTE DE EXISTENCIAS 05/03/2024", 0.0, 800.0),
//!     TextFragment::new("AB12", 0.0, 700.0),
//!     TextFragment::new("Tornillo", 0.0, 690.0),
//!     TextFragment::new("40", 200.0, 690.0),
//! ];
//! let pipeline = IntakePipeline::new(IntakeConfig::default()).unwrap();
//! let outcome = pipeline.process_pages("centro", &[page]).unwrap();
//! assert_eq!(outcome.collection.products()[0].code, "AB12");
//! assert_eq!(outcome.collection.products()[0].system_quantity, 40);
//! ```

pub mod extract;
pub mod lines;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod source;
pub mod types;
pub mod validate;

use chrono::{Local, Utc};
use tracing::info;

pub use extract::{Extraction, ParsedRecord, RecordExtractor};
pub use source::{DocumentSource, JsonFragmentSource, StaticSource};
pub use types::{PageFragments, ReconstructedLine, TextFragment};
pub use validate::DocumentProfile;

use crate::config::IntakeConfig;
use crate::error::{ReconError, Result};
use crate::inventory::ProductCollection;
use crate::store::ProductStore;

/// Result of a successful intake.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub collection: ProductCollection,
    pub pages: usize,
    pub lines: usize,
    /// `false` when the report carried no date and today's date was used.
    pub report_date_found: bool,
}

/// Runs reconstruction, validation and extraction with one configuration.
#[derive(Debug, Clone)]
pub struct IntakePipeline {
    config: IntakeConfig,
    profile: DocumentProfile,
    extractor: RecordExtractor,
}

impl IntakePipeline {
    pub fn new(config: IntakeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            profile: config.profile(),
            extractor: config.extractor(),
            config,
        })
    }

    /// Turn already-read pages into a product collection for `location`.
    pub fn process_pages(&self, location: &str, pages: &[PageFragments]) -> Result<IntakeOutcome> {
        let lines = lines::reconstruct_document(pages, self.config.y_tolerance);
        self.profile.validate(&lines::document_text(&lines))?;

        let extraction = self.extractor.extract(&lines)?;
        let report_date = extraction.report_date_or(Local::now().date_naive());
        let collection = ProductCollection::from_records(
            location,
            &extraction.records,
            report_date,
            Utc::now(),
            self.config.initial_count,
            &self.config.default_storage_location,
        );

        info!(
            location,
            pages = pages.len(),
            lines = lines.len(),
            products = collection.len(),
            %report_date,
            "report processed"
        );
        Ok(IntakeOutcome {
            collection,
            pages: pages.len(),
            lines: lines.len(),
            report_date_found: extraction.report_date.is_some(),
        })
    }

    /// Read `source` and process it.
    pub async fn run(&self, location: &str, source: &dyn DocumentSource) -> Result<IntakeOutcome> {
        let pages = source
            .read_pages()
            .await
            .map_err(|e| ReconError::DocumentRead(format!("{}: {e:#}", source.name())))?;
        self.process_pages(location, &pages)
    }

    /// Read, process and save the new collection, replacing the stored one.
    pub async fn ingest<S: ProductStore + ?Sized>(
        &self,
        store: &S,
        location: &str,
        source: &dyn DocumentSource,
    ) -> Result<IntakeOutcome> {
        let outcome = self.run(location, source).await?;
        store.save(location, &outcome.collection).await?;
        Ok(outcome)
    }
}
