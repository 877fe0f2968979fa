//! Error taxonomy for intake, assignment and reconciliation.
//!
//! Structural failures ([`ReconError::InvalidDocumentType`],
//! [`ReconError::EmptyWorkerRoster`], [`ReconError::InvalidStartIndex`],
//! [`ReconError::ProductNotFound`]) are raised before any mutation.
//! [`ReconError::PersistenceFailure`] is raised after the in-memory change has
//! already been rolled back.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ReconError {
    /// The document does not carry the expected report header.
    #[error("Invalid document type: {message}")]
    InvalidDocumentType { message: String },

    /// Extraction ran to completion but matched no product rows.
    #[error("No product records found in document")]
    NoRecordsFound,

    #[error("Worker roster is empty")]
    EmptyWorkerRoster,

    #[error("Start index {start} is outside 1..={len}")]
    InvalidStartIndex { start: usize, len: usize },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StoreError),

    #[error("Document read error: {0}")]
    DocumentRead(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ReconError {
    /// `true` for outcomes callers should surface as a notice, not a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NoRecordsFound)
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;
