//! `stockrecon` - inventory report intake and stock reconciliation
//!
//! # Features
//!
//! - **Intake**: rebuild report lines from positioned PDF text, check the
//!   report type, and extract numbered product rows
//! - **Assignment**: split products across a worker roster in circular,
//!   remainder-balanced spans starting anywhere in the list
//! - **Reconciliation**: count, clear and resolve products through a review
//!   state machine that rolls back when the store rejects a write
//!
//! # Example
//!
//! ```rust,no_run
//! use stockrecon::assign::distribute_and_save;
//! use stockrecon::config::IntakeConfig;
//! use stockrecon::intake::{IntakePipeline, JsonFragmentSource};
//! use stockrecon::inventory::Worker;
//! use stockrecon::reconcile::{CountAdjustment, Reconciler};
//! use stockrecon::store::JsonFileStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = JsonFileStore::new("/var/lib/stockrecon");
//!     let pipeline = IntakePipeline::new(IntakeConfig::default())?;
//!     let source = JsonFragmentSource::new("report.json");
//!     let mut collection = pipeline.ingest(&store, "centro", &source).await?.collection;
//!
//!     let roster = vec![Worker::new("W1", "Ana"), Worker::new("W2", "Luis")];
//!     let ranges = distribute_and_save(&store, &mut collection, &roster, 1).await?;
//!     println!("{ranges:?}");
//!
//!     let mut reconciler = Reconciler::new(&store, &mut collection);
//!     reconciler.count("AB12", CountAdjustment::Set(38), "W1").await?;
//!     Ok(())
//! }
//! ```

pub mod assign;
pub mod config;
pub mod error;
pub mod intake;
pub mod inventory;
pub mod reconcile;
pub mod store;

pub use assign::{derive_ranges, distribute, distribute_and_save, AssignmentRange};
pub use error::{ReconError, Result};
pub use intake::{IntakeOutcome, IntakePipeline, TextFragment};
pub use inventory::{normalize_code, Product, ProductCollection, ProductState, Worker};
pub use reconcile::{summarize, CountAdjustment, Reconciler, ReconciliationSummary};
pub use store::{JsonFileStore, MemoryStore, ProductStore, StoreError};

/// Version of stockrecon
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
