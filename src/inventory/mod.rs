//! Product and worker model shared by assignment and reconciliation.

pub mod collection;
pub mod product;
pub mod worker;

pub use collection::ProductCollection;
pub use product::{normalize_code, InitialCount, Product, ProductState, DEFAULT_STORAGE_LOCATION};
pub use worker::{load_roster, Worker};
