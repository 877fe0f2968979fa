//! Persistent store boundary.
//!
//! The store keeps one [`ProductCollection`] per location key, plus the
//! custom storage locations and transit lists used by the surrounding app.
//!
//! # Record format
//!
//! Collections are written as camelCase JSON. Every product field except
//! `code` is optional on read, and defaults are applied once in
//! [`ProductRecord::into_product`]. Reviewer and review time use the sentinel
//! string `"Pending"` for "not reviewed":
//!
//! ```json
//! {
//!   "location": "centro",
//!   "reportDate": "2024-03-05",
//!   "processedAt": "2024-03-05T14:02:11Z",
//!   "products": [
//!     {"code": "AB12", "name": "Tornillo", "systemQuantity": 40, "realQuantity": 0,
//!      "difference": -40, "state": "Pending", "reviewer": "Pending",
//!      "reviewedAt": "Pending", "assignedWorker": "W1",
//!      "storageLocation": "BODEGA", "correlativeIndex": 1}
//!   ]
//! }
//! ```

pub mod file;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::{Product, ProductCollection, ProductState, DEFAULT_STORAGE_LOCATION};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Sentinel written for an unset reviewer or review time.
pub const PENDING: &str = "Pending";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("No collection stored for location '{0}'")]
    NotFound(String),

    #[error("Invalid location key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// An entry of a transit (movement) list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitEntry {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    /// Location the goods are moving to.
    #[serde(default)]
    pub destination: String,
}

/// Load/save operations the reconciliation core depends on.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Stored collection for `location`, or `None` if there is none.
    async fn load(&self, location: &str) -> Result<Option<ProductCollection>, StoreError>;

    /// Replace the whole collection for `location`.
    async fn save(&self, location: &str, collection: &ProductCollection) -> Result<(), StoreError>;

    /// Replace the stored product with the same correlative index.
    async fn save_product(&self, location: &str, product: &Product) -> Result<(), StoreError>;

    async fn load_storage_locations(&self, location: &str) -> Result<Vec<String>, StoreError>;

    async fn save_storage_locations(
        &self,
        location: &str,
        storage_locations: &[String],
    ) -> Result<(), StoreError>;

    async fn load_transit(&self, location: &str) -> Result<Vec<TransitEntry>, StoreError>;

    async fn save_transit(&self, location: &str, entries: &[TransitEntry]) -> Result<(), StoreError>;
}

/// A product as stored: optional fields, sentinel strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub system_quantity: Option<u32>,
    #[serde(default)]
    pub real_quantity: Option<u32>,
    /// Written for consumers; recomputed on read.
    #[serde(default, skip_deserializing)]
    pub difference: i64,
    #[serde(default)]
    pub state: Option<ProductState>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    #[serde(default)]
    pub assigned_worker: Option<String>,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub correlative_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partial_counts: Vec<u32>,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: Some(product.name.clone()),
            system_quantity: Some(product.system_quantity),
            real_quantity: Some(product.real_quantity),
            difference: product.difference(),
            state: Some(product.state),
            reviewer: Some(
                product
                    .reviewer
                    .clone()
                    .unwrap_or_else(|| PENDING.to_string()),
            ),
            reviewed_at: Some(
                product
                    .reviewed_at
                    .map_or_else(|| PENDING.to_string(), |t| t.to_rfc3339()),
            ),
            assigned_worker: product.assigned_worker.clone(),
            storage_location: Some(product.storage_location.clone()),
            correlative_index: Some(product.correlative_index),
            partial_counts: product.partial_counts.clone(),
        }
    }
}

impl ProductRecord {
    /// Apply defaults and convert. `position` is the 0-based array position,
    /// used when the record carries no correlative index.
    pub fn into_product(self, position: usize) -> Result<Product, StoreError> {
        if self.code.trim().is_empty() {
            return Err(StoreError::InvalidRecord(format!(
                "product at position {} has an empty code",
                position + 1
            )));
        }

        let reviewed_at = match unset_if_pending(self.reviewed_at) {
            None => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| {
                        StoreError::InvalidRecord(format!(
                            "product {}: bad reviewedAt {raw:?}: {e}",
                            self.code
                        ))
                    })?
                    .with_timezone(&Utc),
            ),
        };

        Ok(Product {
            code: crate::inventory::normalize_code(&self.code),
            name: self.name.unwrap_or_default(),
            system_quantity: self.system_quantity.unwrap_or(0),
            real_quantity: self.real_quantity.unwrap_or(0),
            state: self.state.unwrap_or_default(),
            reviewer: unset_if_pending(self.reviewer),
            reviewed_at,
            assigned_worker: self.assigned_worker.filter(|w| !w.is_empty()),
            storage_location: self
                .storage_location
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_LOCATION.to_string()),
            correlative_index: self.correlative_index.unwrap_or(position + 1),
            partial_counts: self.partial_counts,
        })
    }
}

fn unset_if_pending(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != PENDING)
}

/// A collection as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub location: String,
    pub report_date: NaiveDate,
    pub processed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_start: Option<usize>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl From<&ProductCollection> for CollectionRecord {
    fn from(collection: &ProductCollection) -> Self {
        Self {
            location: collection.location.clone(),
            report_date: collection.report_date,
            processed_at: collection.processed_at,
            assignment_start: collection.assignment_start,
            products: collection.iter().map(ProductRecord::from).collect(),
        }
    }
}

impl CollectionRecord {
    pub fn into_collection(self) -> Result<ProductCollection, StoreError> {
        let products = self
            .products
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_product(i))
            .collect::<Result<Vec<_>, _>>()?;
        let mut collection = ProductCollection::from_parts(
            self.location,
            self.report_date,
            self.processed_at,
            products,
        )
        .map_err(StoreError::InvalidRecord)?;
        collection.assignment_start = self.assignment_start;
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::collection::tests::sample;

    #[test]
    fn sparse_record_gets_defaults() {
        let record: ProductRecord = serde_json::from_str(r#"{"code": "ab1*"}"#).unwrap();
        let product = record.into_product(4).unwrap();
        assert_eq!(product.code, "AB1");
        assert_eq!(product.state, ProductState::Pending);
        assert_eq!(product.storage_location, DEFAULT_STORAGE_LOCATION);
        assert_eq!(product.correlative_index, 5);
        assert!(product.reviewer.is_none());
        assert!(product.assigned_worker.is_none());
    }

    #[test]
    fn pending_sentinels_map_to_none() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"code": "AB1", "reviewer": "Pending", "reviewedAt": "Pending"}"#,
        )
        .unwrap();
        let product = record.into_product(0).unwrap();
        assert!(product.reviewer.is_none());
        assert!(product.reviewed_at.is_none());
    }

    #[test]
    fn stored_difference_is_ignored() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"code": "AB1", "systemQuantity": 10, "realQuantity": 4, "difference": 99}"#,
        )
        .unwrap();
        assert_eq!(record.into_product(0).unwrap().difference(), -6);
    }

    #[test]
    fn written_record_uses_sentinels_and_difference() {
        let collection = sample(1);
        let value = serde_json::to_value(ProductRecord::from(&collection.products()[0])).unwrap();
        assert_eq!(value["reviewer"], PENDING);
        assert_eq!(value["reviewedAt"], PENDING);
        assert_eq!(value["difference"], -10);
        assert_eq!(value["correlativeIndex"], 1);
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"code": "AB1", "reviewedAt": "yesterday"}"#).unwrap();
        assert!(matches!(
            record.into_product(0),
            Err(StoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn collection_record_keeps_assignment_start() {
        let mut collection = sample(4);
        collection.assignment_start = Some(3);
        let value = serde_json::to_value(CollectionRecord::from(&collection)).unwrap();
        assert_eq!(value["assignmentStart"], 3);

        let restored: CollectionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(restored.into_collection().unwrap().assignment_start, Some(3));

        let unassigned = serde_json::to_value(CollectionRecord::from(&sample(1))).unwrap();
        assert!(unassigned.get("assignmentStart").is_none());
    }

    #[test]
    fn collection_record_preserves_products() {
        let collection = sample(3);
        let json = serde_json::to_string(&CollectionRecord::from(&collection)).unwrap();
        assert!(json.contains(r#""reportDate":"2024-03-05""#));
        let restored: CollectionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.into_collection().unwrap().products(), collection.products());
    }
}
