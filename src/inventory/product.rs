//! The product record and its review state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intake::extract::ParsedRecord;

/// Storage location given to products that do not name one.
pub const DEFAULT_STORAGE_LOCATION: &str = "BODEGA";

/// Canonical product code: marker and surrounding whitespace stripped, uppercased.
///
/// ```rust
/// use stockrecon::inventory::normalize_code;
///
/// assert_eq!(normalize_code(" ab12 * "), "AB12");
/// assert_eq!(normalize_code(&normalize_code("xy9**")), "XY9");
/// ```
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .trim_end_matches(|c: char| c == '*' || c.is_whitespace())
        .to_uppercase()
}

/// Review state of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductState {
    #[default]
    Pending,
    Reviewed,
}

/// How `real_quantity` starts out when a product is created from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialCount {
    /// Nothing counted yet.
    #[default]
    Zero,
    /// Assume the system quantity until someone recounts.
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub system_quantity: u32,
    pub real_quantity: u32,
    pub state: ProductState,
    /// Worker code of the last reviewer.
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub assigned_worker: Option<String>,
    pub storage_location: String,
    /// 1-based position in extraction order. Never renumbered.
    pub correlative_index: usize,
    /// Partial counts summed into `real_quantity` in extra-count mode.
    pub partial_counts: Vec<u32>,
}

impl Product {
    /// Build a product from an extracted row.
    pub fn from_record(
        record: &ParsedRecord,
        correlative_index: usize,
        initial: InitialCount,
        storage_location: &str,
    ) -> Self {
        let real_quantity = match initial {
            InitialCount::Zero => 0,
            InitialCount::System => record.quantity,
        };
        Self {
            code: normalize_code(&record.code),
            name: record.name.trim().to_string(),
            system_quantity: record.quantity,
            real_quantity,
            state: ProductState::Pending,
            reviewer: None,
            reviewed_at: None,
            assigned_worker: None,
            storage_location: storage_location.to_string(),
            correlative_index,
            partial_counts: Vec::new(),
        }
    }

    /// `real_quantity - system_quantity`.
    pub fn difference(&self) -> i64 {
        i64::from(self.real_quantity) - i64::from(self.system_quantity)
    }

    /// Back to an uncounted, unreviewed product.
    pub fn reset_review(&mut self) {
        self.real_quantity = 0;
        self.partial_counts.clear();
        self.state = ProductState::Pending;
        self.reviewer = None;
        self.reviewed_at = None;
    }

    /// Apply a new counted quantity and derive the review state from it.
    ///
    /// A nonzero count marks the product reviewed by `worker` at `now`; a zero
    /// count returns it to pending.
    pub fn record_count(&mut self, real_quantity: u32, worker: &str, now: DateTime<Utc>) {
        self.real_quantity = real_quantity;
        if real_quantity == 0 {
            self.state = ProductState::Pending;
            self.reviewer = None;
            self.reviewed_at = None;
        } else {
            self.state = ProductState::Reviewed;
            self.reviewer = Some(worker.to_string());
            self.reviewed_at = Some(now);
        }
    }

    /// Close the discrepancy without a recount. The reviewer is left as is.
    pub fn resolve(&mut self, now: DateTime<Utc>) {
        self.real_quantity = self.system_quantity;
        self.reviewed_at = Some(now);
    }
}
