//! Caller-owned product collection for one location.

use chrono::{DateTime, NaiveDate, Utc};

use super::product::{normalize_code, InitialCount, Product};
use crate::intake::extract::ParsedRecord;

/// Ordered products of one location plus intake metadata.
///
/// Correlative indices are always exactly `1..=len`, in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCollection {
    pub location: String,
    /// Date printed on the source report.
    pub report_date: NaiveDate,
    pub processed_at: DateTime<Utc>,
    /// Correlative the last count assignment started at.
    pub assignment_start: Option<usize>,
    products: Vec<Product>,
}

impl ProductCollection {
    /// Create products from extracted rows, numbering them 1..=N in order.
    pub fn from_records(
        location: impl Into<String>,
        records: &[ParsedRecord],
        report_date: NaiveDate,
        processed_at: DateTime<Utc>,
        initial: InitialCount,
        storage_location: &str,
    ) -> Self {
        let products = records
            .iter()
            .enumerate()
            .map(|(i, record)| Product::from_record(record, i + 1, initial, storage_location))
            .collect();
        Self {
            location: location.into(),
            report_date,
            processed_at,
            assignment_start: None,
            products,
        }
    }

    /// Rebuild a collection from stored products.
    ///
    /// Products are ordered by correlative index; the indices must be exactly
    /// `1..=N`. Returns a description of the first violation otherwise.
    pub fn from_parts(
        location: impl Into<String>,
        report_date: NaiveDate,
        processed_at: DateTime<Utc>,
        mut products: Vec<Product>,
    ) -> Result<Self, String> {
        products.sort_by_key(|p| p.correlative_index);
        for (i, product) in products.iter().enumerate() {
            if product.correlative_index != i + 1 {
                return Err(format!(
                    "correlative indices must be 1..={}, found {} at position {}",
                    products.len(),
                    product.correlative_index,
                    i + 1
                ));
            }
        }
        Ok(Self {
            location: location.into(),
            report_date,
            processed_at,
            assignment_start: None,
            products,
        })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Index of the first product whose code normalizes to `code`.
    pub fn position(&self, code: &str) -> Option<usize> {
        let wanted = normalize_code(code);
        self.products.iter().position(|p| p.code == wanted)
    }

    pub fn find(&self, code: &str) -> Option<&Product> {
        self.position(code).map(|i| &self.products[i])
    }

    /// Mutable access for review transitions. Correlatives are not exposed.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Product> {
        self.products.get_mut(index)
    }

    pub(crate) fn products_mut(&mut self) -> impl Iterator<Item = &mut Product> {
        self.products.iter_mut()
    }
}

impl<'a> IntoIterator for &'a ProductCollection {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
