//! Count reconciliation: per-product review state machine with persistence.
//!
//! ```text
//!            count(n > 0)                 count(0) / clear
//!  Pending ───────────────▶ Reviewed ───────────────────────▶ Pending
//! ```
//!
//! `resolve_difference` sets the counted quantity to the system quantity and
//! stamps the review time without changing the reviewer or the state.
//!
//! Every transition is written to the store before it is returned. If the
//! write fails the product is put back exactly as it was and the caller gets
//! [`ReconError::PersistenceFailure`].

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ReconError, Result};
use crate::inventory::{Product, ProductCollection, ProductState, Worker};
use crate::store::ProductStore;

/// A manual change to a product's counted quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountAdjustment {
    /// Direct edit.
    Set(u32),
    Increment(u32),
    /// Saturates at zero.
    Decrement(u32),
    /// Replace the partial counts; their sum becomes the counted quantity.
    Partials(Vec<u32>),
    /// Append one partial count.
    AddPartial(u32),
}

impl CountAdjustment {
    /// Apply to `product`'s quantities and return the new counted value.
    fn apply(self, product: &mut Product) -> u32 {
        match self {
            Self::Set(n) => {
                product.partial_counts.clear();
                n
            }
            Self::Increment(n) => {
                product.partial_counts.clear();
                product.real_quantity.saturating_add(n)
            }
            Self::Decrement(n) => {
                product.partial_counts.clear();
                product.real_quantity.saturating_sub(n)
            }
            Self::Partials(parts) => {
                product.partial_counts = parts;
                sum_partials(&product.partial_counts)
            }
            Self::AddPartial(n) => {
                product.partial_counts.push(n);
                sum_partials(&product.partial_counts)
            }
        }
    }
}

fn sum_partials(parts: &[u32]) -> u32 {
    parts.iter().fold(0u32, |acc, &n| acc.saturating_add(n))
}

/// Applies review transitions to a caller-owned collection.
pub struct Reconciler<'a, S: ProductStore + ?Sized> {
    store: &'a S,
    collection: &'a mut ProductCollection,
}

impl<'a, S: ProductStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, collection: &'a mut ProductCollection) -> Self {
        Self { store, collection }
    }

    pub fn collection(&self) -> &ProductCollection {
        &*self.collection
    }

    /// Change the counted quantity of `code` on behalf of `worker`.
    pub async fn count(
        &mut self,
        code: &str,
        adjustment: CountAdjustment,
        worker: &str,
    ) -> Result<Product> {
        let now = Utc::now();
        self.transition(code, move |product| {
            let real = adjustment.apply(product);
            product.record_count(real, worker, now);
        })
        .await
    }

    /// Explicitly reset `code` to uncounted.
    pub async fn clear(&mut self, code: &str) -> Result<Product> {
        self.transition(code, Product::reset_review).await
    }

    /// Close the discrepancy on `code` without a physical recount.
    pub async fn resolve_difference(&mut self, code: &str) -> Result<Product> {
        let now = Utc::now();
        self.transition(code, move |product| product.resolve(now))
            .await
    }

    /// Resolve every product with a nonzero difference in one save.
    ///
    /// Returns how many products changed. On a failed save every product is
    /// restored.
    pub async fn resolve_all(&mut self) -> Result<usize> {
        let snapshot = self.collection.clone();
        let now = Utc::now();
        let mut resolved = 0;
        for product in self.collection.products_mut() {
            if product.difference() != 0 {
                product.resolve(now);
                resolved += 1;
            }
        }
        if resolved == 0 {
            return Ok(0);
        }

        let location = self.collection.location.clone();
        if let Err(e) = self.store.save(&location, &*self.collection).await {
            warn!(%location, error = %e, "bulk resolve not saved, rolling back");
            *self.collection = snapshot;
            return Err(e.into());
        }
        info!(%location, resolved, "resolved differences");
        Ok(resolved)
    }

    async fn transition<F>(&mut self, code: &str, apply: F) -> Result<Product>
    where
        F: FnOnce(&mut Product) + Send,
    {
        let index = self
            .collection
            .position(code)
            .ok_or_else(|| ReconError::ProductNotFound(code.to_string()))?;
        let location = self.collection.location.clone();

        let (before, after) = {
            let product = self
                .collection
                .get_mut(index)
                .ok_or_else(|| ReconError::ProductNotFound(code.to_string()))?;
            let before = product.clone();
            apply(product);
            (before, product.clone())
        };

        if let Err(e) = self.store.save_product(&location, &after).await {
            warn!(%location, code = %after.code, error = %e, "review not saved, rolling back");
            if let Some(product) = self.collection.get_mut(index) {
                *product = before;
            }
            return Err(e.into());
        }

        debug!(
            %location,
            code = %after.code,
            real = after.real_quantity,
            difference = after.difference(),
            state = ?after.state,
            "review saved"
        );
        Ok(after)
    }
}

/// Totals over a collection's review state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub total: usize,
    pub reviewed: usize,
    pub pending: usize,
    /// Products whose count equals the system quantity.
    pub matching: usize,
    /// Counted more than the system says.
    pub surplus: usize,
    /// Counted less than the system says.
    pub shortage: usize,
    pub net_difference: i64,
}

pub fn summarize(collection: &ProductCollection) -> ReconciliationSummary {
    let mut summary = ReconciliationSummary {
        total: collection.len(),
        ..ReconciliationSummary::default()
    };
    for product in collection {
        match product.state {
            ProductState::Reviewed => summary.reviewed += 1,
            ProductState::Pending => summary.pending += 1,
        }
        let difference = product.difference();
        match difference.signum() {
            1 => summary.surplus += 1,
            -1 => summary.shortage += 1,
            _ => summary.matching += 1,
        }
        summary.net_difference += difference;
    }
    summary
}

/// Review progress of one worker's assigned products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProgress {
    pub worker_code: String,
    pub assigned: usize,
    pub reviewed: usize,
}

/// Progress per worker, in roster order.
pub fn worker_progress(collection: &ProductCollection, workers: &[Worker]) -> Vec<WorkerProgress> {
    workers
        .iter()
        .map(|worker| {
            let assigned: Vec<&Product> = collection
                .iter()
                .filter(|p| p.assigned_worker.as_deref() == Some(worker.code.as_str()))
                .collect();
            WorkerProgress {
                worker_code: worker.code.clone(),
                assigned: assigned.len(),
                reviewed: assigned
                    .iter()
                    .filter(|p| p.state == ProductState::Reviewed)
                    .count(),
            }
        })
        .collect()
}
