//! Count assignment: circular, remainder-balanced partition of products.
//!
//! Products are walked in rotated order starting at a chosen correlative and
//! wrapping to 1 after N. With `base = N / K` and `rem = N % K`, the first
//! `rem` workers in roster order get `base + 1` consecutive items and the rest
//! get `base`.
//!
//! A range that wraps is reported as `first > last` (e.g. `9..2` for items
//! 9, 10, 1, 2 of 10). That is the expected representation.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ReconError, Result};
use crate::inventory::{ProductCollection, Worker};
use crate::store::ProductStore;

/// Correlative span handed to one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRange {
    pub worker_code: String,
    pub first_correlative: usize,
    pub last_correlative: usize,
    /// Number of products in the span.
    pub count: usize,
}

impl AssignmentRange {
    pub fn wraps(&self) -> bool {
        self.first_correlative > self.last_correlative
    }
}

/// 0-based product positions starting at `start_index` (1-based), wrapping.
pub fn rotated_order(len: usize, start_index: usize) -> Vec<usize> {
    let start = start_index - 1;
    (start..len).chain(0..start).collect()
}

/// Items per worker, in roster order.
pub fn slice_sizes(len: usize, workers: usize) -> Vec<usize> {
    let base = len / workers;
    let remainder = len % workers;
    (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Reset every product's review state and split the collection across `workers`.
///
/// Preconditions are checked before anything is mutated. Workers that end up
/// with no items (more workers than products) get no range.
pub fn distribute(
    collection: &mut ProductCollection,
    workers: &[Worker],
    start_index: usize,
) -> Result<Vec<AssignmentRange>> {
    if workers.is_empty() {
        return Err(ReconError::EmptyWorkerRoster);
    }
    let len = collection.len();
    if len == 0 || start_index == 0 || start_index > len {
        return Err(ReconError::InvalidStartIndex {
            start: start_index,
            len,
        });
    }

    for product in collection.products_mut() {
        product.reset_review();
        product.assigned_worker = None;
    }

    let order = rotated_order(len, start_index);
    let mut owners: Vec<Option<&str>> = vec![None; len];
    let mut ranges = Vec::with_capacity(workers.len());
    let mut cursor = 0;

    for (worker, size) in workers.iter().zip(slice_sizes(len, workers.len())) {
        if size == 0 {
            continue;
        }
        let slice = &order[cursor..cursor + size];
        cursor += size;
        for &position in slice {
            owners[position] = Some(worker.code.as_str());
        }
        ranges.push(AssignmentRange {
            worker_code: worker.code.clone(),
            first_correlative: slice[0] + 1,
            last_correlative: slice[size - 1] + 1,
            count: size,
        });
    }

    for (product, owner) in collection.products_mut().zip(owners) {
        product.assigned_worker = owner.map(str::to_string);
    }
    collection.assignment_start = Some(start_index);

    info!(
        location = %collection.location,
        products = len,
        workers = workers.len(),
        start_index,
        "distributed count assignments"
    );
    Ok(ranges)
}

/// [`distribute`], then save the whole collection.
///
/// If the save fails the collection is restored to its state before the call.
pub async fn distribute_and_save<S: ProductStore + ?Sized>(
    store: &S,
    collection: &mut ProductCollection,
    workers: &[Worker],
    start_index: usize,
) -> Result<Vec<AssignmentRange>> {
    let snapshot = collection.clone();
    let ranges = distribute(collection, workers, start_index)?;

    if let Err(e) = store.save(&collection.location, collection).await {
        warn!(location = %collection.location, error = %e, "distribution not saved, rolling back");
        *collection = snapshot;
        return Err(e.into());
    }
    Ok(ranges)
}

/// Rebuild ranges from stored `assigned_worker` values, in roster order.
///
/// Each worker's span is the circular run that starts at an item whose
/// predecessor belongs to someone else. A worker holding every item has no
/// such boundary; its span starts at the collection's recorded assignment
/// start, or at 1 when none was recorded.
pub fn derive_ranges(collection: &ProductCollection, workers: &[Worker]) -> Vec<AssignmentRange> {
    let products = collection.products();
    let len = products.len();
    let owned_by = |i: usize, code: &str| products[i].assigned_worker.as_deref() == Some(code);
    let full_circle_start = collection
        .assignment_start
        .filter(|start| (1..=len).contains(start))
        .map_or(0, |start| start - 1);

    workers
        .iter()
        .filter_map(|worker| {
            let code = worker.code.as_str();
            let count = (0..len).filter(|&i| owned_by(i, code)).count();
            if count == 0 {
                return None;
            }
            let first = (0..len)
                .find(|&i| owned_by(i, code) && !owned_by((i + len - 1) % len, code))
                .unwrap_or(full_circle_start);
            let mut last = first;
            while owned_by((last + 1) % len, code) && (last + 1) % len != first {
                last = (last + 1) % len;
            }
            Some(AssignmentRange {
                worker_code: worker.code.clone(),
                first_correlative: first + 1,
                last_correlative: last + 1,
                count,
            })
        })
        .collect()
}
