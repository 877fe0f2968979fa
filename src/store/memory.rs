//! In-memory store with injectable save failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ProductStore, StoreError, TransitEntry};
use crate::inventory::{Product, ProductCollection};

#[derive(Default)]
struct Inner {
    collections: HashMap<String, ProductCollection>,
    storage_locations: HashMap<String, Vec<String>>,
    transit: HashMap<String, Vec<TransitEntry>>,
}

/// Keeps everything in a process-local map.
///
/// `fail_next_saves(n)` makes the next `n` write calls return
/// [`StoreError::Unavailable`] without touching stored data.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    pending_failures: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_saves(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), StoreError> {
        let failed = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Unavailable("injected save failure".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn load(&self, location: &str) -> Result<Option<ProductCollection>, StoreError> {
        Ok(self.lock()?.collections.get(location).cloned())
    }

    async fn save(&self, location: &str, collection: &ProductCollection) -> Result<(), StoreError> {
        self.check_write()?;
        self.lock()?
            .collections
            .insert(location.to_string(), collection.clone());
        Ok(())
    }

    async fn save_product(&self, location: &str, product: &Product) -> Result<(), StoreError> {
        self.check_write()?;
        let mut inner = self.lock()?;
        let collection = inner
            .collections
            .get_mut(location)
            .ok_or_else(|| StoreError::NotFound(location.to_string()))?;
        let slot = collection
            .get_mut(product.correlative_index.wrapping_sub(1))
            .ok_or_else(|| {
                StoreError::InvalidRecord(format!(
                    "no stored product with correlative index {}",
                    product.correlative_index
                ))
            })?;
        *slot = product.clone();
        Ok(())
    }

    async fn load_storage_locations(&self, location: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()?
            .storage_locations
            .get(location)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_storage_locations(
        &self,
        location: &str,
        storage_locations: &[String],
    ) -> Result<(), StoreError> {
        self.check_write()?;
        self.lock()?
            .storage_locations
            .insert(location.to_string(), storage_locations.to_vec());
        Ok(())
    }

    async fn load_transit(&self, location: &str) -> Result<Vec<TransitEntry>, StoreError> {
        Ok(self.lock()?.transit.get(location).cloned().unwrap_or_default())
    }

    async fn save_transit(&self, location: &str, entries: &[TransitEntry]) -> Result<(), StoreError> {
        self.check_write()?;
        self.lock()?
            .transit
            .insert(location.to_string(), entries.to_vec());
        Ok(())
    }
}
