//! JSON-file store: one directory per location key.
//!
//! ```text
//! <root>/<location>/products.json
//! <root>/<location>/storage_locations.json
//! <root>/<location>/transit.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{CollectionRecord, ProductRecord, ProductStore, StoreError, TransitEntry};
use crate::inventory::{Product, ProductCollection};

const PRODUCTS_FILE: &str = "products.json";
const STORAGE_LOCATIONS_FILE: &str = "storage_locations.json";
const TRANSIT_FILE: &str = "transit.json";

pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location_dir(&self, location: &str) -> Result<PathBuf, StoreError> {
        let valid = !location.is_empty()
            && location != "."
            && location != ".."
            && !location.contains(['/', '\\']);
        if !valid {
            return Err(StoreError::InvalidKey(location.to_string()));
        }
        Ok(self.root.join(location))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temporary file so readers never see a partial document.
    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "wrote store file");
        Ok(())
    }
}

/// The directory key and the collection's own location must agree.
fn check_location(key: &str, stored: &str) -> Result<(), StoreError> {
    if key == stored {
        return Ok(());
    }
    Err(StoreError::InvalidRecord(format!(
        "collection for location '{stored}' does not belong under '{key}'"
    )))
}

#[async_trait]
impl ProductStore for JsonFileStore {
    async fn load(&self, location: &str) -> Result<Option<ProductCollection>, StoreError> {
        let path = self.location_dir(location)?.join(PRODUCTS_FILE);
        let Some(record) = Self::read_json::<CollectionRecord>(&path).await? else {
            return Ok(None);
        };
        check_location(location, &record.location)?;
        record.into_collection().map(Some)
    }

    async fn save(&self, location: &str, collection: &ProductCollection) -> Result<(), StoreError> {
        check_location(location, &collection.location)?;
        let path = self.location_dir(location)?.join(PRODUCTS_FILE);
        Self::write_json(&path, &CollectionRecord::from(collection)).await
    }

    async fn save_product(&self, location: &str, product: &Product) -> Result<(), StoreError> {
        let path = self.location_dir(location)?.join(PRODUCTS_FILE);
        let mut record = Self::read_json::<CollectionRecord>(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(location.to_string()))?;

        let slot = record
            .products
            .iter_mut()
            .enumerate()
            .find(|(i, p)| p.correlative_index.unwrap_or(i + 1) == product.correlative_index)
            .map(|(_, p)| p)
            .ok_or_else(|| {
                StoreError::InvalidRecord(format!(
                    "no stored product with correlative index {}",
                    product.correlative_index
                ))
            })?;
        *slot = ProductRecord::from(product);

        Self::write_json(&path, &record).await
    }

    async fn load_storage_locations(&self, location: &str) -> Result<Vec<String>, StoreError> {
        let path = self.location_dir(location)?.join(STORAGE_LOCATIONS_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }

    async fn save_storage_locations(
        &self,
        location: &str,
        storage_locations: &[String],
    ) -> Result<(), StoreError> {
        let path = self.location_dir(location)?.join(STORAGE_LOCATIONS_FILE);
        Self::write_json(&path, storage_locations).await
    }

    async fn load_transit(&self, location: &str) -> Result<Vec<TransitEntry>, StoreError> {
        let path = self.location_dir(location)?.join(TRANSIT_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }

    async fn save_transit(&self, location: &str, entries: &[TransitEntry]) -> Result<(), StoreError> {
        let path = self.location_dir(location)?.join(TRANSIT_FILE);
        Self::write_json(&path, entries).await
    }
}
