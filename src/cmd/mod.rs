pub mod assign;
pub mod intake;
pub mod review;
pub mod show;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use stockrecon::config::{load_config, Config};
use stockrecon::{JsonFileStore, ProductCollection, ProductStore};

/// Settings and store shared by every subcommand.
pub struct App {
    pub config: Config,
    pub store: JsonFileStore,
}

impl App {
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = load_config(config_path)?;
        let root = data_dir.unwrap_or_else(|| config.store.data_dir());
        Ok(Self {
            config,
            store: JsonFileStore::new(root),
        })
    }

    /// Stored collection for `location`, or an error telling the user to run intake.
    pub async fn load(&self, location: &str) -> Result<ProductCollection> {
        self.store
            .load(location)
            .await
            .with_context(|| format!("failed to load location '{location}'"))?
            .with_context(|| {
                format!("no product list for location '{location}'. Run `stockrecon intake` first.")
            })
    }
}
