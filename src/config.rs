//! Configuration loaded from `~/.config/stockrecon/config.toml`.
//!
//! ```toml
//! [intake]
//! header_window = 70
//! markers = ["EXISTENCIAS", "LISTA DE PRODUCTOS"]
//! blocklist = ["SUCURSAL", "REPORTE", "PAGINA"]
//! y_tolerance = 1.0
//! initial_count = "zero"
//! default_storage_location = "BODEGA"
//!
//! [store]
//! data_dir = "/var/lib/stockrecon"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::intake::extract::{RecordExtractor, DEFAULT_BLOCKLIST};
use crate::intake::lines::DEFAULT_Y_TOLERANCE;
use crate::intake::validate::{DocumentProfile, DEFAULT_HEADER_WINDOW};
use crate::inventory::{InitialCount, DEFAULT_STORAGE_LOCATION};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub intake: IntakeConfig,
    pub store: StoreConfig,
}

/// Knobs for turning a report into products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Leading characters searched for a marker phrase.
    pub header_window: usize,
    pub markers: Vec<String>,
    /// Words that mark a name line as a header/footer.
    pub blocklist: Vec<String>,
    /// Height of a line bucket in document units.
    pub y_tolerance: f32,
    pub initial_count: InitialCount,
    pub default_storage_location: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        let profile = DocumentProfile::default();
        Self {
            header_window: DEFAULT_HEADER_WINDOW,
            markers: profile.markers,
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| (*s).to_string()).collect(),
            y_tolerance: DEFAULT_Y_TOLERANCE,
            initial_count: InitialCount::Zero,
            default_storage_location: DEFAULT_STORAGE_LOCATION.to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.header_window == 0 {
            return Err(ReconError::Config("header_window must be at least 1".into()));
        }
        if self.markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ReconError::Config("at least one marker phrase is required".into()));
        }
        if !(self.y_tolerance > 0.0 && self.y_tolerance.is_finite()) {
            return Err(ReconError::Config(format!(
                "y_tolerance must be a positive number, got {}",
                self.y_tolerance
            )));
        }
        Ok(())
    }

    pub fn profile(&self) -> DocumentProfile {
        DocumentProfile {
            header_window: self.header_window,
            markers: self
                .markers
                .iter()
                .filter(|m| !m.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn extractor(&self) -> RecordExtractor {
        RecordExtractor::new(self.blocklist.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Where location collections are kept. Defaults to the user data dir.
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("stockrecon")
        })
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// and a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };
    if !required && !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;
    config
        .intake
        .validate()
        .with_context(|| format!("invalid intake settings in {}", path.display()))?;
    Ok(config)
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockrecon")
        .join("config.toml")
}
