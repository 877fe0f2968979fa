//! Worker roster entries, read-only to this crate.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Short identifier stamped on reviews and assignments.
    pub code: String,
    pub display_name: String,
    /// Display hint for the review table.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub role: String,
}

impl Worker {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            color: String::new(),
            role: String::new(),
        }
    }

    /// Workers whose role matches `role`, case-insensitively, in roster order.
    pub fn filter_by_role(workers: &[Worker], role: &str) -> Vec<Worker> {
        workers
            .iter()
            .filter(|w| w.role.eq_ignore_ascii_case(role))
            .cloned()
            .collect()
    }
}

/// Load a roster from a JSON array of workers.
pub fn load_roster(path: &Path) -> Result<Vec<Worker>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid roster JSON in {}", path.display()))
}
