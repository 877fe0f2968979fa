//! Product record extraction from reconstructed report lines.
//!
//! The grammar pairs two consecutive lines:
//!
//! ```text
//! ABC123 *            <- code line: 2+ uppercase letters + digits (+ marker), or a bare digit run
//! Tornillo hex 3/8 40 <- name line: free text ending in an integer quantity
//! ```
//!
//! A code followed by a name and quantity on the same line (`ABC123 Widget 5`)
//! is a one-line row and stands alone. Any other line is skipped without
//! error. Dates (`dd/mm/yyyy`, `dd-mm-yyyy`) are picked up from every line;
//! the last one seen becomes the report date.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::ReconstructedLine;
use crate::error::{ReconError, Result};

static CODE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<code>[A-Z]{2,}\d+(?:\s*\*+)?|\d+)(?:\s|$)").unwrap()
});

static NAME_QUANTITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>.*\S)\s+(?P<qty>\d+)$").unwrap());

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<d>\d{1,2})[/-](?P<m>\d{1,2})[/-](?P<y>\d{4})\b").unwrap()
});

/// Header/footer words that disqualify a name line.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "SUCURSAL", "BRANCH", "REPORTE", "REPORT", "PAGINA", "PÁGINA", "PAGE",
];

/// A product row as printed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Code as printed, possibly with a trailing marker such as `*`.
    pub code: String,
    pub name: String,
    pub quantity: u32,
}

/// Records in emission order plus the report date found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ParsedRecord>,
    /// Last date seen in the document, if any.
    pub report_date: Option<NaiveDate>,
}

impl Extraction {
    /// Report date, or `fallback` when the document carried none.
    pub fn report_date_or(&self, fallback: NaiveDate) -> NaiveDate {
        self.report_date.unwrap_or(fallback)
    }
}

/// Line-pairing record extractor.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    /// Uppercase words; a name line containing any of them is not a product.
    blocklist: Vec<String>,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKLIST.iter().map(|s| (*s).to_string()))
    }
}

impl RecordExtractor {
    pub fn new(blocklist: impl IntoIterator<Item = String>) -> Self {
        Self {
            blocklist: blocklist.into_iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    /// Walk `lines` and emit every code/name pair.
    ///
    /// Returns [`ReconError::NoRecordsFound`] when nothing matched.
    pub fn extract(&self, lines: &[ReconstructedLine]) -> Result<Extraction> {
        let report_date = lines.iter().filter_map(|l| last_date(&l.text)).last();

        let mut records = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let Some((code, rest)) = split_code(&lines[i].text) else {
                i += 1;
                continue;
            };

            let (row, consumed) = match match_name_quantity(rest) {
                Some(row) => (row, 1),
                _ => match lines.get(i + 1).and_then(|l| match_name_quantity(&l.text)) {
                    Some(row) => (row, 2),
                    None => {
                        i += 1;
                        continue;
                    }
                },
            };

            let (name, quantity) = row;
            if self.is_blocked(&name) {
                debug!(line = i, %name, "skipping header-like row");
            } else {
                records.push(ParsedRecord {
                    code,
                    name,
                    quantity,
                });
            }
            i += consumed;
        }

        if records.is_empty() {
            return Err(ReconError::NoRecordsFound);
        }

        Ok(Extraction {
            records,
            report_date,
        })
    }

    fn is_blocked(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        upper
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| self.blocklist.iter().any(|blocked| blocked == word))
    }
}

/// Leading product code of a line, marker included.
pub fn match_code(line: &str) -> Option<String> {
    split_code(line).map(|(code, _)| code)
}

/// Leading product code and the trimmed text after it.
fn split_code(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    let code = CODE_LINE.captures(line)?.name("code")?;
    Some((code.as_str().to_string(), line[code.end()..].trim()))
}

/// Name and trailing quantity of a line.
///
/// Quantities that overflow `u32` are treated as a non-match.
pub fn match_name_quantity(line: &str) -> Option<(String, u32)> {
    let caps = NAME_QUANTITY_LINE.captures(line.trim())?;
    let quantity = caps["qty"].parse().ok()?;
    Some((caps["name"].to_string(), quantity))
}

/// Last valid calendar date in `text`.
fn last_date(text: &str) -> Option<NaiveDate> {
    DATE.captures_iter(text)
        .filter_map(|caps| {
            NaiveDate::from_ymd_opt(
                caps["y"].parse().ok()?,
                caps["m"].parse().ok()?,
                caps["d"].parse().ok()?,
            )
        })
        .last()
}
