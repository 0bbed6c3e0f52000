//! Core types: the canonical record, raw source rows, and source identity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A normalised grant or subsidy listing.
///
/// Every field is a plain string. Missing source data becomes `""`,
/// never an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Programme title. Non-empty for every record in a served catalog.
    pub title: String,
    /// Region or issuing agency.
    pub region: String,
    /// Eligible applicants.
    pub target: String,
    /// Industry or category.
    pub industry: String,
    /// Budget, free text.
    pub budget: String,
    /// Kind of benefit (grant, voucher, loan, ...).
    pub benefit_type: String,
    /// Application deadline or period, free text.
    pub deadline: String,
    /// Absolute URL of the announcement.
    pub link: String,
    /// Short description.
    pub summary: String,
    /// Extra search keywords.
    pub keywords: String,
}

impl Record {
    /// All ten fields in canonical order.
    pub fn fields(&self) -> [&str; 10] {
        [
            &self.title,
            &self.region,
            &self.target,
            &self.industry,
            &self.budget,
            &self.benefit_type,
            &self.deadline,
            &self.link,
            &self.summary,
            &self.keywords,
        ]
    }

    /// Whether the title contains anything besides whitespace.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// A source-specific row before normalisation.
///
/// Keys are whatever the source used (English or localised column
/// names); values are strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(key.into(), value.into());
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Build a row from a JSON object.
    ///
    /// Strings are taken as-is, numbers and booleans are rendered with
    /// their JSON text, and `null`, arrays and nested objects are
    /// skipped.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut row = Self::new();
        for (key, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            row.insert(key.clone(), text);
        }
        row
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// The data sources feeding the catalog.
///
/// Variant order is merge precedence: rows from earlier sources come
/// first in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Spreadsheet API, curated by the operator.
    Sheet,
    /// Published CSV export.
    Csv,
    /// Local JSON snapshot file.
    LocalSnapshot,
    /// Live scraping of listing pages.
    Web,
}

impl SourceKind {
    /// Returns the short name of this source used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sheet => "sheet",
            Self::Csv => "csv",
            Self::LocalSnapshot => "snapshot",
            Self::Web => "web",
        }
    }

    /// Merge rank; lower values are concatenated first.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Sheet => 0,
            Self::Csv => 1,
            Self::LocalSnapshot => 2,
            Self::Web => 3,
        }
    }

    /// Returns all source variants in precedence order.
    pub fn all() -> &'static [SourceKind] {
        &[Self::Sheet, Self::Csv, Self::LocalSnapshot, Self::Web]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional narrowing applied before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Substring required in the record's `industry` field.
    pub category: Option<String>,
    /// Substring required in the record's `target` field.
    pub target: Option<String>,
}

/// Result of a catalog search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Without a query: size of the filtered catalog. With a query: number
    /// of records scoring above zero. Counted before truncation either way.
    pub matched_count: usize,
    /// At most `limit` records.
    pub results: Vec<Record>,
}
