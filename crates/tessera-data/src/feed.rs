//! The JSON data feed (data.json).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::DataError;

/// Category tag for crossword puzzle records.
pub const PUZZLE_CATEGORY: &str = "puzzle";

/// Category tag for everything else.
pub const MISC_CATEGORY: &str = "misc";

/// One feed record. Field order is preserved as written.
pub type Record = Map<String, Value>;

/// Category of a record, if it has a string `category` field.
pub fn record_category(record: &Record) -> Option<&str> {
    record.get("category").and_then(Value::as_str)
}

/// ISO date of a record, if it has a string `date` field.
pub fn record_date(record: &Record) -> Option<&str> {
    record.get("date").and_then(Value::as_str)
}

/// The list of records shown on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    records: Vec<Record>,
}

impl Feed {
    /// Create a feed from records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Read and parse a feed file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path).map_err(|e| DataError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a feed from a JSON string.
    pub fn from_json_str(source: &str) -> Result<Self, DataError> {
        Self::parse(source, "<string>")
    }

    fn parse(source: &str, origin: &str) -> Result<Self, DataError> {
        let records: Vec<Record> =
            serde_json::from_str(source).map_err(|e| DataError::InvalidJson {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { records })
    }

    /// All records in feed order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the feed has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records tagged with `category`.
    pub fn count_category(&self, category: &str) -> usize {
        self.records
            .iter()
            .filter(|r| record_category(r) == Some(category))
            .count()
    }

    /// Number of puzzle records.
    pub fn puzzle_count(&self) -> usize {
        self.count_category(PUZZLE_CATEGORY)
    }
}
