//! Pulls the tessera data feed from a spreadsheet.
//!
//! Rows of the puzzle and misc worksheets are normalized, filtered to those
//! already published, merged newest first and written as the JSON feed the
//! site build reads.

pub mod client;
pub mod credentials;
pub mod normalize;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub use chrono_tz::Tz;
pub use client::{numericise, rows_to_records, RowSource, SheetsClient, Spreadsheet};
pub use credentials::{ServiceAccount, CREDENTIALS_ENV};
pub use normalize::{
    is_publishable, merge_feed, normalize_row, parse_publish_date, Category, NormalizedRow,
    PAYMENT_FIELD, PUBLISH_DATE_FIELD,
};
pub use tessera_data::Record;

/// Errors that can occur while pulling the feed.
#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error("{0} environment variable is not set")]
    MissingCredentials(String),

    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spreadsheet request failed: {0}")]
    Request(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Worksheet '{worksheet}' row {row}: missing '{field}'")]
    MissingField {
        worksheet: String,
        row: usize,
        field: String,
    },

    #[error("Worksheet '{worksheet}' row {row}: invalid publish date {value:?}: {message}")]
    InvalidDate {
        worksheet: String,
        row: usize,
        value: String,
        message: String,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Where to pull the feed from and where to write it.
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// Spreadsheet title
    pub spreadsheet: String,

    /// Worksheet of puzzles
    pub puzzle_worksheet: String,

    /// Worksheet of other items
    pub misc_worksheet: String,

    /// Time zone deciding which calendar day it is
    pub timezone: Tz,

    /// Feed file to write
    pub output: PathBuf,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            spreadsheet: "published crosswords".to_string(),
            puzzle_worksheet: "all".to_string(),
            misc_worksheet: "misc".to_string(),
            timezone: chrono_tz::America::New_York,
            output: PathBuf::from("data.json"),
        }
    }
}

/// Build the feed from a row source as of `now`.
pub fn pull_feed<S: RowSource + ?Sized>(
    source: &S,
    config: &PullConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Record>, PullError> {
    let puzzles = published_rows(
        source,
        &config.puzzle_worksheet,
        Category::Puzzle,
        config.timezone,
        now,
    )?;
    let misc = published_rows(
        source,
        &config.misc_worksheet,
        Category::Misc,
        config.timezone,
        now,
    )?;

    Ok(merge_feed(puzzles, misc))
}

fn published_rows<S: RowSource + ?Sized>(
    source: &S,
    worksheet: &str,
    category: Category,
    timezone: Tz,
    now: DateTime<Utc>,
) -> Result<Vec<NormalizedRow>, PullError> {
    let records = source.worksheet_records(worksheet)?;
    let total = records.len();

    let rows = records
        .into_iter()
        .enumerate()
        // Data starts on sheet row 2, below the header.
        .map(|(i, record)| normalize_row(record, category, worksheet, i + 2))
        .collect::<Result<Vec<_>, _>>()?;

    let published: Vec<NormalizedRow> = rows
        .into_iter()
        .filter(|row| is_publishable(row.date, now, timezone))
        .collect();

    tracing::info!(
        "Worksheet '{}': {} of {} rows published",
        worksheet,
        published.len(),
        total
    );

    Ok(published)
}

/// Write records as a JSON array indented by four spaces, replacing `path`.
pub fn write_feed(path: &Path, records: &[Record]) -> Result<(), PullError> {
    let write_error = |message: String| PullError::Write {
        path: path.display().to_string(),
        message,
    };

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut serializer)
        .map_err(|e| write_error(e.to_string()))?;

    fs::write(path, buf).map_err(|e| write_error(e.to_string()))?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct FakeSheet {
        worksheets: HashMap<String, Vec<Record>>,
    }

    impl RowSource for FakeSheet {
        fn worksheet_records(&self, worksheet: &str) -> Result<Vec<Record>, PullError> {
            self.worksheets
                .get(worksheet)
                .cloned()
                .ok_or_else(|| PullError::Request(format!("no worksheet {}", worksheet)))
        }
    }

    fn records(value: Value) -> Vec<Record> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => map,
                    _ => panic!("expected object"),
                })
                .collect(),
            _ => panic!("expected array"),
        }
    }

    fn sheet() -> FakeSheet {
        let mut worksheets = HashMap::new();
        worksheets.insert(
            "all".to_string(),
            records(json!([
                {"title": "Old puzzle", "publish date": "1/5/2024", "payment": 100},
                {"title": "Future puzzle", "publish date": "4/1/2024", "payment": 100},
                {"title": "Today puzzle", "publish date": "3/14/2024", "payment": 150},
            ])),
        );
        worksheets.insert(
            "misc".to_string(),
            records(json!([
                {"title": "Interview", "publish date": "2/20/2024"},
                {"title": "Future essay", "publish date": "3/15/2024"},
            ])),
        );
        FakeSheet { worksheets }
    }

    fn now() -> DateTime<Utc> {
        // 2024-03-14 23:00 in New York
        Utc.with_ymd_and_hms(2024, 3, 15, 3, 0, 0).unwrap()
    }

    #[test]
    fn keeps_only_published_rows_newest_first() {
        let feed = pull_feed(&sheet(), &PullConfig::default(), now()).unwrap();

        let titles: Vec<&str> = feed.iter().map(|r| r["title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["Today puzzle", "Interview", "Old puzzle"]);

        let dates: Vec<&str> = feed.iter().filter_map(tessera_data::record_date).collect();
        assert_eq!(dates, ["2024-03-14", "2024-02-20", "2024-01-05"]);
    }

    #[test]
    fn tags_categories_and_strips_payment() {
        let feed = pull_feed(&sheet(), &PullConfig::default(), now()).unwrap();

        for record in &feed {
            let category = record["category"].as_str().unwrap();
            assert!(category == "puzzle" || category == "misc");
            if category == "puzzle" {
                assert!(!record.contains_key(PAYMENT_FIELD));
            }
        }
    }

    #[test]
    fn propagates_source_errors() {
        let config = PullConfig {
            misc_worksheet: "extras".to_string(),
            ..Default::default()
        };

        let result = pull_feed(&sheet(), &config, now());

        assert!(matches!(result, Err(PullError::Request(_))));
    }

    #[test]
    fn writes_indented_feed_that_the_build_can_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.json");
        let feed = pull_feed(&sheet(), &PullConfig::default(), now()).unwrap();

        write_feed(&path, &feed).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"title\""));

        let loaded = tessera_data::Feed::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.puzzle_count(), 2);
        assert_eq!(loaded.records(), feed.as_slice());
        assert_eq!(tessera_data::record_date(&loaded.records()[0]), Some("2024-03-14"));
    }

    #[test]
    fn writes_empty_feed_that_the_build_can_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, "stale").unwrap();

        write_feed(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(tessera_data::Feed::load(&path).unwrap().is_empty());
    }
}
