//! Row normalization and publication filtering.
//!
//! Everything here is a pure function of its inputs so the feed logic can be
//! tested without a spreadsheet.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::{PullError, Record};

/// Column holding the scheduled publication date, as `month/day/year`.
pub const PUBLISH_DATE_FIELD: &str = "publish date";

/// Column removed from puzzle rows.
pub const PAYMENT_FIELD: &str = "payment";

const PUBLISH_DATE_FORMAT: &str = "%m/%d/%Y";

/// Category tag attached to each worksheet's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Puzzle,
    Misc,
}

impl Category {
    /// Tag written to the `category` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Puzzle => "puzzle",
            Category::Misc => "misc",
        }
    }
}

/// A normalized row together with its parsed date.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub record: Record,
}

/// Parse a `month/day/year` publish date.
pub fn parse_publish_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), PUBLISH_DATE_FORMAT)
}

/// Whether a row dated `date` is published at `now` in time zone `tz`.
///
/// A row is published from local midnight of its date onward.
pub fn is_publishable(date: NaiveDate, now: DateTime<Utc>, tz: Tz) -> bool {
    date <= now.with_timezone(&tz).date_naive()
}

/// Normalize a row: add the ISO `date`, drop `payment` from puzzles, tag the category.
///
/// `row` is the sheet row number, used in error messages.
pub fn normalize_row(
    record: Record,
    category: Category,
    worksheet: &str,
    row: usize,
) -> Result<NormalizedRow, PullError> {
    let raw = match record.get(PUBLISH_DATE_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(PullError::MissingField {
                worksheet: worksheet.to_string(),
                row,
                field: PUBLISH_DATE_FIELD.to_string(),
            })
        }
    };

    let date = parse_publish_date(&raw).map_err(|e| PullError::InvalidDate {
        worksheet: worksheet.to_string(),
        row,
        value: raw.clone(),
        message: e.to_string(),
    })?;

    let mut record: Record = match category {
        Category::Puzzle => record
            .into_iter()
            .filter(|(key, _)| key != PAYMENT_FIELD)
            .collect(),
        Category::Misc => record,
    };

    record.insert(
        "date".to_string(),
        Value::String(date.format("%Y-%m-%d").to_string()),
    );
    record.insert(
        "category".to_string(),
        Value::String(category.as_str().to_string()),
    );

    Ok(NormalizedRow { date, record })
}

/// Concatenate puzzle and misc rows, newest first.
///
/// Rows sharing a date keep their relative order.
pub fn merge_feed(puzzles: Vec<NormalizedRow>, misc: Vec<NormalizedRow>) -> Vec<Record> {
    let mut rows: Vec<NormalizedRow> = puzzles.into_iter().chain(misc).collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.into_iter().map(|row| row.record).collect()
}
