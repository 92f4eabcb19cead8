//! Google Sheets access over the REST APIs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::ServiceAccount;
use crate::{PullError, Record};

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets.readonly https://www.googleapis.com/auth/drive.readonly";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// A source of worksheet rows keyed by the header row.
pub trait RowSource {
    /// All data rows of `worksheet`, as records keyed by column header.
    fn worksheet_records(&self, worksheet: &str) -> Result<Vec<Record>, PullError>;
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// An authenticated Sheets/Drive client.
pub struct SheetsClient {
    client: reqwest::blocking::Client,
    token: String,
}

impl SheetsClient {
    /// Exchange a signed service account assertion for an access token.
    pub fn connect(account: &ServiceAccount, now: DateTime<Utc>) -> Result<Self, PullError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &account.client_email,
            scope: SCOPES,
            aud: &account.token_uri,
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| PullError::Credentials(format!("invalid private key: {}", e)))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| PullError::Auth(e.to_string()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        let token: TokenResponse = client
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()?
            .error_for_status()
            .map_err(|e| PullError::Auth(e.to_string()))?
            .json()?;

        tracing::debug!("Authenticated as {}", account.client_email);

        Ok(Self {
            client,
            token: format!("Bearer {}", token.access_token),
        })
    }

    /// Find a spreadsheet by its exact title.
    pub fn open(&self, title: &str) -> Result<Spreadsheet<'_>, PullError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            title.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );

        let list: FileList = self
            .client
            .get(DRIVE_FILES_URL)
            .header("authorization", &self.token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| PullError::SpreadsheetNotFound(title.to_string()))?;

        tracing::info!("Opened spreadsheet '{}'", title);

        Ok(Spreadsheet {
            client: self,
            id: file.id,
        })
    }
}

/// An opened spreadsheet.
pub struct Spreadsheet<'a> {
    client: &'a SheetsClient,
    id: String,
}

impl Spreadsheet<'_> {
    fn values_url(&self, worksheet: &str) -> Result<Url, PullError> {
        let mut url = Url::parse(SHEETS_URL).map_err(|e| PullError::Request(e.to_string()))?;
        let range = format!("'{}'", worksheet.replace('\'', "''"));
        url.path_segments_mut()
            .map_err(|_| PullError::Request(format!("cannot extend {}", SHEETS_URL)))?
            .extend([self.id.as_str(), "values", range.as_str()]);
        Ok(url)
    }
}

impl RowSource for Spreadsheet<'_> {
    fn worksheet_records(&self, worksheet: &str) -> Result<Vec<Record>, PullError> {
        let range: ValueRange = self
            .client
            .client
            .get(self.values_url(worksheet)?)
            .header("authorization", &self.client.token)
            .query(&[
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("majorDimension", "ROWS"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        let records = rows_to_records(range.values);
        tracing::debug!("Read {} rows from worksheet '{}'", records.len(), worksheet);
        Ok(records)
    }
}

/// Turn a grid of cells into records keyed by the first row.
///
/// Short rows are padded with empty strings and numeric-looking cells become
/// JSON numbers.
pub fn rows_to_records(rows: Vec<Vec<Value>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    rows.map(|row| {
        let mut cells = row.into_iter();
        headers
            .iter()
            .map(|key| {
                let cell = cells.next().unwrap_or_else(|| Value::String(String::new()));
                (key.clone(), numericise(cell))
            })
            .collect()
    })
    .collect()
}

/// Convert a string cell holding an integer or finite float into a number.
pub fn numericise(cell: Value) -> Value {
    let Value::String(text) = cell else {
        return cell;
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::String(text);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cells(row: &[&str]) -> Vec<Value> {
        row.iter().map(|s| json!(s)).collect()
    }

    #[test]
    fn keys_rows_by_header() {
        let records = rows_to_records(vec![
            cells(&["title", "publish date", "payment"]),
            cells(&["Themeless", "1/7/2024", "150"]),
            cells(&["Midi"]),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"title": "Themeless", "publish date": "1/7/2024", "payment": 150})
        );
        assert_eq!(
            Value::Object(records[1].clone()),
            json!({"title": "Midi", "publish date": "", "payment": ""})
        );
    }

    #[test]
    fn empty_sheet_has_no_records() {
        assert!(rows_to_records(Vec::new()).is_empty());
        assert!(rows_to_records(vec![cells(&["title"])]).is_empty());
    }

    #[test]
    fn numericises_only_numbers() {
        assert_eq!(numericise(json!("42")), json!(42));
        assert_eq!(numericise(json!("2.5")), json!(2.5));
        assert_eq!(numericise(json!("1/7/2024")), json!("1/7/2024"));
        assert_eq!(numericise(json!("nan")), json!("nan"));
        assert_eq!(numericise(json!("")), json!(""));
        assert_eq!(numericise(json!(true)), json!(true));
    }
}
