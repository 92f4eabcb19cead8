//! Data feed pull command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tessera_sheets::{pull_feed, write_feed, ServiceAccount, SheetsClient, CREDENTIALS_ENV};

use crate::settings::load_settings;

/// Run the pull command.
pub fn run(root: &Path, settings_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(settings_path)?;
    let config = settings.pull_config(root, output)?;

    let account = ServiceAccount::from_env_value(std::env::var(CREDENTIALS_ENV).ok())?;
    let now = Utc::now();

    let client = SheetsClient::connect(&account, now).context("Failed to authenticate")?;
    let spreadsheet = client
        .open(&config.spreadsheet)
        .with_context(|| format!("Failed to open spreadsheet '{}'", config.spreadsheet))?;

    let feed = pull_feed(&spreadsheet, &config, now)?;
    write_feed(&config.output, &feed)?;

    tracing::info!("Pulled {} records into {}", feed.len(), config.output.display());

    Ok(())
}
