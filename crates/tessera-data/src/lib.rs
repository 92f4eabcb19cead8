//! Site configuration and data feed loading.
//!
//! This crate reads the YAML site configuration and the JSON record feed, and
//! derives the values the page template needs from them.

pub mod config;
pub mod feed;

use std::path::Path;

pub use config::{format_named, SiteConfig, ThemeColors, INTRO_COUNT_PLACEHOLDER};
pub use feed::{record_category, record_date, Feed, Record, MISC_CATEGORY, PUZZLE_CATEGORY};

/// Errors that can occur while loading site data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in {path}: {message}")]
    InvalidYaml { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("Invalid theme_colors in {path}: {message}")]
    ThemeColors { path: String, message: String },
}

/// Configuration and feed loaded for one build.
#[derive(Debug, Clone)]
pub struct SiteData {
    /// Site configuration with the intro count already applied
    pub config: SiteConfig,

    /// Records from the data feed
    pub feed: Feed,
}

/// Load the configuration and feed, and substitute the puzzle count into `bio.intro`.
pub fn load_site_data(config_path: &Path, data_path: &Path) -> Result<SiteData, DataError> {
    let mut config = SiteConfig::load(config_path)?;
    let feed = Feed::load(data_path)?;

    let count = feed.puzzle_count();
    if config.apply_intro_count(count) {
        tracing::debug!("Substituted puzzle count {} into bio.intro", count);
    }

    tracing::info!(
        "Loaded {} records ({} puzzles) from {}",
        feed.len(),
        count,
        data_path.display()
    );

    Ok(SiteData { config, feed })
}
