//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tessera_static::StaticBuilder;

use crate::settings::load_settings;

/// Run the build command.
pub fn run(
    root: &Path,
    settings_path: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building static site...");

    let settings = load_settings(settings_path)?;
    let config = settings.build_config(root, output, minify);

    let result = StaticBuilder::new(config).build()?;

    tracing::info!(
        "Built site from {} records ({} puzzles) with {} icons in {}ms",
        result.records,
        result.puzzles,
        result.icons,
        result.duration_ms
    );

    if !result.missing.is_empty() {
        tracing::warn!("{} declared static sources were missing", result.missing.len());
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
