//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;

use tessera_assets::{
    ensure_preview, generate_icons, AssetError, Palette, PreviewOutcome, PreviewSpec,
    PREVIEW_FILENAME,
};
use tessera_data::{load_site_data, DataError, ThemeColors};

use crate::copier::{copy_static, overlapping_source, reset_output_dir};
use crate::css::minify_css;
use crate::templates::TemplateEngine;

/// Configuration for building the site.
///
/// Relative paths are resolved against `root`.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root
    pub root: PathBuf,

    /// Site configuration (YAML)
    pub config_file: PathBuf,

    /// Data feed (JSON)
    pub data_file: PathBuf,

    /// HTML template directory
    pub templates_dir: PathBuf,

    /// Page template name inside `templates_dir`
    pub index_template: String,

    /// Stylesheet template directory
    pub styles_dir: PathBuf,

    /// Stylesheet template name inside `styles_dir`
    pub stylesheet_template: String,

    /// Output directory, recreated on every build
    pub output_dir: PathBuf,

    /// Preview image, generated at the project root when missing
    pub og_image: PathBuf,

    /// Directories copied verbatim into the output
    pub static_dirs: Vec<PathBuf>,

    /// Files copied into the output root
    pub static_files: Vec<PathBuf>,

    /// Minify the rendered stylesheet
    pub minify: bool,

    /// Preview image geometry
    pub preview: PreviewSpec,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            config_file: PathBuf::from("config.yaml"),
            data_file: PathBuf::from("data.json"),
            templates_dir: PathBuf::from("templates"),
            index_template: "index.html.jinja".to_string(),
            styles_dir: PathBuf::from("styles"),
            stylesheet_template: "styles.css".to_string(),
            output_dir: PathBuf::from("_site"),
            og_image: PathBuf::from(PREVIEW_FILENAME),
            static_dirs: vec![PathBuf::from("js"), PathBuf::from("assets")],
            static_files: vec![PathBuf::from("data.json"), PathBuf::from(PREVIEW_FILENAME)],
            minify: false,
            preview: PreviewSpec::default(),
        }
    }
}

impl BuildConfig {
    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Project paths the build reads, relative to `root`.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        [
            &self.config_file,
            &self.data_file,
            &self.templates_dir,
            &self.styles_dir,
            &self.og_image,
        ]
        .into_iter()
        .chain(&self.static_dirs)
        .chain(&self.static_files)
        .cloned()
        .collect()
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of records in the feed
    pub records: usize,

    /// Number of puzzle records in the feed
    pub puzzles: usize,

    /// Number of icon files written, including the `.ico`
    pub icons: usize,

    /// Whether the preview image was generated or kept
    pub preview: PreviewOutcome,

    /// Whether the stylesheet was rendered
    pub stylesheet: bool,

    /// Number of static directories and files copied
    pub copied: usize,

    /// Declared static sources that were not found
    pub missing: Vec<PathBuf>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Refusing to clear output directory {output}: it contains {path}")]
    UnsafeOutputDir { output: String, path: String },
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let templates = TemplateEngine::new(
            &config.resolve(&config.templates_dir),
            &config.resolve(&config.styles_dir),
        );

        Self { config, templates }
    }

    /// Build the site, coloring preview cells from the thread RNG.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    /// Build the site with an explicit random source for the preview image.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = self.config.resolve(&self.config.output_dir);

        let overlap = overlapping_source(&self.config.root, &output_dir, &self.config.source_paths())
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_dir.display(), e)))?;
        if let Some(path) = overlap {
            return Err(BuildError::UnsafeOutputDir {
                output: output_dir.display().to_string(),
                path: path.display().to_string(),
            });
        }

        reset_output_dir(&output_dir).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let data = load_site_data(
            &self.config.resolve(&self.config.config_file),
            &self.config.resolve(&self.config.data_file),
        )?;

        let theme = data.config.theme_colors();
        tracing::info!("Using theme colors: {:?}", theme.accents());
        let palette = Palette::from_theme(theme)?;

        // Icons
        let icons = generate_icons(&palette, &output_dir)?;

        // Preview image
        let preview = ensure_preview(
            &self.config.resolve(&self.config.og_image),
            &self.config.preview,
            &palette,
            |path| path.exists(),
            rng,
        )?;

        // Page
        let html = self
            .templates
            .render_index(&self.config.index_template, &data.config)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", self.config.index_template, e)))?;
        let index_path = output_dir.join("index.html");
        fs::write(&index_path, html)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", index_path.display(), e)))?;
        tracing::info!("Rendered index.html");

        // Stylesheet
        let stylesheet = match self.write_stylesheet(theme, &output_dir) {
            Ok(path) => {
                tracing::info!("Rendered {} with theme colors", path.display());
                true
            }
            Err(e) => {
                tracing::warn!("Error processing CSS template: {}", e);
                false
            }
        };

        // Static copies
        let copies = copy_static(
            &self.config.root,
            &output_dir,
            &self.config.static_dirs,
            &self.config.static_files,
        )
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(BuildResult {
            records: data.feed.len(),
            puzzles: data.feed.puzzle_count(),
            icons: icons.pngs.len() + usize::from(icons.ico.is_some()),
            preview,
            stylesheet,
            copied: copies.copied.len(),
            missing: copies.missing,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir,
        })
    }

    /// Render the stylesheet into `styles/` under the output directory.
    fn write_stylesheet(&self, theme: &ThemeColors, output_dir: &Path) -> Result<PathBuf, BuildError> {
        let css = self
            .templates
            .render_stylesheet(&self.config.stylesheet_template, theme)
            .map_err(|e| {
                BuildError::TemplateError(format!("{}: {}", self.config.stylesheet_template, e))
            })?;

        let css = if self.config.minify {
            minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css
            })
        } else {
            css
        };

        let styles_dir = output_dir.join("styles");
        fs::create_dir_all(&styles_dir)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", styles_dir.display(), e)))?;

        let path = styles_dir.join("styles.css");
        fs::write(&path, css)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))?;

        Ok(path)
    }
}
