//! Project layout file (tessera.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tessera_sheets::{PullConfig, Tz};
use tessera_static::BuildConfig;

/// Configuration file structure (tessera.toml).
#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub pull: PullSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_config")]
    pub config: String,
    #[serde(default = "default_data")]
    pub data: String,
    #[serde(default = "default_templates")]
    pub templates: String,
    #[serde(default = "default_index_template")]
    pub index_template: String,
    #[serde(default = "default_styles")]
    pub styles: String,
    #[serde(default = "default_stylesheet_template")]
    pub stylesheet_template: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_og_image")]
    pub og_image: String,
    #[serde(default = "default_static_dirs")]
    pub static_dirs: Vec<String>,
    /// Defaults to the data feed and the preview image
    #[serde(default)]
    pub static_files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BuildSettings {
    #[serde(default)]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
pub struct PullSettings {
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: String,
    /// Puzzle and misc worksheet names, in that order
    #[serde(default = "default_worksheets")]
    pub worksheets: (String, String),
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_data")]
    pub output: String,
}

fn default_config() -> String {
    "config.yaml".to_string()
}
fn default_data() -> String {
    "data.json".to_string()
}
fn default_templates() -> String {
    "templates".to_string()
}
fn default_index_template() -> String {
    "index.html.jinja".to_string()
}
fn default_styles() -> String {
    "styles".to_string()
}
fn default_stylesheet_template() -> String {
    "styles.css".to_string()
}
fn default_output() -> String {
    "_site".to_string()
}
fn default_og_image() -> String {
    "og-image.png".to_string()
}
fn default_static_dirs() -> Vec<String> {
    vec!["js".to_string(), "assets".to_string()]
}
fn default_spreadsheet() -> String {
    "published crosswords".to_string()
}
fn default_worksheets() -> (String, String) {
    ("all".to_string(), "misc".to_string())
}
fn default_timezone() -> String {
    "America/New_York".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            config: default_config(),
            data: default_data(),
            templates: default_templates(),
            index_template: default_index_template(),
            styles: default_styles(),
            stylesheet_template: default_stylesheet_template(),
            output: default_output(),
            og_image: default_og_image(),
            static_dirs: default_static_dirs(),
            static_files: None,
        }
    }
}

impl Default for PullSettings {
    fn default() -> Self {
        Self {
            spreadsheet: default_spreadsheet(),
            worksheets: default_worksheets(),
            timezone: default_timezone(),
            output: default_data(),
        }
    }
}

/// Load settings from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load_settings(path: &Path) -> Result<SettingsFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: SettingsFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded settings from {}", path.display());
        return Ok(settings);
    }
    Ok(SettingsFile::default())
}

impl SettingsFile {
    /// Files copied into the output root.
    pub fn static_files(&self) -> Vec<String> {
        let site = &self.site;
        site.static_files
            .clone()
            .unwrap_or_else(|| vec![site.data.clone(), site.og_image.clone()])
    }

    /// Build configuration rooted at `root`, with CLI overrides applied.
    pub fn build_config(
        &self,
        root: &Path,
        output: Option<PathBuf>,
        minify: Option<bool>,
    ) -> BuildConfig {
        let site = &self.site;

        BuildConfig {
            root: root.to_path_buf(),
            config_file: PathBuf::from(&site.config),
            data_file: PathBuf::from(&site.data),
            templates_dir: PathBuf::from(&site.templates),
            index_template: site.index_template.clone(),
            styles_dir: PathBuf::from(&site.styles),
            stylesheet_template: site.stylesheet_template.clone(),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&site.output)),
            og_image: PathBuf::from(&site.og_image),
            static_dirs: site.static_dirs.iter().map(PathBuf::from).collect(),
            static_files: self.static_files().into_iter().map(PathBuf::from).collect(),
            minify: minify.unwrap_or(self.build.minify),
            ..Default::default()
        }
    }

    /// Pull configuration rooted at `root`, with the CLI output override applied.
    pub fn pull_config(&self, root: &Path, output: Option<PathBuf>) -> Result<PullConfig> {
        let pull = &self.pull;
        let timezone = pull
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid time zone {:?}: {}", pull.timezone, e))?;

        Ok(PullConfig {
            spreadsheet: pull.spreadsheet.clone(),
            puzzle_worksheet: pull.worksheets.0.clone(),
            misc_worksheet: pull.worksheets.1.clone(),
            timezone,
            output: root.join(output.unwrap_or_else(|| PathBuf::from(&pull.output))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_settings_file() {
        let temp = tempdir().unwrap();

        let settings = load_settings(&temp.path().join("tessera.toml")).unwrap();
        let build = settings.build_config(temp.path(), None, None);

        assert_eq!(build.output_dir, PathBuf::from("_site"));
        assert_eq!(build.static_dirs, vec![PathBuf::from("js"), PathBuf::from("assets")]);
        assert!(!build.minify);

        let pull = settings.pull_config(temp.path(), None).unwrap();
        assert_eq!(pull.spreadsheet, "published crosswords");
        assert_eq!(pull.timezone.name(), "America/New_York");
        assert_eq!(pull.output, temp.path().join("data.json"));
    }

    #[test]
    fn applies_settings_and_overrides() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(
            &path,
            r#"
[site]
output = "public"
static_dirs = ["js"]

[build]
minify = true

[pull]
worksheets = ["puzzles", "extras"]
timezone = "Europe/London"
"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        let build = settings.build_config(temp.path(), None, None);
        assert_eq!(build.output_dir, PathBuf::from("public"));
        assert_eq!(build.static_dirs, vec![PathBuf::from("js")]);
        assert!(build.minify);

        let overridden = settings.build_config(temp.path(), Some(PathBuf::from("dist")), Some(false));
        assert_eq!(overridden.output_dir, PathBuf::from("dist"));
        assert!(!overridden.minify);

        let pull = settings.pull_config(temp.path(), None).unwrap();
        assert_eq!(pull.puzzle_worksheet, "puzzles");
        assert_eq!(pull.misc_worksheet, "extras");
        assert_eq!(pull.timezone.name(), "Europe/London");
    }

    #[test]
    fn static_files_follow_renamed_feed_and_preview() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(
            &path,
            r#"
[site]
data = "feed/records.json"
og_image = "preview.png"
"#,
        )
        .unwrap();

        let build = load_settings(&path).unwrap().build_config(temp.path(), None, None);

        assert_eq!(build.data_file, PathBuf::from("feed/records.json"));
        assert_eq!(
            build.static_files,
            vec![PathBuf::from("feed/records.json"), PathBuf::from("preview.png")]
        );
    }

    #[test]
    fn explicit_static_files_replace_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(&path, "[site]\nstatic_files = [\"robots.txt\"]\n").unwrap();

        let build = load_settings(&path).unwrap().build_config(temp.path(), None, None);

        assert_eq!(build.static_files, vec![PathBuf::from("robots.txt")]);
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let settings = SettingsFile {
            pull: PullSettings {
                timezone: "Mars/Olympus".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(settings.pull_config(Path::new("."), None).is_err());
    }

    #[test]
    fn errors_on_malformed_settings() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(&path, "[site\noutput = ").unwrap();

        assert!(load_settings(&path).is_err());
    }
}
