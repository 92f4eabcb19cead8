//! Site configuration (config.yaml).

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::DataError;

/// Placeholder in `bio.intro` replaced by the number of puzzles in the feed.
pub const INTRO_COUNT_PLACEHOLDER: &str = "crossword_count";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid placeholder regex")
});

/// The four accent colors and the background color of the site theme.
///
/// Values are CSS color strings (hex, `rgb()`, `hsl()` or a named color).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(rename = "color-1")]
    pub color_1: String,

    #[serde(rename = "color-2")]
    pub color_2: String,

    #[serde(rename = "color-3")]
    pub color_3: String,

    #[serde(rename = "color-4")]
    pub color_4: String,

    pub background: String,
}

impl ThemeColors {
    /// Accent colors in `color-1`..`color-4` order.
    pub fn accents(&self) -> [&str; 4] {
        [&self.color_1, &self.color_2, &self.color_3, &self.color_4]
    }
}

/// The parsed site configuration.
///
/// The whole document is kept as a YAML value so that arbitrary display
/// fields reach the page template untouched.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    value: Value,
    theme_colors: ThemeColors,
}

impl SiteConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path).map_err(|e| DataError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration document from a string.
    pub fn from_yaml_str(source: &str) -> Result<Self, DataError> {
        Self::parse(source, "<string>")
    }

    fn parse(source: &str, origin: &str) -> Result<Self, DataError> {
        let value: Value = serde_yaml::from_str(source).map_err(|e| DataError::InvalidYaml {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        let colors = value
            .get("theme_colors")
            .cloned()
            .ok_or_else(|| DataError::ThemeColors {
                path: origin.to_string(),
                message: "missing theme_colors".to_string(),
            })?;

        let theme_colors: ThemeColors =
            serde_yaml::from_value(colors).map_err(|e| DataError::ThemeColors {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            value,
            theme_colors,
        })
    }

    /// The theme color set.
    pub fn theme_colors(&self) -> &ThemeColors {
        &self.theme_colors
    }

    /// The full configuration document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The `bio.intro` string, if present.
    pub fn intro(&self) -> Option<&str> {
        self.value.get("bio")?.get("intro")?.as_str()
    }

    /// Substitute `count` for `{crossword_count}` in `bio.intro`.
    ///
    /// Returns `false` and leaves the document untouched when there is no
    /// `bio.intro` string.
    pub fn apply_intro_count(&mut self, count: usize) -> bool {
        let Some(intro) = self
            .value
            .get_mut("bio")
            .and_then(|bio| bio.get_mut("intro"))
        else {
            return false;
        };

        let Some(text) = intro.as_str() else {
            return false;
        };

        let formatted = format_named(text, &[(INTRO_COUNT_PLACEHOLDER, count.to_string())]);
        *intro = Value::String(formatted);
        true
    }
}

/// Format-string style substitution of named `{placeholders}`.
///
/// `{{` and `}}` collapse to literal braces. Placeholders with no matching
/// name are kept as written.
pub fn format_named(template: &str, values: &[(&str, String)]) -> String {
    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
        Some(name) => values
            .iter()
            .find(|(key, _)| *key == name.as_str())
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| caps[0].to_string()),
        None if &caps[0] == "{{" => "{".to_string(),
        None => "}".to_string(),
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COLORS: &str = r##"theme_colors:
  color-1: "#e63946"
  color-2: "#f1c453"
  color-3: "#2a9d8f"
  color-4: "#264653"
  background: "#fdfcf7"
"##;

    #[test]
    fn parses_theme_colors() {
        let config = SiteConfig::from_yaml_str(COLORS).unwrap();

        assert_eq!(
            config.theme_colors().accents(),
            ["#e63946", "#f1c453", "#2a9d8f", "#264653"]
        );
        assert_eq!(config.theme_colors().background, "#fdfcf7");
    }

    #[test]
    fn errors_on_incomplete_theme_colors() {
        let source = "theme_colors:\n  color-1: red\n  color-2: blue\n";

        let result = SiteConfig::from_yaml_str(source);

        assert!(matches!(result, Err(DataError::ThemeColors { .. })));
    }

    #[test]
    fn errors_on_missing_theme_colors() {
        let result = SiteConfig::from_yaml_str("title: Hello\n");

        assert!(matches!(result, Err(DataError::ThemeColors { .. })));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = SiteConfig::from_yaml_str("theme_colors: [unclosed\n");

        assert!(matches!(result, Err(DataError::InvalidYaml { .. })));
    }

    #[test]
    fn keeps_other_display_fields() {
        let source = format!("{COLORS}title: My Puzzles\nlinks:\n  - name: Blog\n");
        let config = SiteConfig::from_yaml_str(&source).unwrap();

        assert_eq!(
            config.value().get("title").and_then(Value::as_str),
            Some("My Puzzles")
        );
        assert!(config.value().get("links").unwrap().is_sequence());
    }

    #[test]
    fn applies_intro_count() {
        let source = format!("{COLORS}bio:\n  intro: \"I have written {{crossword_count}} crosswords.\"\n");
        let mut config = SiteConfig::from_yaml_str(&source).unwrap();

        assert!(config.apply_intro_count(12));
        assert_eq!(config.intro(), Some("I have written 12 crosswords."));
    }

    #[test]
    fn leaves_intro_without_placeholder_unchanged() {
        let source = format!("{COLORS}bio:\n  intro: Hello there\n");
        let mut config = SiteConfig::from_yaml_str(&source).unwrap();

        config.apply_intro_count(3);

        assert_eq!(config.intro(), Some("Hello there"));
    }

    #[test]
    fn skips_missing_intro() {
        let source = format!("{COLORS}bio:\n  name: Someone\n");
        let mut config = SiteConfig::from_yaml_str(&source).unwrap();

        assert!(!config.apply_intro_count(3));
        assert!(config.intro().is_none());
    }

    #[test]
    fn formats_named_placeholders() {
        let values = [("crossword_count", "7".to_string())];

        assert_eq!(format_named("{crossword_count} total", &values), "7 total");
        assert_eq!(format_named("{{literal}} {crossword_count}", &values), "{literal} 7");
        assert_eq!(format_named("{unknown} stays", &values), "{unknown} stays");
    }
}
