//! Initialize a site in a project directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `tessera init`, relative to the project root.
const SCAFFOLD: [(&str, &str); 6] = [
    ("tessera.toml", DEFAULT_SETTINGS),
    ("config.yaml", DEFAULT_CONFIG),
    ("data.json", DEFAULT_DATA),
    ("templates/index.html.jinja", DEFAULT_INDEX),
    ("styles/styles.css", DEFAULT_STYLES),
    ("js/main.js", DEFAULT_JS),
];

/// Run the init command.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing tessera in {}...", root.display());

    fs::create_dir_all(root.join("assets")).context("Failed to create assets directory")?;

    for (relative, content) in SCAFFOLD {
        let path = root.join(relative);

        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", relative))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'tessera build' to build the site into _site/.");

    Ok(())
}

const DEFAULT_SETTINGS: &str = r#"# Tessera Configuration

[site]
# Site configuration and data feed
config = "config.yaml"
data = "data.json"

# Template roots
templates = "templates"
index_template = "index.html.jinja"
styles = "styles"
stylesheet_template = "styles.css"

# Output directory, recreated on every build
output = "_site"

# Preview image, generated when missing
og_image = "og-image.png"

# Copied verbatim into the output. static_files defaults to the data feed
# and the preview image.
static_dirs = ["js", "assets"]
# static_files = ["data.json", "og-image.png"]

[build]
# Minify the rendered stylesheet
minify = false

[pull]
spreadsheet = "published crosswords"
worksheets = ["all", "misc"]
timezone = "America/New_York"
output = "data.json"
"#;

const DEFAULT_CONFIG: &str = r##"title: My Puzzles
description: Crosswords and other things.
url: https://example.com

theme_colors:
  color-1: "#e63946"
  color-2: "#f1c453"
  color-3: "#2a9d8f"
  color-4: "#264653"
  background: "#fdfcf7"

bio:
  name: Your Name
  intro: |
    I make crosswords. So far I have published **{crossword_count}** of them.
    Find me on [my blog](https://example.com/blog).
"##;

const DEFAULT_DATA: &str = "[]";

const DEFAULT_INDEX: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ config.title }}</title>
  <meta name="description" content="{{ config.description }}">
  <meta property="og:title" content="{{ config.title }}">
  <meta property="og:image" content="{{ config.url }}/og-image.png">
  <link rel="icon" type="image/png" sizes="32x32" href="favicon-32x32.png">
  <link rel="icon" type="image/png" sizes="16x16" href="favicon-16x16.png">
  <link rel="apple-touch-icon" sizes="180x180" href="apple-touch-icon.png">
  <link rel="stylesheet" href="styles/styles.css">
</head>
<body>
  <header class="hero">
    <h1>{{ config.bio.name }}</h1>
    <div class="intro">{{ config.bio.intro | markdown }}</div>
  </header>
  <main>
    <ul id="feed" class="feed"></ul>
  </main>
  <script src="js/main.js"></script>
</body>
</html>
"##;

const DEFAULT_STYLES: &str = r#":root {
  --color-1: {{ theme_colors['color-1'] }};
  --color-2: {{ theme_colors['color-2'] }};
  --color-3: {{ theme_colors['color-3'] }};
  --color-4: {{ theme_colors['color-4'] }};
  --background: {{ theme_colors['background'] }};
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--color-4);
  margin: 0 auto;
  max-width: 720px;
  padding: 2rem 1rem;
  line-height: 1.6;
}

.hero h1 {
  border-bottom: 4px solid var(--color-1);
}

.intro a {
  color: var(--color-3);
}

.feed {
  list-style: none;
  padding: 0;
}

.feed li {
  border-left: 6px solid var(--color-2);
  margin-bottom: 0.75rem;
  padding-left: 0.75rem;
}

.feed li.misc {
  border-left-color: var(--color-3);
}
"#;

const DEFAULT_JS: &str = r#"// Renders the data feed into #feed.
(function() {
  'use strict';

  const list = document.getElementById('feed');
  if (!list) return;

  fetch('data.json')
    .then(response => response.json())
    .then(records => {
      records.forEach(record => {
        const item = document.createElement('li');
        item.className = record.category;

        const link = document.createElement(record.url ? 'a' : 'span');
        link.textContent = record.title || 'Untitled';
        if (record.url) {
          link.href = record.url;
          link.target = '_blank';
        }

        const date = document.createElement('time');
        date.dateTime = record.date;
        date.textContent = ' ' + record.date;

        item.append(link, date);
        list.appendChild(item);
      });
    });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_a_buildable_site() {
        let temp = tempdir().unwrap();

        run(temp.path(), false).unwrap();

        for (relative, _) in SCAFFOLD {
            assert!(temp.path().join(relative).is_file(), "missing {}", relative);
        }
        assert!(temp.path().join("assets").is_dir());

        let settings = crate::settings::load_settings(&temp.path().join("tessera.toml")).unwrap();
        let result = tessera_static::StaticBuilder::new(settings.build_config(temp.path(), None, None))
            .build()
            .unwrap();

        assert_eq!(result.records, 0);
        assert!(result.stylesheet);
        let html = std::fs::read_to_string(temp.path().join("_site/index.html")).unwrap();
        assert!(html.contains("<strong>0</strong>"));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("config.yaml"), "custom").unwrap();

        run(temp.path(), false).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("config.yaml")).unwrap(), "custom");

        run(temp.path(), true).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("config.yaml")).unwrap(),
            DEFAULT_CONFIG
        );
    }
}
