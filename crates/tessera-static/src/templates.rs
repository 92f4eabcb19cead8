//! Template engines for the page and the stylesheet.

use std::path::Path;

use minijinja::{context, path_loader, AutoEscape, Environment, Value};
use pulldown_cmark::{html, Event, LinkType, Options, Parser, Tag, TagEnd};

use tessera_data::{SiteConfig, ThemeColors};

/// Two minijinja environments: one for HTML, one for CSS.
///
/// The HTML environment escapes every substitution and provides the
/// `markdown` filter. The CSS environment never escapes, so color values pass
/// through verbatim.
pub struct TemplateEngine {
    html: Environment<'static>,
    css: Environment<'static>,
}

impl TemplateEngine {
    /// Create engines loading templates from `html_root` and `css_root`.
    pub fn new(html_root: &Path, css_root: &Path) -> Self {
        let mut html = Environment::new();
        html.set_loader(path_loader(html_root.to_path_buf()));
        html.set_auto_escape_callback(|_| AutoEscape::Html);
        html.add_filter("markdown", markdown_filter);

        let mut css = Environment::new();
        css.set_loader(path_loader(css_root.to_path_buf()));
        css.set_auto_escape_callback(|_| AutoEscape::None);

        Self { html, css }
    }

    /// Render the page template with the configuration bound as `config`.
    pub fn render_index(&self, template: &str, config: &SiteConfig) -> Result<String, minijinja::Error> {
        let tmpl = self.html.get_template(template)?;

        tmpl.render(context! {
            config => config.value(),
        })
    }

    /// Render the stylesheet template with the colors bound as `theme_colors`.
    pub fn render_stylesheet(
        &self,
        template: &str,
        colors: &ThemeColors,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.css.get_template(template)?;

        tmpl.render(context! {
            theme_colors => colors,
        })
    }
}

/// `markdown` template filter.
fn markdown_filter(value: &str) -> Value {
    Value::from_safe_string(render_markdown(value))
}

/// Render markdown to HTML. Every link opens in a new browsing context.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH;

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) => {
            let href = if link_type == LinkType::Email {
                format!("mailto:{}", dest_url)
            } else {
                dest_url.to_string()
            };

            let mut anchor = format!("<a href=\"{}\"", escape_attr(&href));
            if !title.is_empty() {
                anchor.push_str(&format!(" title=\"{}\"", escape_attr(&title)));
            }
            anchor.push_str(" target=\"_blank\">");
            Event::InlineHtml(anchor.into())
        }
        Event::End(TagEnd::Link) => Event::InlineHtml("</a>".into()),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const CONFIG: &str = r##"theme_colors:
  color-1: "#e63946"
  color-2: "#f1c453"
  color-3: "#2a9d8f"
  color-4: "#264653"
  background: "#fdfcf7"
title: Tom & Jerry
bio:
  intro: "See [my blog](https://example.com/blog) for **more**."
"##;

    fn engine_with(html: &str, css: &str) -> (TempDir, TemplateEngine) {
        let temp = tempdir().unwrap();
        let templates = temp.path().join("templates");
        let styles = temp.path().join("styles");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&styles).unwrap();
        fs::write(templates.join("index.html.jinja"), html).unwrap();
        fs::write(styles.join("styles.css"), css).unwrap();

        let engine = TemplateEngine::new(&templates, &styles);
        (temp, engine)
    }

    #[test]
    fn renders_links_in_new_tab() {
        let html = render_markdown("Read [the docs](https://example.com \"Docs\").");

        assert!(html.contains(
            r#"<a href="https://example.com" title="Docs" target="_blank">the docs</a>"#
        ));
    }

    #[test]
    fn renders_autolinks_in_new_tab() {
        let html = render_markdown("<https://example.com/a?b=1&c=2> and <me@example.com>");

        assert!(html.contains(r#"href="https://example.com/a?b=1&amp;c=2" target="_blank""#));
        assert!(html.contains(r#"href="mailto:me@example.com" target="_blank""#));
    }

    #[test]
    fn renders_index_with_escaping_and_markdown_filter() {
        let (_temp, engine) = engine_with(
            "<h1>{{ config.title }}</h1>\n<div>{{ config.bio.intro | markdown }}</div>",
            "",
        );
        let config = SiteConfig::from_yaml_str(CONFIG).unwrap();

        let html = engine.render_index("index.html.jinja", &config).unwrap();

        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains(r#"<a href="https://example.com/blog" target="_blank">my blog</a>"#));
        assert!(html.contains("<strong>more</strong>"));
    }

    #[test]
    fn renders_stylesheet_without_escaping() {
        let (_temp, engine) = engine_with(
            "",
            ":root {\n  --c1: {{ theme_colors['color-1'] }};\n  --bg: {{ theme_colors.background }};\n}\n",
        );
        let colors = ThemeColors {
            color_1: "#e63946".to_string(),
            color_2: "#f1c453".to_string(),
            color_3: "#2a9d8f".to_string(),
            color_4: "#264653".to_string(),
            background: "rgb(253, 252, 247)".to_string(),
        };

        let css = engine.render_stylesheet("styles.css", &colors).unwrap();

        assert!(css.contains("--c1: #e63946;"));
        assert!(css.contains("--bg: rgb(253, 252, 247);"));
    }

    #[test]
    fn errors_on_missing_template() {
        let (_temp, engine) = engine_with("", "");
        let config = SiteConfig::from_yaml_str(CONFIG).unwrap();

        assert!(engine.render_index("missing.html.jinja", &config).is_err());
        assert!(engine
            .render_stylesheet("missing.css", config.theme_colors())
            .is_err());
    }
}
