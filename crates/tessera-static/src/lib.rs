//! Static site builder for tessera.
//!
//! Builds the single-page site from the site configuration, the data feed and
//! the theme: icons, preview image, rendered HTML and CSS, and static copies.

pub mod builder;
pub mod copier;
pub mod css;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use copier::CopyReport;
pub use templates::TemplateEngine;
