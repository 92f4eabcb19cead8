//! Themed image assets.
//!
//! Generates the quadrant favicon family and the tiled social preview image
//! from the site's theme colors.

pub mod color;
pub mod icons;
pub mod preview;

pub use color::{parse_color, Palette};
pub use icons::{generate_icons, quadrant_canvas, render_icon, IconReport, ICO_FILENAME, PNG_ICONS};
pub use preview::{
    ensure_preview, render_preview, should_generate_preview, PreviewOutcome, PreviewSpec,
    PREVIEW_FILENAME,
};

/// Errors that can occur while generating assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Invalid color {value:?} for {name}: {message}")]
    InvalidColor {
        name: String,
        value: String,
        message: String,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}
