//! Social preview (Open Graph) image.
//!
//! The preview is a canvas of the background color tiled with rounded cells,
//! each colored with a randomly chosen accent. Once written, the file is kept
//! across builds so the page keeps a stable preview.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use rand::Rng;

use crate::color::Palette;
use crate::AssetError;

/// File name of the preview image at the project root.
pub const PREVIEW_FILENAME: &str = "og-image.png";

/// Geometry of the preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSpec {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Edge length of a cell
    pub cell_size: u32,

    /// Distance between neighboring cells
    pub cell_gap: u32,

    /// Corner radius of a cell
    pub radius: u32,
}

impl Default for PreviewSpec {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            cell_size: 30,
            cell_gap: 10,
            radius: 4,
        }
    }
}

impl PreviewSpec {
    /// Offset of the first row and column, half a cell above and left of the origin.
    pub fn origin(&self) -> i64 {
        -i64::from(self.cell_size / 2)
    }

    /// Distance between the origins of neighboring cells.
    pub fn stride(&self) -> i64 {
        i64::from(self.cell_size + self.cell_gap)
    }

    /// Top-left corners of every cell, row by row.
    pub fn cell_origins(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let stride = self.stride() as usize;
        let ys = (self.origin()..i64::from(self.height)).step_by(stride);

        ys.flat_map(move |y| {
            (self.origin()..i64::from(self.width))
                .step_by(stride)
                .map(move |x| (x, y))
        })
    }
}

/// Whether the preview must be generated, given whether it already exists.
pub fn should_generate_preview(exists: bool) -> bool {
    !exists
}

/// What [`ensure_preview`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// An existing file was left untouched
    Skipped,

    /// A new image was written
    Generated,
}

/// Draw the tiled preview image.
///
/// Each cell spans `cell_size + 1` pixels per side, edges included, and
/// cells clipped by the canvas edges are drawn partially.
pub fn render_preview<R: Rng + ?Sized>(layout: &PreviewSpec, palette: &Palette, rng: &mut R) -> RgbImage {
    let mut img = RgbImage::from_pixel(layout.width, layout.height, palette.background);
    let size = i64::from(layout.cell_size);
    let radius = i64::from(layout.radius);

    for (x, y) in layout.cell_origins() {
        let color = palette.accents[rng.gen_range(0..palette.accents.len())];
        fill_rounded_rect(&mut img, (x, y), (x + size, y + size), radius, color);
    }

    img
}

/// Write the preview to `path` unless `exists` reports it is already there.
pub fn ensure_preview<R, F>(
    path: &Path,
    layout: &PreviewSpec,
    palette: &Palette,
    exists: F,
    rng: &mut R,
) -> Result<PreviewOutcome, AssetError>
where
    R: Rng + ?Sized,
    F: Fn(&Path) -> bool,
{
    if !should_generate_preview(exists(path)) {
        tracing::info!("Keeping existing preview image {}", path.display());
        return Ok(PreviewOutcome::Skipped);
    }

    render_preview(layout, palette, rng)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AssetError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("Generated preview image {}", path.display());
    Ok(PreviewOutcome::Generated)
}

/// Fill the inclusive rectangle `top_left..=bottom_right` with rounded corners.
fn fill_rounded_rect(
    img: &mut RgbImage,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    radius: i64,
    color: Rgb<u8>,
) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    let max_x = i64::from(img.width()) - 1;
    let max_y = i64::from(img.height()) - 1;
    let radius = radius.min((x1 - x0) / 2).min((y1 - y0) / 2).max(0);

    for y in y0.max(0)..=y1.min(max_y) {
        for x in x0.max(0)..=x1.min(max_x) {
            // Distance to the nearest corner circle center; zero outside the corners.
            let dx = x - x.clamp(x0 + radius, x1 - radius);
            let dy = y - y.clamp(y0 + radius, y1 - radius);
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
