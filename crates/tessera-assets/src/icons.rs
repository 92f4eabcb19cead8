//! Quadrant favicon family.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::color::Palette;
use crate::AssetError;

/// Edge length of the canvas every icon is resampled from.
pub const BASE_ICON_SIZE: u32 = 64;

/// PNG icons written to the output directory, with their edge length.
pub const PNG_ICONS: [(&str, u32); 4] = [
    ("favicon-16x16.png", 16),
    ("favicon-32x32.png", 32),
    ("apple-touch-icon.png", 180),
    ("android-chrome-192x192.png", 192),
];

/// Multi-resolution icon file name.
pub const ICO_FILENAME: &str = "favicon.ico";

/// Resolutions packed into the `.ico` file.
pub const ICO_SIZES: [u32; 3] = [16, 32, 48];

/// Files produced by [`generate_icons`].
#[derive(Debug, Clone, Default)]
pub struct IconReport {
    /// PNG icons written
    pub pngs: Vec<PathBuf>,

    /// The `.ico` file, if it could be composed
    pub ico: Option<PathBuf>,
}

/// Build the base icon: four quadrants in the theme's accent colors.
///
/// Top-left is `color-2`, top-right `color-3`, bottom-left `color-4` and
/// bottom-right `color-1`.
pub fn quadrant_canvas(palette: &Palette) -> RgbImage {
    let half = BASE_ICON_SIZE / 2;
    let [c1, c2, c3, c4] = palette.accents;

    RgbImage::from_fn(BASE_ICON_SIZE, BASE_ICON_SIZE, |x, y| {
        match (x < half, y < half) {
            (true, true) => c2,
            (false, true) => c3,
            (true, false) => c4,
            (false, false) => c1,
        }
    })
}

/// Resample the base canvas to `size` x `size` with nearest-neighbor.
pub fn render_icon(canvas: &RgbImage, size: u32) -> RgbImage {
    imageops::resize(canvas, size, size, FilterType::Nearest)
}

/// Write the PNG icons and `favicon.ico` into `output_dir`.
///
/// A failure to compose the `.ico` is logged and reported as `ico: None`;
/// PNG failures are errors.
pub fn generate_icons(palette: &Palette, output_dir: &Path) -> Result<IconReport, AssetError> {
    fs::create_dir_all(output_dir).map_err(|e| AssetError::Write {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let canvas = quadrant_canvas(palette);
    let mut report = IconReport::default();

    for (filename, size) in PNG_ICONS {
        let path = output_dir.join(filename);
        render_icon(&canvas, size)
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AssetError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::info!("Generated {} ({}x{})", filename, size, size);
        report.pngs.push(path);
    }

    let ico_path = output_dir.join(ICO_FILENAME);
    match write_ico(&canvas, &ico_path) {
        Ok(()) => {
            tracing::info!("Generated {} with 16x16, 32x32, 48x48", ICO_FILENAME);
            report.ico = Some(ico_path);
        }
        Err(e) => {
            tracing::warn!("Could not generate {}: {}", ICO_FILENAME, e);
        }
    }

    Ok(report)
}

fn write_ico(canvas: &RgbImage, path: &Path) -> std::io::Result<()> {
    let mut dir = IconDir::new(ResourceType::Icon);

    for size in ICO_SIZES {
        let rgba = DynamicImage::ImageRgb8(render_icon(canvas, size)).into_rgba8();
        let image = IconImage::from_rgba_data(size, size, rgba.into_raw());
        dir.add_entry(IconDirEntry::encode(&image)?);
    }

    let file = File::create(path)?;
    dir.write(file)
}
