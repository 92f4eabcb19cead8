//! Theme color resolution.

use image::Rgb;
use tessera_data::ThemeColors;

use crate::AssetError;

/// Parse a CSS color string (hex, `rgb()`, `hsl()` or a named color).
///
/// Alpha is discarded; the generated images are opaque RGB.
pub fn parse_color(value: &str) -> Result<Rgb<u8>, csscolorparser::ParseColorError> {
    let [r, g, b, _] = csscolorparser::parse(value.trim())?.to_rgba8();
    Ok(Rgb([r, g, b]))
}

/// Theme colors resolved to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// `color-1`..`color-4`, in order
    pub accents: [Rgb<u8>; 4],

    /// Background color
    pub background: Rgb<u8>,
}

impl Palette {
    /// Resolve every color of the theme, failing on the first invalid one.
    pub fn from_theme(theme: &ThemeColors) -> Result<Self, AssetError> {
        let resolve = |name: &str, value: &str| {
            parse_color(value).map_err(|e| AssetError::InvalidColor {
                name: name.to_string(),
                value: value.to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            accents: [
                resolve("color-1", &theme.color_1)?,
                resolve("color-2", &theme.color_2)?,
                resolve("color-3", &theme.color_3)?,
                resolve("color-4", &theme.color_4)?,
            ],
            background: resolve("background", &theme.background)?,
        })
    }
}
