//! Colors, brightness sampling and hard-edge recoloring.
//!
//! Layer colors are chosen by sampling the background under the layer with a
//! cheap brightness estimate, `(r + r + b + g + g) / 6`, and comparing the
//! average against a per-layer threshold. Bright backgrounds get the dark
//! color variant, everything else the light one.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::canvas::Region;
use crate::error::{Error, Result};

/// Average brightness above which the text label switches to its dark color.
pub const TEXT_LUMINANCE_THRESHOLD: f64 = 140.0;

/// Average brightness above which the logo switches to its dark color.
///
/// Deliberately different from [`TEXT_LUMINANCE_THRESHOLD`].
pub const LOGO_LUMINANCE_THRESHOLD: f64 = 200.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Build a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex_color(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        parse_hex_color(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Parse a hex color string.
///
/// Accepts `#RGB` and `#RRGGBB` in either case; the leading `#` is optional.
/// Shorthand digits are doubled, so `#abc` is `#aabbcc`.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] for any other input.
pub fn parse_hex_color(input: &str) -> Result<Color> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(input.to_string()));
    }

    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidColor(input.to_string()))
    };

    match hex.len() {
        3 => Ok(Color::new(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(Error::InvalidColor(input.to_string())),
    }
}

/// Brightness of a single pixel: `(r + r + b + g + g) / 6`.
///
/// Not a perceptual luma; white maps to 212.5.
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    f64::from(weighted_sum(r, g, b)) / 6.0
}

fn weighted_sum(r: u8, g: u8, b: u8) -> u32 {
    2 * u32::from(r) + 2 * u32::from(g) + u32::from(b)
}

/// Average [`luminance`] over the part of `region` that lies inside `image`.
///
/// The alpha channel is ignored. A region that is empty after clipping
/// samples as 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_luminance(image: &RgbaImage, region: Region) -> f64 {
    let Some((x0, y0, x1, y1)) = region.clip(image.width(), image.height()) else {
        return 0.0;
    };

    let mut total = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = image.get_pixel(x, y);
            total += u64::from(weighted_sum(px[0], px[1], px[2]));
        }
    }

    let count = u64::from(x1 - x0) * u64::from(y1 - y0);
    total as f64 / (6 * count) as f64
}

/// Pick the dark variant when `sample` is strictly above `threshold`.
#[must_use]
pub fn pick_contrast(sample: f64, threshold: f64, light: Color, dark: Color) -> Color {
    if sample > threshold {
        dark
    } else {
        light
    }
}

/// Hard-edge recolor: every pixel with non-zero alpha takes `color`'s RGB.
///
/// Alpha values are preserved and fully transparent pixels are left untouched.
pub fn replace_color(image: &mut RgbaImage, color: Color) {
    for px in image.pixels_mut() {
        if px[3] != 0 {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }
}
