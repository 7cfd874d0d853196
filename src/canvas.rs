//! Square crop geometry and the white base canvas.

use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// A rectangle in canvas coordinates. The origin may lie outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Build a region from integer coordinates.
    #[must_use]
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from fractional layout coordinates.
    ///
    /// The origin is floored and the size rounded; negative sizes collapse to 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_layout(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: x.floor() as i64,
            y: y.floor() as i64,
            width: width.round().max(0.0) as u32,
            height: height.round().max(0.0) as u32,
        }
    }

    /// Intersect with a `width x height` image.
    ///
    /// Returns `(x0, y0, x1, y1)` with exclusive ends, or `None` when nothing
    /// of the region is visible.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clip(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + i64::from(self.width)).min(i64::from(width));
        let y1 = (self.y + i64::from(self.height)).min(i64::from(height));

        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// The centered square taken from a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge of the crop in source coordinates.
    pub x: u32,
    /// Top edge of the crop in source coordinates.
    pub y: u32,
    /// Side length of the crop and of the output canvas.
    pub edge: u32,
}

/// Compute the centered square crop for a `width x height` source.
///
/// The edge is the smallest of both dimensions and `max_edge`. The region is
/// copied 1:1, so sources larger than `max_edge` are cropped around their
/// center rather than scaled down.
#[must_use]
pub fn crop_square(width: u32, height: u32, max_edge: u32) -> CropRegion {
    let edge = width.min(height).min(max_edge);
    CropRegion {
        x: (width - edge) / 2,
        y: (height - edge) / 2,
        edge,
    }
}

/// Paint an opaque white canvas and composite the cropped source over it.
///
/// Transparent areas of the source show white in the result.
#[must_use]
pub fn draw_base(source: &DynamicImage, crop: &CropRegion) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(crop.edge, crop.edge, Rgba([255, 255, 255, 255]));
    let cropped = source.crop_imm(crop.x, crop.y, crop.edge, crop.edge).to_rgba8();
    imageops::overlay(&mut canvas, &cropped, 0, 0);
    canvas
}
