//! Text measurement and rasterization for the bottom-right label.
//!
//! Layout code only talks to the [`TextRenderer`] trait. [`FontRenderer`] is
//! the real implementation backed by an `ab_glyph` outline font.

use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use image::RgbaImage;

use crate::color::Color;
use crate::error::{Error, Result};

/// Size of a run of text at a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole run.
    pub width: f32,
    /// Height of the tallest inked glyph above the baseline.
    pub ascent: f32,
}

/// Measures and draws single-line text.
pub trait TextRenderer: Send + Sync {
    /// Measure `text` at `size` pixels.
    fn measure(&self, text: &str, size: f32) -> TextMetrics;

    /// Draw `text` starting at `left`, sitting on `baseline`, in `color`.
    ///
    /// Pixels outside `canvas` are dropped.
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: f32,
        left: f32,
        baseline: f32,
        color: Color,
    );
}

/// [`TextRenderer`] over a TrueType/OpenType font.
///
/// Sizes are em sizes, like a CSS `font-size`: at size 100 a glyph one em
/// wide advances 100 pixels.
pub struct FontRenderer {
    font: FontVec,
    /// Line height (ascent - descent) of one em, in ems.
    height_per_em: f32,
}

impl std::fmt::Debug for FontRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRenderer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontRenderer {
    /// Parse font data. `location` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] if the data is not a usable font.
    pub fn from_bytes(data: Vec<u8>, location: &str) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| Error::FontLoad {
            location: location.to_string(),
            reason: e.to_string(),
        })?;
        let height_per_em = font
            .units_per_em()
            .map_or(1.0, |units| font.height_unscaled() / units);
        Ok(Self {
            font,
            height_per_em,
        })
    }

    /// `ab_glyph` scales by line height; convert from an em size.
    fn scale(&self, size: f32) -> PxScale {
        PxScale::from(size * self.height_per_em)
    }

    /// Lay out `text` on a baseline at `(left, baseline)`.
    ///
    /// Returns the positioned glyphs and the total advance.
    fn layout(&self, text: &str, size: f32, left: f32, baseline: f32) -> (Vec<Glyph>, f32) {
        let scale = self.scale(size);
        let scaled = self.font.as_scaled(scale);

        let mut glyphs = Vec::with_capacity(text.len());
        let mut cursor = left;
        let mut prev = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                cursor += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(cursor, baseline)));
            cursor += scaled.h_advance(id);
            prev = Some(id);
        }

        (glyphs, cursor - left)
    }
}

impl TextRenderer for FontRenderer {
    fn measure(&self, text: &str, size: f32) -> TextMetrics {
        let (glyphs, width) = self.layout(text, size, 0.0, 0.0);
        let ascent = glyphs
            .into_iter()
            .filter_map(|g| self.font.outline_glyph(g))
            .map(|outlined| -outlined.px_bounds().min.y)
            .fold(0.0, f32::max);

        TextMetrics { width, ascent }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: f32,
        left: f32,
        baseline: f32,
        color: Color,
    ) {
        let (glyphs, _) = self.layout(text, size, left, baseline);
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = i64::from(gx) + bounds.min.x as i64;
                let y = i64::from(gy) + bounds.min.y as i64;
                if (0..width).contains(&x) && (0..height).contains(&y) {
                    #[allow(clippy::cast_sign_loss)]
                    let px = canvas.get_pixel_mut(x as u32, y as u32);
                    blend_coverage(px, color, coverage);
                }
            });
        }
    }
}

/// Composite `color` over `px` with `coverage` as its alpha.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn blend_coverage(px: &mut image::Rgba<u8>, color: Color, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let mix = |bg: u8, fg: u8| -> u8 {
        (f32::from(fg) * a + f32::from(bg) * (1.0 - a))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    px[0] = mix(px[0], color.r);
    px[1] = mix(px[1], color.g);
    px[2] = mix(px[2], color.b);
    px[3] = (f32::from(px[3]) + (255.0 - f32::from(px[3])) * a)
        .round()
        .clamp(0.0, 255.0) as u8;
}
