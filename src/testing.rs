//! Fixed-geometry text renderer for layout tests.

use image::{Rgba, RgbaImage};

use crate::canvas::Region;
use crate::color::Color;
use crate::text::{TextMetrics, TextRenderer};

/// Draws every character as a solid block `0.5 * size` wide and `0.7 * size`
/// tall, sitting on the baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRenderer;

impl TextRenderer for BlockRenderer {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, size: f32) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * size * 0.5,
            ascent: size * 0.7,
        }
    }

    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: f32,
        left: f32,
        baseline: f32,
        color: Color,
    ) {
        let m = self.measure(text, size);
        let region = Region::from_layout(left, baseline - m.ascent, m.width, m.ascent);
        if let Some((x0, y0, x1, y1)) = region.clip(canvas.width(), canvas.height()) {
            for y in y0..y1 {
                for x in x0..x1 {
                    canvas.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
                }
            }
        }
    }
}
