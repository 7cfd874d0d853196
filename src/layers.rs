//! The two watermark layers.
//!
//! Each layer is prepared from the untouched base canvas (color choice,
//! resizing, recolor) and drawn afterwards. Preparation only reads the
//! canvas, so both layers can be prepared at the same time and the result
//! does not depend on which finishes first.

use image::{imageops, RgbaImage};

use crate::canvas::Region;
use crate::color::{
    average_luminance, pick_contrast, replace_color, Color, LOGO_LUMINANCE_THRESHOLD,
    TEXT_LUMINANCE_THRESHOLD,
};
use crate::config::WatermarkStyle;
use crate::resample;
use crate::text::TextRenderer;

/// Character measured to size the icon. The label is assumed to be monospace.
const ICON_REFERENCE_CHAR: &str = "8";

/// The bottom-right text label and its icon, ready to draw.
pub struct TextLayer<'a> {
    content: &'a str,
    renderer: &'a dyn TextRenderer,
    /// Font size in pixels.
    pub font_size: f32,
    /// Left edge of the text run.
    pub left: f32,
    /// Baseline of the text run.
    pub baseline: f32,
    /// Average background brightness under the text.
    pub luminance: f64,
    /// Color used for both the text and the icon.
    pub color: Color,
    /// The resized, recolored icon.
    pub icon: RgbaImage,
    /// Top-left corner of the icon.
    pub icon_position: (i64, i64),
}

impl std::fmt::Debug for TextLayer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayer")
            .field("content", &self.content)
            .field("font_size", &self.font_size)
            .field("left", &self.left)
            .field("baseline", &self.baseline)
            .field("color", &self.color)
            .field("icon", &self.icon.dimensions())
            .field("icon_position", &self.icon_position)
            .finish_non_exhaustive()
    }
}

/// Lay out the text label and icon against the base `canvas`.
///
/// The text is right-aligned to `edge * (1 - right_padding)` with its baseline
/// at `edge * (1 - bottom_padding)`. The icon sits to the left of the text,
/// one character width plus `icon.offset_x` characters away, vertically
/// centered on the text ascent.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn prepare_text_layer<'a>(
    canvas: &RgbaImage,
    style: &'a WatermarkStyle,
    renderer: &'a dyn TextRenderer,
    icon: &RgbaImage,
) -> TextLayer<'a> {
    let edge = canvas.width() as f32;
    let text = &style.text;

    let right = edge * (1.0 - text.right_padding);
    let baseline = edge * (1.0 - text.bottom_padding);
    let font_size = edge * text.size;

    let metrics = renderer.measure(&text.content, font_size);
    let left = right - metrics.width;
    let luminance = average_luminance(
        canvas,
        Region::from_layout(left, baseline - metrics.ascent, metrics.width, metrics.ascent),
    );
    let color = pick_contrast(
        luminance,
        TEXT_LUMINANCE_THRESHOLD,
        text.light_color,
        text.dark_color,
    );

    let glyph = renderer.measure(ICON_REFERENCE_CHAR, font_size);
    let icon_width = glyph.width * style.icon.width;
    let icon_height = icon_width * aspect(icon);
    let mut icon = resample::resize_to_width(icon, icon_width);
    replace_color(&mut icon, color);

    let chars = text.content.chars().count() as f32;
    let icon_x = right - (chars + 1.0 + style.icon.offset_x) * glyph.width;
    let icon_y = baseline - glyph.ascent * (0.5 - style.icon.offset_y) - icon_height * 0.5;

    tracing::debug!(luminance, color = %color, font_size, "text layer prepared");

    TextLayer {
        content: &text.content,
        renderer,
        font_size,
        left,
        baseline,
        luminance,
        color,
        icon,
        icon_position: floor_point(icon_x, icon_y),
    }
}

impl TextLayer<'_> {
    /// Draw the text, then the icon.
    pub fn draw(&self, canvas: &mut RgbaImage) {
        self.renderer.draw(
            canvas,
            self.content,
            self.font_size,
            self.left,
            self.baseline,
            self.color,
        );
        let (x, y) = self.icon_position;
        imageops::overlay(canvas, &self.icon, x, y);
    }
}

/// The top-left logo, ready to draw.
#[derive(Debug, Clone)]
pub struct LogoLayer {
    /// The downscaled, recolored logo.
    pub image: RgbaImage,
    /// Top-left corner on the canvas.
    pub position: (i64, i64),
    /// Average background brightness under the logo.
    pub luminance: f64,
    /// Color the logo was recolored to.
    pub color: Color,
}

/// Downscale and recolor the logo against the base `canvas`.
///
/// The logo is at most `edge * logo.size` wide and never enlarged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn prepare_logo_layer(
    canvas: &RgbaImage,
    style: &WatermarkStyle,
    logo: &RgbaImage,
) -> LogoLayer {
    let edge = canvas.width() as f32;
    let logo_style = &style.logo;

    let target_width = (logo.width() as f32).min(edge * logo_style.size);
    let target_height = target_width * aspect(logo);
    let x = edge * logo_style.left_padding;
    let y = edge * logo_style.top_padding;

    let luminance = average_luminance(
        canvas,
        Region::from_layout(x, y, target_width, target_height),
    );
    let color = pick_contrast(
        luminance,
        LOGO_LUMINANCE_THRESHOLD,
        logo_style.light_color,
        logo_style.dark_color,
    );

    let mut image = resample::shrink(logo, target_width);
    replace_color(&mut image, color);

    tracing::debug!(
        luminance,
        color = %color,
        size = ?image.dimensions(),
        "logo layer prepared"
    );

    LogoLayer {
        image,
        position: floor_point(x, y),
        luminance,
        color,
    }
}

impl LogoLayer {
    /// Composite the logo onto `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage) {
        let (x, y) = self.position;
        imageops::overlay(canvas, &self.image, x, y);
    }
}

#[allow(clippy::cast_precision_loss)]
fn aspect(image: &RgbaImage) -> f32 {
    if image.width() == 0 {
        return 1.0;
    }
    image.height() as f32 / image.width() as f32
}

#[allow(clippy::cast_possible_truncation)]
fn floor_point(x: f32, y: f32) -> (i64, i64) {
    (x.floor() as i64, y.floor() as i64)
}
