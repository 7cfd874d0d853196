//! Resizing for the logo and icon layers.
//!
//! Shrinking by a large ratio in a single step aliases badly, so the logo is
//! halved repeatedly and only the last step goes to the exact target size.

use image::imageops::{self, FilterType};
use image::RgbaImage;

const FILTER: FilterType = FilterType::Triangle;

/// Number of halvings [`shrink`] performs before its final resize.
///
/// Halving continues while half of the current width is still wider than
/// `target_width`.
#[must_use]
pub fn halving_steps(width: u32, target_width: f32) -> u32 {
    let mut current = width;
    let mut steps = 0;
    while current > 1 && half_exceeds(current, target_width) {
        current /= 2;
        steps += 1;
    }
    steps
}

#[allow(clippy::cast_precision_loss)]
fn half_exceeds(width: u32, target_width: f32) -> bool {
    width as f32 * 0.5 > target_width
}

/// Downscale `image` to `target_width`, keeping its aspect ratio.
///
/// The image is halved (dimensions floored) until another halving would
/// undershoot the target, then resized once to exactly
/// [`target_size`]`(image, target_width)`.
#[must_use]
pub fn shrink(image: &RgbaImage, target_width: f32) -> RgbaImage {
    let (target_w, target_h) = target_size(image, target_width);
    let steps = halving_steps(image.width(), target_width);

    let mut current = image.clone();
    for _ in 0..steps {
        let w = (current.width() / 2).max(1);
        let h = (current.height() / 2).max(1);
        current = imageops::resize(&current, w, h, FILTER);
    }
    tracing::trace!(
        steps,
        from = image.width(),
        to = target_w,
        "shrinking by halving"
    );

    if current.dimensions() == (target_w, target_h) {
        return current;
    }
    imageops::resize(&current, target_w, target_h, FILTER)
}

/// Resize `image` to `width` in a single step, keeping its aspect ratio.
#[must_use]
pub fn resize_to_width(image: &RgbaImage, width: f32) -> RgbaImage {
    let (w, h) = target_size(image, width);
    if image.dimensions() == (w, h) {
        return image.clone();
    }
    imageops::resize(image, w, h, FILTER)
}

/// Pixel size of `image` scaled to `width`, rounded, each side at least 1.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn target_size(image: &RgbaImage, width: f32) -> (u32, u32) {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return (1, 1);
    }
    let height = width * (src_h as f32 / src_w as f32);
    (
        width.round().max(1.0) as u32,
        height.round().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn halving_stops_above_target() {
        // 1000 -> 500 -> 250 -> 125, then 62.5 would undershoot 100.
        assert_eq!(halving_steps(1000, 100.0), 3);
        assert_eq!(halving_steps(1000, 500.0), 0);
        assert_eq!(halving_steps(1000, 499.0), 1);
        assert_eq!(halving_steps(1000, 1000.0), 0);
        assert_eq!(halving_steps(1024, 1.0), 9);
    }

    #[test]
    fn shrink_hits_exact_target_size() {
        let logo = solid(1000, 600);
        let out = shrink(&logo, 100.0);
        assert_eq!(out.dimensions(), (100, 60));
    }

    #[test]
    fn shrink_handles_fractional_targets() {
        let logo = solid(512, 256);
        let out = shrink(&logo, 76.8);
        assert_eq!(out.dimensions(), (77, 38));
    }

    #[test]
    fn shrink_without_halving_still_resizes() {
        let logo = solid(120, 120);
        let out = shrink(&logo, 90.0);
        assert_eq!(out.dimensions(), (90, 90));
    }

    #[test]
    fn shrink_keeps_opaque_interior_opaque() {
        let out = shrink(&solid(800, 800), 50.0);
        assert_eq!(out.get_pixel(25, 25)[3], 255);
    }

    #[test]
    fn resize_to_width_keeps_aspect_ratio() {
        let icon = solid(40, 80);
        assert_eq!(resize_to_width(&icon, 10.0).dimensions(), (10, 20));
        assert_eq!(resize_to_width(&icon, 40.0).dimensions(), (40, 80));
    }

    #[test]
    fn target_size_never_collapses() {
        let wide = solid(1000, 2);
        assert_eq!(target_size(&wide, 10.0), (10, 1));
        assert_eq!(target_size(&wide, 0.0), (1, 1));
    }
}
