//! Core watermarking engine.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::assets::{AssetLoader, WatermarkAssets};
use crate::canvas::{crop_square, draw_base, CropRegion};
use crate::color::Color;
use crate::config::WatermarkStyle;
use crate::error::{Error, Result};
use crate::layers::{prepare_logo_layer, prepare_text_layer};

/// A watermarked image and the decisions made while producing it.
#[derive(Debug, Clone)]
pub struct Watermarked {
    /// The square, watermarked canvas.
    pub image: RgbaImage,
    /// The region of the source that was copied onto the canvas.
    pub crop: CropRegion,
    /// Color chosen for the text label and icon.
    pub text_color: Color,
    /// Color chosen for the logo.
    pub logo_color: Color,
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Where the watermarked image was written (or would have been).
    pub output: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, output: &Path, message: String) -> Self {
        tracing::warn!(path = %path.display(), %message, "watermarking failed");
        Self {
            path: path.to_path_buf(),
            output: output.to_path_buf(),
            success: false,
            message,
        }
    }
}

/// The watermark engine holding a style and its decoded assets.
///
/// Create once with [`WatermarkEngine::new()`] and reuse for multiple images.
/// Assets are loaded and decoded up front, so [`WatermarkEngine::apply`] does
/// no I/O.
#[derive(Debug)]
pub struct WatermarkEngine {
    style: WatermarkStyle,
    assets: WatermarkAssets,
}

impl WatermarkEngine {
    /// Validate `style` and load the assets it names through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unusable style and
    /// [`Error::AssetLoad`] or [`Error::FontLoad`] if any asset fails to load.
    pub fn new(style: WatermarkStyle, loader: &dyn AssetLoader) -> Result<Self> {
        style.validate()?;
        let assets = WatermarkAssets::load(&style, loader)?;
        Ok(Self { style, assets })
    }

    /// Build an engine from assets that are already decoded.
    ///
    /// The `source` fields of `style` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unusable style.
    pub fn from_assets(style: WatermarkStyle, assets: WatermarkAssets) -> Result<Self> {
        style.validate()?;
        Ok(Self { style, assets })
    }

    /// The style this engine stamps with.
    #[must_use]
    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    /// Watermark `source` and return the finished canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooSmall`] if `source` has no pixels.
    pub fn apply(&self, source: &DynamicImage) -> Result<RgbaImage> {
        self.render(source).map(|w| w.image)
    }

    /// Watermark `source`, also reporting the crop and the chosen colors.
    ///
    /// Both layers are prepared from the same base canvas, then drawn text
    /// first and logo second. The canvas is returned only once both are drawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooSmall`] if `source` has no pixels.
    pub fn render(&self, source: &DynamicImage) -> Result<Watermarked> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(Error::ImageTooSmall { width, height });
        }

        let crop = crop_square(width, height, self.style.max_image_size);
        tracing::debug!(
            width,
            height,
            edge = crop.edge,
            x = crop.x,
            y = crop.y,
            "cropping source"
        );
        let mut canvas = draw_base(source, &crop);

        let text = || {
            prepare_text_layer(
                &canvas,
                &self.style,
                &*self.assets.text,
                &self.assets.icon,
            )
        };
        let logo = || prepare_logo_layer(&canvas, &self.style, &self.assets.logo);

        #[cfg(feature = "parallel")]
        let (text_layer, logo_layer) = rayon::join(text, logo);

        #[cfg(not(feature = "parallel"))]
        let (text_layer, logo_layer) = (text(), logo());

        text_layer.draw(&mut canvas);
        logo_layer.draw(&mut canvas);

        Ok(Watermarked {
            image: canvas,
            crop,
            text_color: text_layer.color,
            logo_color: logo_layer.color,
        })
    }

    /// Process a single image file: load, watermark, save.
    ///
    /// Returns a [`ProcessResult`] indicating success or failure.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        let source = match image::open(input) {
            Ok(img) => img,
            Err(e) => {
                return ProcessResult::failed(input, output, format!("Failed to load: {e}"));
            }
        };

        let watermarked = match self.render(&source) {
            Ok(w) => w,
            Err(e) => return ProcessResult::failed(input, output, e.to_string()),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        output,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        if let Err(e) = save_image(&watermarked.image, output) {
            return ProcessResult::failed(input, output, format!("Failed to save: {e}"));
        }

        let edge = watermarked.crop.edge;
        ProcessResult {
            path: input.to_path_buf(),
            output: output.to_path_buf(),
            success: true,
            message: format!(
                "{edge}x{edge}, text {}, logo {}",
                watermarked.text_color, watermarked.logo_color
            ),
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `parallel` feature is enabled (via rayon).
    /// Returns a [`ProcessResult`] for each image found.
    #[must_use]
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    output_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    input_dir,
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let process = |input_path: &PathBuf| {
            let output_path = match input_path.file_name() {
                Some(name) => output_dir.join(name),
                None => output_dir.to_path_buf(),
            };
            self.process_file(input_path, &output_path)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(process).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            entries.iter().map(process).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save a watermarked canvas with format-specific settings.
///
/// Every canvas starts from an opaque white base and the layers are
/// composited over it, so alpha is always 255 and carries nothing; it is
/// dropped so JPEG (which has no alpha) and the other formats share one RGB
/// path. JPEG is written at quality 100.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&rgb)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            rgb.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Encode a canvas as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`Error::Image`] if PNG encoding fails.
pub fn to_data_url(img: &RgbaImage) -> Result<String> {
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
    Ok(format!("data:image/png;base64,{encoded}"))
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_appends_watermarked_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_watermarked.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_watermarked.png"
        );
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn data_url_is_base64_png() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        let url = to_data_url(&img).unwrap();
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn save_image_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::new(2, 2);
        let err = save_image(&img, &dir.path().join("out.xyz")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn save_image_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = RgbaImage::from_pixel(3, 3, image::Rgba([10, 20, 30, 255]));
        save_image(&img, &path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.color(), image::ColorType::Rgb8);
        assert_eq!(reloaded.to_rgb8().get_pixel(1, 1), &image::Rgb([10, 20, 30]));
    }
}
