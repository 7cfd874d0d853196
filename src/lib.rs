//! Stamp a contrast-aware logo and text label onto square-cropped images.
//!
//! The source image is center-cropped to a square (at most
//! [`WatermarkStyle::max_image_size`] pixels on a side) over a white
//! background. Two layers are then stamped on it:
//!
//! - a logo in the top-left corner, downscaled by repeated halving and
//!   recolored light or dark depending on the background under it;
//! - a text label with a small icon in the bottom-right corner, recolored the
//!   same way against the background under the text.
//!
//! # Quick Start
//!
//! ```no_run
//! use corner_watermark::{FsLoader, WatermarkEngine, WatermarkStyle};
//!
//! let engine = WatermarkEngine::new(WatermarkStyle::default(), &FsLoader::new("assets"))
//!     .expect("failed to load watermark assets");
//! let img = image::open("photo.jpg").unwrap();
//! let stamped = engine.apply(&img).unwrap();
//! stamped.save("stamped.png").unwrap();
//! ```
//!
//! # Styles
//!
//! Every field of [`WatermarkStyle`] has a default, so a style file only needs
//! the values it changes:
//!
//! ```
//! use corner_watermark::WatermarkStyle;
//!
//! let style: WatermarkStyle = toml::from_str(r##"
//!     [text]
//!     content = "42"
//!     dark_color = "#222"
//! "##).unwrap();
//! assert_eq!(style.max_image_size, 1024);
//! ```

#![deny(missing_docs)]

pub mod assets;
pub mod canvas;
pub mod color;
pub mod config;
mod engine;
pub mod error;
pub mod layers;
pub mod resample;
pub mod text;
#[doc(hidden)]
pub mod testing;

pub use assets::{AssetLoader, FsLoader, MemoryLoader, WatermarkAssets};
pub use color::Color;
pub use config::{IconStyle, LogoStyle, TextStyle, WatermarkStyle};
pub use engine::{
    default_output_path, is_supported_image, save_image, to_data_url, ProcessResult,
    WatermarkEngine, Watermarked,
};
pub use error::{AssetKind, Error, Result};
pub use text::{FontRenderer, TextMetrics, TextRenderer};
