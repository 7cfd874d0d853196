//! Error types for the corner-watermark crate.

use std::fmt;

/// Which asset a load failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// The image being watermarked.
    Source,
    /// The top-left logo.
    Logo,
    /// The icon drawn beside the text label.
    Icon,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Source => "source",
            Self::Logo => "logo",
            Self::Icon => "icon",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while loading assets and stamping watermarks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An image asset could not be read or decoded.
    #[error("failed to load {kind} image `{location}`: {source}")]
    AssetLoad {
        /// Which asset failed.
        kind: AssetKind,
        /// Where the asset was loaded from.
        location: String,
        /// Underlying decode or I/O error.
        source: image::ImageError,
    },

    /// The font file could not be read or parsed.
    #[error("failed to load font `{location}`: {reason}")]
    FontLoad {
        /// Where the font was loaded from.
        location: String,
        /// Why loading failed.
        reason: String,
    },

    /// A color string is not `#RGB` or `#RRGGBB`.
    #[error("invalid color `{0}`: expected #RGB or #RRGGBB")]
    InvalidColor(String),

    /// The style configuration cannot be used.
    #[error("invalid watermark configuration: {0}")]
    InvalidConfig(String),

    /// The source image has no pixels to crop.
    #[error("image too small ({width}x{height}) to watermark")]
    ImageTooSmall {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
