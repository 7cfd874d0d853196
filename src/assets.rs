//! Loading of the logo, icon and font referenced by a [`WatermarkStyle`].
//!
//! Every load returns a [`Result`]; a missing or corrupt asset is an error,
//! never a silently absent layer.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageError, RgbaImage};

use crate::config::WatermarkStyle;
use crate::error::{AssetKind, Error, Result};
use crate::text::{FontRenderer, TextRenderer};

/// Resolves asset locations to bytes.
pub trait AssetLoader: Send + Sync {
    /// Read the raw bytes stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the asset does not exist or cannot be read.
    fn read(&self, location: &str) -> io::Result<Vec<u8>>;

    /// Read and decode an image asset to RGBA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] tagged with `kind` on read or decode failure.
    fn load_image(&self, kind: AssetKind, location: &str) -> Result<RgbaImage> {
        let asset_error = |source: ImageError| Error::AssetLoad {
            kind,
            location: location.to_string(),
            source,
        };
        let bytes = self
            .read(location)
            .map_err(|e| asset_error(ImageError::IoError(e)))?;
        let image = image::load_from_memory(&bytes).map_err(asset_error)?;
        Ok(image.to_rgba8())
    }

    /// Read and parse a font file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] on read or parse failure.
    fn load_font(&self, location: &str) -> Result<FontRenderer> {
        let bytes = self.read(location).map_err(|e| Error::FontLoad {
            location: location.to_string(),
            reason: e.to_string(),
        })?;
        FontRenderer::from_bytes(bytes, location)
    }
}

/// Loads assets from the filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Resolve relative locations against `root`. Absolute locations are used as-is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory relative locations are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLoader for FsLoader {
    fn read(&self, location: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(location))
    }
}

/// Serves assets from memory, keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `location`, replacing any previous entry.
    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(location.into(), bytes.into());
    }

    /// Builder form of [`MemoryLoader::insert`].
    #[must_use]
    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl AssetLoader for MemoryLoader {
    fn read(&self, location: &str) -> io::Result<Vec<u8>> {
        self.entries.get(location).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no asset stored at {location}"),
            )
        })
    }
}

/// Decoded assets for both watermark layers.
pub struct WatermarkAssets {
    /// Full-resolution logo.
    pub logo: RgbaImage,
    /// Full-resolution icon.
    pub icon: RgbaImage,
    /// Renderer for the text label.
    pub text: Box<dyn TextRenderer>,
}

impl std::fmt::Debug for WatermarkAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkAssets")
            .field("logo", &self.logo.dimensions())
            .field("icon", &self.icon.dimensions())
            .finish_non_exhaustive()
    }
}

impl WatermarkAssets {
    /// Load the logo, icon and font named in `style`.
    ///
    /// The three loads run concurrently with the `parallel` feature; all of
    /// them must succeed.
    ///
    /// # Errors
    ///
    /// Returns the first failing load, checked in logo, icon, font order.
    pub fn load(style: &WatermarkStyle, loader: &dyn AssetLoader) -> Result<Self> {
        let load_logo = || loader.load_image(AssetKind::Logo, &style.logo.source);
        let load_icon = || loader.load_image(AssetKind::Icon, &style.icon.source);
        let load_font = || loader.load_font(&style.text.font);

        #[cfg(feature = "parallel")]
        let (logo, (icon, font)) = rayon::join(load_logo, || rayon::join(load_icon, load_font));

        #[cfg(not(feature = "parallel"))]
        let (logo, (icon, font)) = (load_logo(), (load_icon(), load_font()));

        let assets = Self {
            logo: logo?,
            icon: icon?,
            text: Box::new(font?),
        };
        tracing::debug!(
            logo = ?assets.logo.dimensions(),
            icon = ?assets.icon.dimensions(),
            font = %style.text.font,
            "watermark assets loaded"
        );
        Ok(assets)
    }
}
