//! QR codes and barcodes for a text payload.
//!
//! Two symbologies share one shape: encode a payload into a [`CodeGraphic`]
//! holding an SVG for display plus the module data needed to re-rasterize it
//! to a PNG of exactly its display size.
//!
//! | Symbology | Crate | Display size |
//! |---|---|---|
//! | [`Symbology::Matrix`] (QR, level H) | `qrcode` | `qr_size` square, quiet zone included |
//! | [`Symbology::Linear`] (Code 128) | `barcoders` | bars + margin + caption |
//!
//! [`CodeGenSession`] holds the payload and decides when each graphic is
//! regenerated; [`download`] writes the PNG.

pub mod linear;
pub mod matrix;
mod session;

pub use session::CodeGenSession;

/// Longest edge, in pixels, of any generated graphic.
pub const MAX_EDGE: u32 = 16_384;

use crate::render::Typeface;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeError {
    #[error("nothing to encode")]
    EmptyPayload,
    #[error("QR encode failed: {0}")]
    Matrix(#[from] qrcode::types::QrError),
    #[error("barcode encode failed: {0}")]
    Linear(String),
    #[error("Code 128 cannot encode non-ASCII text")]
    NonAscii,
    #[error("graphic too large: {0}")]
    TooLarge(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Matrix,
    Linear,
}

impl Symbology {
    /// File written by [`download`].
    pub fn filename(self) -> &'static str {
        match self {
            Symbology::Matrix => "qr-code.png",
            Symbology::Linear => "barcode.png",
        }
    }
}

/// Module data behind a graphic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modules {
    /// Square grid, row-major, quiet zone included.
    Matrix { width: usize, dark: Vec<bool> },
    /// One entry per module: `1` bar, `0` space.
    Linear {
        bars: Vec<u8>,
        geometry: linear::BarGeometry,
        caption: Option<String>,
    },
}

/// An encoded payload ready for display or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGraphic {
    pub symbology: Symbology,
    pub payload: String,
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub modules: Modules,
}

impl CodeGraphic {
    /// Rasterize to exactly `width × height`. The caption of a linear code
    /// needs a typeface; without one it is left out.
    pub fn to_image(&self, typeface: Option<&Typeface>) -> RgbaImage {
        match &self.modules {
            Modules::Matrix { width, dark } => matrix::rasterize(*width, dark, self.width),
            Modules::Linear {
                bars,
                geometry,
                caption,
            } => linear::rasterize(
                bars,
                geometry,
                caption.as_deref(),
                typeface,
                (self.width, self.height),
            ),
        }
    }
}

/// Write the graphic as a PNG in `dir`, surfacing failures.
pub fn try_download(
    graphic: &CodeGraphic,
    typeface: Option<&Typeface>,
    dir: &Path,
) -> Result<PathBuf, CodeError> {
    let image = graphic.to_image(typeface);
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(graphic.symbology.filename());
    std::fs::write(&path, png)?;
    Ok(path)
}

/// Write the graphic as a PNG in `dir`. Failures are logged and yield `None`.
pub fn download(graphic: &CodeGraphic, typeface: Option<&Typeface>, dir: &Path) -> Option<PathBuf> {
    match try_download(graphic, typeface, dir) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::error!(error = %e, symbology = ?graphic.symbology, "code download failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodeSettings;
    use tempfile::TempDir;

    #[test]
    fn filenames_per_symbology() {
        assert_eq!(Symbology::Matrix.filename(), "qr-code.png");
        assert_eq!(Symbology::Linear.filename(), "barcode.png");
    }

    #[test]
    fn download_writes_png_at_display_size() {
        let tmp = TempDir::new().unwrap();
        let settings = CodeSettings::default();
        let qr = matrix::encode("https://example.com", settings.qr_size).unwrap();
        let bar = linear::encode("12345678", &linear::BarGeometry::from_settings(&settings)).unwrap();

        let qr_path = download(&qr, None, tmp.path()).unwrap();
        let bar_path = download(&bar, None, tmp.path()).unwrap();

        assert_eq!(qr_path, tmp.path().join("qr-code.png"));
        assert_eq!(image::image_dimensions(&qr_path).unwrap(), (200, 200));
        assert_eq!(
            image::image_dimensions(&bar_path).unwrap(),
            (bar.width, bar.height)
        );
    }

    #[test]
    fn download_into_unwritable_location_returns_none() {
        let tmp = TempDir::new().unwrap();
        // A file where the directory should be
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let qr = matrix::encode("hello", 200).unwrap();

        assert_eq!(download(&qr, None, &blocker.join("sub")), None);
    }
}
