//! Shared test utilities for the banner-studio test suite.
//!
//! Synthetic images are generated in memory with `image::RgbImage::from_fn`,
//! so no test depends on fixture files.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut model = model_with(&["a", "b"]);
//! model.add_image(png_entry("c", 40, 30));
//! assert_eq!(labels(&model), ["a", "b", "c"]);
//! ```

use std::path::Path;

use image::{ImageEncoder, RgbImage};

use crate::composition::CompositionModel;
use crate::types::ImageEntry;

// =========================================================================
// Synthetic images
// =========================================================================

/// PNG-encoded gradient test image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Write a PNG test image to `path`.
pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, png_bytes(width, height)).unwrap();
}

// =========================================================================
// Entries and models
// =========================================================================

/// A non-image entry; enough for tests that only care about ordering.
pub fn entry(label: &str) -> ImageEntry {
    ImageEntry::from_bytes(label, label.as_bytes())
}

/// A decodable PNG entry of the given size.
pub fn png_entry(label: &str, width: u32, height: u32) -> ImageEntry {
    ImageEntry::from_bytes(label, &png_bytes(width, height))
}

/// Model holding one [`entry`] per label, in order.
pub fn model_with(labels: &[&str]) -> CompositionModel {
    let mut model = CompositionModel::default();
    for label in labels {
        model.add_image(entry(label));
    }
    model
}

/// Labels of the model's images, in sequence order.
pub fn labels(model: &CompositionModel) -> Vec<String> {
    model.images().iter().map(|e| e.label.clone()).collect()
}
