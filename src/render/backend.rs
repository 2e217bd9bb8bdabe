//! Rasterizer trait and shared types.
//!
//! The [`Rasterizer`] trait defines the three operations the export pipeline
//! needs: identify entry sizes, measure message text, and paint a laid-out
//! scene. The production implementation is
//! [`RustRasterizer`](super::rust_backend::RustRasterizer); tests use the
//! recording mock in this module.

use super::layout::CompositionLayout;
use crate::banner::BannerConfig;
use crate::types::ImageEntry;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Everything a rasterizer needs to paint one composition.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub layout: &'a CompositionLayout,
    pub banner: &'a BannerConfig,
    /// Same length and order as `layout.images`.
    pub images: &'a [ImageEntry],
}

pub trait Rasterizer: Sync {
    /// Natural pixel size of each entry, in order; `None` when an entry
    /// cannot be decoded.
    fn identify(&self, entries: &[ImageEntry]) -> Vec<Option<Dimensions>>;

    /// Advance width of `text` at `px` in CSS pixels.
    fn measure_text(&self, text: &str, px: f32) -> f32;

    /// Paint the scene at `scale` device pixels per CSS pixel.
    ///
    /// The returned image is exactly `layout.width * scale` by
    /// `layout.height * scale`.
    fn rasterize(&self, scene: &Scene<'_>, scale: u32) -> Result<RgbaImage, RenderError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::render::text::fallback_measure;
    use std::sync::Mutex;

    /// Mock rasterizer that records operations and paints a blank canvas.
    /// Uses Mutex (not RefCell) so it is Sync like the real backend.
    #[derive(Default)]
    pub struct MockRasterizer {
        pub dimensions: Vec<Option<Dimensions>>,
        pub fail: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Rasterize {
            width: u32,
            height: u32,
            scale: u32,
            images: usize,
        },
    }

    impl MockRasterizer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Entry `i` identifies as `dims[i]`; entries past the end are undecodable.
        pub fn with_dimensions(dims: Vec<(u32, u32)>) -> Self {
            Self {
                dimensions: dims
                    .into_iter()
                    .map(|(width, height)| Some(Dimensions { width, height }))
                    .collect(),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl Rasterizer for MockRasterizer {
        fn identify(&self, entries: &[ImageEntry]) -> Vec<Option<Dimensions>> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(entries.len()));
            (0..entries.len())
                .map(|i| self.dimensions.get(i).copied().flatten())
                .collect()
        }

        fn measure_text(&self, text: &str, px: f32) -> f32 {
            fallback_measure(text, px)
        }

        fn rasterize(&self, scene: &Scene<'_>, scale: u32) -> Result<RgbaImage, RenderError> {
            self.operations.lock().unwrap().push(RecordedOp::Rasterize {
                width: scene.layout.width,
                height: scene.layout.height,
                scale,
                images: scene.images.len(),
            });
            if self.fail {
                return Err(RenderError::RasterizationFailed("mock failure".to_string()));
            }
            Ok(RgbaImage::new(
                scene.layout.width * scale,
                scene.layout.height * scale,
            ))
        }
    }

    #[test]
    fn mock_identifies_past_end_as_undecodable() {
        let mock = MockRasterizer::with_dimensions(vec![(10, 20)]);
        let entries = vec![
            crate::test_helpers::entry("a"),
            crate::test_helpers::entry("b"),
        ];
        let dims = mock.identify(&entries);
        assert_eq!(
            dims,
            vec![
                Some(Dimensions {
                    width: 10,
                    height: 20
                }),
                None
            ]
        );
        assert_eq!(mock.get_operations(), vec![RecordedOp::Identify(2)]);
    }
}
