//! Pure Rust rasterizer: paints a laid-out composition into an RGBA canvas.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode entries | `image::load_from_memory` (pure Rust decoders) |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Fit entry to its box | `DynamicImage::resize_exact`, `Lanczos3`, in parallel on `rayon` |
//! | Background image (cover) | `DynamicImage::resize_to_fill`, `Lanczos3` |
//! | Message text | `rusttype` glyph coverage, alpha blended |
//! | Remote background | `reqwest` blocking client (feature `remote`) |
//!
//! Painting order: white container, banner background, message card, text,
//! images (or placeholders) top to bottom.

use super::backend::{Dimensions, Rasterizer, RenderError, Scene};
use super::color::{blend, mix, parse_hex};
use super::layout::{CompositionLayout, Rect};
use super::source::{DefaultResolver, ImageResolver, load_image, probe_dimensions};
use super::text::{Typeface, fallback_measure};
use crate::banner::Background;
use crate::config::EditorConfig;
use crate::types::ImageEntry;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// `bg-white/90`
pub const CARD_FILL: Rgba<u8> = Rgba([255, 255, 255, 230]);
/// `text-gray-800`
pub const TEXT_COLOR: Rgba<u8> = Rgba([0x1F, 0x29, 0x37, 255]);
/// `bg-gray-100`
pub const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xF3, 0xF4, 0xF6, 255]);

/// Largest canvas, in pixels, that will be allocated.
pub const MAX_CANVAS_PIXELS: u64 = 268_435_456;

pub struct RustRasterizer<R: ImageResolver = DefaultResolver> {
    resolver: R,
    typeface: Option<Typeface>,
    warned_no_font: AtomicBool,
}

impl RustRasterizer<DefaultResolver> {
    pub fn new(typeface: Option<Typeface>) -> Self {
        Self::with_resolver(DefaultResolver::default(), typeface)
    }

    /// Font from `[text]`, fetch timeout from `[network]`.
    pub fn from_config(config: &EditorConfig) -> Self {
        let typeface = Typeface::discover(&config.text.font);
        if typeface.is_none() {
            tracing::debug!("no usable font found");
        }
        Self::with_resolver(
            DefaultResolver::new(Duration::from_secs(config.network.timeout_secs)),
            typeface,
        )
    }
}

impl<R: ImageResolver> RustRasterizer<R> {
    pub fn with_resolver(resolver: R, typeface: Option<Typeface>) -> Self {
        Self {
            resolver,
            typeface,
            warned_no_font: AtomicBool::new(false),
        }
    }

    pub fn has_font(&self) -> bool {
        self.typeface.is_some()
    }

    /// Decode an entry and fit it to its (device pixel) content box.
    fn prepare_picture(&self, entry: &ImageEntry, content: Rect) -> Option<RgbaImage> {
        if content.width == 0 || content.height == 0 {
            return None;
        }
        match load_image(&self.resolver, entry.data_url()) {
            Ok(img) => Some(
                img.resize_exact(content.width, content.height, FilterType::Lanczos3)
                    .to_rgba8(),
            ),
            Err(e) => {
                tracing::warn!(image = %entry.label, error = %e, "entry could not be decoded");
                None
            }
        }
    }

    fn paint_banner(&self, canvas: &mut RgbaImage, banner: Background<'_>, rect: Rect) {
        match banner {
            Background::Solid { color } => match parse_hex(color) {
                Some(c) => fill_rect(canvas, rect, c),
                None => tracing::warn!(color, "unparseable banner color; background left blank"),
            },
            Background::Gradient { color_a, color_b } => {
                match (parse_hex(color_a), parse_hex(color_b)) {
                    (Some(a), Some(b)) => fill_diagonal_gradient(canvas, rect, a, b),
                    _ => tracing::warn!(
                        color_a,
                        color_b,
                        "unparseable gradient stop; background left blank"
                    ),
                }
            }
            Background::Image { url } => {
                if url.trim().is_empty() {
                    tracing::debug!("no background image set");
                    return;
                }
                match load_image(&self.resolver, url) {
                    Ok(img) => {
                        let cover = img
                            .resize_to_fill(rect.width, rect.height, FilterType::Lanczos3)
                            .to_rgba8();
                        draw_picture(canvas, &cover, rect, rect, 0.0);
                    }
                    Err(e) => {
                        tracing::warn!(url, error = %e, "background image unresolved; left blank")
                    }
                }
            }
        }
    }

    fn paint_text(&self, canvas: &mut RgbaImage, layout: &CompositionLayout, scale: u32) {
        if layout.lines.is_empty() {
            return;
        }
        let Some(face) = &self.typeface else {
            if !self.warned_no_font.swap(true, Ordering::Relaxed) {
                tracing::warn!("no font loaded; message text skipped");
            }
            return;
        };
        let px = layout.font_size * scale as f32;
        let extent = face.line_extent(px);
        for line in &layout.lines {
            let rect = line.rect.scaled(scale);
            let width = face.measure(&line.text, px);
            let x = rect.x as f32 + ((rect.width as f32 - width) / 2.0).max(0.0);
            let y = rect.y as f32 + (rect.height as f32 - extent) / 2.0;
            face.draw(canvas, &line.text, px, x, y, TEXT_COLOR);
        }
    }
}

impl<R: ImageResolver> Rasterizer for RustRasterizer<R> {
    fn identify(&self, entries: &[ImageEntry]) -> Vec<Option<Dimensions>> {
        entries
            .par_iter()
            .map(|entry| {
                let bytes = self.resolver.fetch(entry.data_url()).ok()?;
                let (width, height) = probe_dimensions(&bytes).ok()?;
                Some(Dimensions { width, height })
            })
            .collect()
    }

    fn measure_text(&self, text: &str, px: f32) -> f32 {
        match &self.typeface {
            Some(face) => face.measure(text, px),
            None => fallback_measure(text, px),
        }
    }

    fn rasterize(&self, scene: &Scene<'_>, scale: u32) -> Result<RgbaImage, RenderError> {
        let layout = scene.layout;
        if scene.images.len() != layout.images.len() {
            return Err(RenderError::RasterizationFailed(format!(
                "{} entries but {} image slots",
                scene.images.len(),
                layout.images.len()
            )));
        }
        let (width, height) = canvas_size(layout, scale)?;
        let mut canvas = RgbaImage::from_pixel(width, height, WHITE);

        let pictures: Vec<Option<RgbaImage>> = scene
            .images
            .par_iter()
            .zip(layout.images.par_iter())
            .map(|(entry, slot)| {
                let content = slot.content?;
                self.prepare_picture(entry, content.scaled(scale))
            })
            .collect();

        self.paint_banner(
            &mut canvas,
            scene.banner.background().background(),
            layout.banner.scaled(scale),
        );
        fill_rounded_rect(
            &mut canvas,
            layout.card.scaled(scale),
            (layout.card_radius * scale) as f32,
            CARD_FILL,
        );
        self.paint_text(&mut canvas, layout, scale);

        let radius = (layout.image_radius * scale) as f32;
        for (slot, picture) in layout.images.iter().zip(pictures) {
            let frame = slot.frame.scaled(scale);
            match (picture, slot.content) {
                (Some(picture), Some(content)) => {
                    draw_picture(&mut canvas, &picture, content.scaled(scale), frame, radius)
                }
                _ => fill_rounded_rect(&mut canvas, frame, radius, PLACEHOLDER_FILL),
            }
        }

        Ok(canvas)
    }
}

/// Device-pixel canvas size, refusing sizes that cannot be allocated.
pub fn canvas_size(layout: &CompositionLayout, scale: u32) -> Result<(u32, u32), RenderError> {
    let too_large = || {
        RenderError::RasterizationFailed(format!(
            "canvas {}x{} at {scale}x exceeds the size limit",
            layout.width, layout.height
        ))
    };
    let width = layout.width.checked_mul(scale).ok_or_else(too_large)?;
    let height = layout.height.checked_mul(scale).ok_or_else(too_large)?;
    if width as u64 * height as u64 > MAX_CANVAS_PIXELS {
        return Err(too_large());
    }
    Ok((width, height))
}

// =============================================================================
// Pixel operations
// =============================================================================

/// Pixel rows/columns of `rect` that fall on the canvas.
fn clipped(canvas: &RgbaImage, rect: Rect) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
    let x_end = (rect.x + rect.width).min(canvas.width());
    let y_end = (rect.y + rect.height).min(canvas.height());
    (rect.x.min(x_end)..x_end, rect.y.min(y_end)..y_end)
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (xs, ys) = clipped(canvas, rect);
    for y in ys {
        for x in xs.clone() {
            blend(canvas.get_pixel_mut(x, y), color, 1.0);
        }
    }
}

/// `linear-gradient(45deg, a, b)`: `a` at the bottom-left corner, `b` at the
/// top-right, the gradient line long enough to reach both corners.
fn fill_diagonal_gradient(canvas: &mut RgbaImage, rect: Rect, a: Rgba<u8>, b: Rgba<u8>) {
    let span = (rect.width + rect.height) as f32;
    if span == 0.0 {
        return;
    }
    let cx = rect.x as f32 + rect.width as f32 / 2.0;
    let cy = rect.y as f32 + rect.height as f32 / 2.0;
    let (xs, ys) = clipped(canvas, rect);
    for y in ys {
        let dy = y as f32 + 0.5 - cy;
        for x in xs.clone() {
            let dx = x as f32 + 0.5 - cx;
            let t = 0.5 + (dx - dy) / span;
            blend(canvas.get_pixel_mut(x, y), mix(a, b, t), 1.0);
        }
    }
}

/// Antialiased coverage of the pixel at `(x, y)` by `rect` with corner `radius`.
fn rounded_coverage(x: u32, y: u32, rect: Rect, radius: f32) -> f32 {
    let r = radius
        .min(rect.width as f32 / 2.0)
        .min(rect.height as f32 / 2.0);
    if r <= 0.0 {
        return 1.0;
    }
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let left = rect.x as f32 + r;
    let right = (rect.x + rect.width) as f32 - r;
    let top = rect.y as f32 + r;
    let bottom = (rect.y + rect.height) as f32 - r;
    let dx = px - px.clamp(left, right);
    let dy = py - py.clamp(top, bottom);
    let dist = (dx * dx + dy * dy).sqrt();
    (r - dist + 0.5).clamp(0.0, 1.0)
}

fn fill_rounded_rect(canvas: &mut RgbaImage, rect: Rect, radius: f32, color: Rgba<u8>) {
    let (xs, ys) = clipped(canvas, rect);
    for y in ys {
        for x in xs.clone() {
            let coverage = rounded_coverage(x, y, rect, radius);
            blend(canvas.get_pixel_mut(x, y), color, coverage);
        }
    }
}

/// Composite `picture` at `content`, clipped to `frame`'s rounded corners.
fn draw_picture(canvas: &mut RgbaImage, picture: &RgbaImage, content: Rect, frame: Rect, radius: f32) {
    for (px, py, pixel) in picture.enumerate_pixels() {
        let (x, y) = (content.x + px, content.y + py);
        if x >= canvas.width() || y >= canvas.height() {
            continue;
        }
        let coverage = rounded_coverage(x, y, frame, radius);
        blend(canvas.get_pixel_mut(x, y), *pixel, coverage);
    }
}
