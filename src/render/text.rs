//! Message text: font discovery, measurement and glyph drawing via `rusttype`.

use super::color::blend;
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::path::Path;

/// Fonts tried, in order, when no font is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Average advance assumed per character when no font is available.
pub const FALLBACK_ADVANCE: f32 = 0.55;

/// Width of `text` at `px` without a font.
pub fn fallback_measure(text: &str, px: f32) -> f32 {
    text.chars().count() as f32 * px * FALLBACK_ADVANCE
}

pub struct Typeface {
    font: Font<'static>,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl Typeface {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    /// Load a TTF/OTF file. `None` when unreadable or not a font.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        Self::from_bytes(bytes)
    }

    /// The configured font if set, else the first system font that loads.
    pub fn discover(configured: &str) -> Option<Self> {
        if !configured.is_empty() {
            let face = Self::load(Path::new(configured));
            if face.is_none() {
                tracing::warn!(font = configured, "configured font could not be loaded");
            }
            return face;
        }
        SYSTEM_FONT_CANDIDATES.iter().find_map(|candidate| {
            let face = Self::load(Path::new(candidate))?;
            tracing::debug!(font = candidate, "using system font");
            Some(face)
        })
    }

    /// Advance width of `text` at `px`, kerning included.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        let scale = Scale::uniform(px);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Ascent minus descent at `px`.
    pub fn line_extent(&self, px: f32) -> f32 {
        let v = self.font.v_metrics(Scale::uniform(px));
        v.ascent - v.descent
    }

    /// Draw `text` with its em box top-left at `(x, y)`.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, px: f32, x: f32, y: f32, color: Rgba<u8>) {
        let scale = Scale::uniform(px);
        let ascent = self.font.v_metrics(scale).ascent;
        let (width, height) = img.dimensions();

        for glyph in self.font.layout(text, scale, point(x, y + ascent)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                blend(img.get_pixel_mut(px as u32, py as u32), color, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fallback_measure_counts_chars() {
        assert_eq!(fallback_measure("", 24.0), 0.0);
        // 8 chars * 24 * 0.55
        assert!((fallback_measure("Welcome!", 24.0) - 105.6).abs() < 1e-3);
        // counts chars, not bytes
        assert_eq!(fallback_measure("éé", 10.0), fallback_measure("ee", 10.0));
    }

    #[test]
    fn load_rejects_non_font_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fake.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(Typeface::load(&path).is_none());
        assert!(Typeface::load(&tmp.path().join("missing.ttf")).is_none());
    }

    #[test]
    fn discover_with_bad_configured_path_does_not_fall_back() {
        assert!(Typeface::discover("/nonexistent/font.ttf").is_none());
    }

    #[test]
    fn system_font_measures_and_draws_when_present() {
        // Hosts without any of the candidate fonts skip the glyph checks.
        let Some(face) = Typeface::discover("") else {
            return;
        };
        let short = face.measure("Hi", 24.0);
        let long = face.measure("Hi there", 24.0);
        assert!(short > 0.0);
        assert!(long > short);

        let mut img = RgbaImage::from_pixel(100, 40, Rgba([255, 255, 255, 255]));
        face.draw(&mut img, "Hi", 24.0, 4.0, 4.0, Rgba([0, 0, 0, 255]));
        assert!(img.pixels().any(|p| p[0] < 128));
    }
}
