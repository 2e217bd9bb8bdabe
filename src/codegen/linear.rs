//! Code 128 barcodes with an automatically chosen character set.
//!
//! ```text
//! ┌ margin ───────────────────────────────┐
//! │ ▌▌ ▌▌▌ ▌ ▌▌  ▌▌▌ ▌  ▌▌ ▌▌▌▌ ▌ ▌▌   ▌▌ │  bar_height
//! │               payload                 │  text_margin + font_size
//! └───────────────────────────────────────┘
//! ```

use super::{CodeError, CodeGraphic, MAX_EDGE, Modules, Symbology};
use crate::config::CodeSettings;
use crate::render::Typeface;
use barcoders::sym::code128::Code128;
use image::{Rgba, RgbaImage};
use maud::html;

const BAR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel geometry of a rendered barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    /// Width of one module.
    pub bar_width: u32,
    pub bar_height: u32,
    pub margin: u32,
    pub font_size: u32,
    pub text_margin: u32,
    pub display_value: bool,
}

impl BarGeometry {
    pub fn from_settings(settings: &CodeSettings) -> Self {
        Self {
            bar_width: settings.barcode_bar_width,
            bar_height: settings.barcode_height,
            display_value: settings.barcode_display_value,
            ..Self::default()
        }
    }

    /// Pixel size for `modules` bar modules; `None` when it does not fit in `u32`.
    pub fn size(&self, modules: usize) -> Option<(u32, u32)> {
        let margins = self.margin.checked_mul(2)?;
        let width = u32::try_from(modules)
            .ok()?
            .checked_mul(self.bar_width)?
            .checked_add(margins)?;
        let caption = if self.display_value {
            self.text_margin.checked_add(self.font_size)?
        } else {
            0
        };
        let height = self.bar_height.checked_add(caption)?.checked_add(margins)?;
        Some((width, height))
    }
}

impl Default for BarGeometry {
    fn default() -> Self {
        Self {
            bar_width: 2,
            bar_height: 100,
            margin: 10,
            font_size: 20,
            text_margin: 2,
            display_value: true,
        }
    }
}

/// Code 128 character sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Uppercase, digits, punctuation and control characters.
    A,
    /// Printable ASCII.
    B,
    /// Digit pairs.
    C,
}

impl Charset {
    /// Start character `barcoders` expects at the front of the data.
    fn start_char(self) -> char {
        match self {
            Charset::A => 'À',
            Charset::B => 'Ɓ',
            Charset::C => 'Ć',
        }
    }
}

/// Set a single byte can only be encoded in, if it is limited to one:
/// control characters exist only in A, lowercase and ``` ` { | } ~ DEL ``` only in B.
fn required_set(byte: u8) -> Option<Charset> {
    match byte {
        0x00..=0x1F => Some(Charset::A),
        0x60..=0x7F => Some(Charset::B),
        _ => None,
    }
}

/// Pick the character set the symbol starts in.
///
/// C for all-digit payloads of even length ≥ 4. Otherwise the set of the
/// first byte that needs one, B when no byte does.
pub fn charset_for(payload: &str) -> Result<Charset, CodeError> {
    if !payload.is_ascii() {
        return Err(CodeError::NonAscii);
    }
    let digits_only = payload.bytes().all(|b| b.is_ascii_digit());
    if digits_only && payload.len() >= 4 && payload.len() % 2 == 0 {
        return Ok(Charset::C);
    }
    Ok(payload
        .bytes()
        .find_map(required_set)
        .unwrap_or(Charset::B))
}

/// Payload prefixed with its start character, with a set switch wherever a
/// byte cannot be encoded in the current set (A ↔ B).
pub fn symbol_data(payload: &str) -> Result<String, CodeError> {
    let start = charset_for(payload)?;
    let mut data = String::with_capacity(payload.len() + 2);
    data.push(start.start_char());
    if start == Charset::C {
        data.push_str(payload);
        return Ok(data);
    }
    let mut current = start;
    for byte in payload.bytes() {
        if let Some(set) = required_set(byte)
            && set != current
        {
            data.push(set.start_char());
            current = set;
        }
        data.push(byte as char);
    }
    Ok(data)
}

pub fn encode(payload: &str, geometry: &BarGeometry) -> Result<CodeGraphic, CodeError> {
    if payload.is_empty() {
        return Err(CodeError::EmptyPayload);
    }
    let data = symbol_data(payload)?;
    let bars = Code128::new(data)
        .map_err(|e| CodeError::Linear(format!("{e:?}")))?
        .encode();
    let (width, height) = geometry
        .size(bars.len())
        .filter(|&(w, h)| w <= MAX_EDGE && h <= MAX_EDGE)
        .ok_or_else(|| {
            CodeError::TooLarge(format!(
                "{} modules at bar width {}",
                bars.len(),
                geometry.bar_width
            ))
        })?;
    let caption = geometry.display_value.then(|| payload.to_string());
    let svg = render_svg(&bars, geometry, caption.as_deref(), width, height);

    Ok(CodeGraphic {
        symbology: Symbology::Linear,
        payload: payload.to_string(),
        svg,
        width,
        height,
        modules: Modules::Linear {
            bars,
            geometry: *geometry,
            caption,
        },
    })
}

/// Consecutive bar modules merged into `(start, length)` runs.
fn bar_runs(bars: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &module) in bars.iter().enumerate() {
        match (module == 1, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, bars.len() - s));
    }
    runs
}

fn render_svg(
    bars: &[u8],
    geometry: &BarGeometry,
    caption: Option<&str>,
    width: u32,
    height: u32,
) -> String {
    let m = geometry.margin;
    html! {
        svg xmlns="http://www.w3.org/2000/svg" version="1.1"
            width=(width) height=(height) viewBox=(format!("0 0 {width} {height}")) {
            rect x="0" y="0" width=(width) height=(height) fill="#ffffff" {}
            g fill="#000000" {
                @for (start, len) in bar_runs(bars) {
                    rect x=(m + start as u32 * geometry.bar_width) y=(m)
                        width=(len as u32 * geometry.bar_width) height=(geometry.bar_height) {}
                }
            }
            @if let Some(text) = caption {
                text x=(width / 2) y=(m + geometry.bar_height + geometry.text_margin + geometry.font_size)
                    text-anchor="middle" font-family="monospace" font-size=(geometry.font_size) {
                    (text)
                }
            }
        }
    }
    .into_string()
}

/// Paint bars and caption onto a `width × height` canvas, the size
/// [`encode`] computed for the graphic.
pub fn rasterize(
    bars: &[u8],
    geometry: &BarGeometry,
    caption: Option<&str>,
    typeface: Option<&Typeface>,
    (width, height): (u32, u32),
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    let m = geometry.margin;

    for (start, len) in bar_runs(bars) {
        let x0 = m + start as u32 * geometry.bar_width;
        for x in x0..x0 + len as u32 * geometry.bar_width {
            for y in m..m + geometry.bar_height {
                img.put_pixel(x, y, BAR);
            }
        }
    }

    if let Some(text) = caption {
        match typeface {
            Some(face) => {
                let px = geometry.font_size as f32;
                let text_w = face.measure(text, px);
                let x = ((width as f32 - text_w) / 2.0).max(0.0);
                let y = (m + geometry.bar_height + geometry.text_margin) as f32;
                face.draw(&mut img, text, px, x, y, BAR);
            }
            None => tracing::debug!("no font loaded; barcode caption skipped"),
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_selection() {
        assert_eq!(charset_for("12345678").unwrap(), Charset::C);
        assert_eq!(charset_for("1234").unwrap(), Charset::C);
        // odd length or too short stays in B
        assert_eq!(charset_for("12345").unwrap(), Charset::B);
        assert_eq!(charset_for("12").unwrap(), Charset::B);
        assert_eq!(charset_for("https://example.com").unwrap(), Charset::B);
        assert_eq!(charset_for("TAB\tHERE").unwrap(), Charset::A);
        // starts in the set of the first byte that needs one
        assert_eq!(charset_for("hello\tworld").unwrap(), Charset::B);
        assert!(matches!(charset_for("café"), Err(CodeError::NonAscii)));
    }

    #[test]
    fn symbol_data_switches_sets_around_control_characters() {
        assert_eq!(symbol_data("HELLO").unwrap(), "ƁHELLO");
        assert_eq!(symbol_data("1234").unwrap(), "Ć1234");
        assert_eq!(symbol_data("TAB\tHERE").unwrap(), "ÀTAB\tHERE");
        assert_eq!(symbol_data("hello\tworld").unwrap(), "ƁhelloÀ\tƁworld");
        assert_eq!(symbol_data("\nline").unwrap(), "À\nƁline");
    }

    #[test]
    fn mixed_control_and_lowercase_payload_encodes() {
        let geometry = BarGeometry::default();
        let mixed = encode("hello\tworld", &geometry).unwrap();
        let plain = encode("helloXworld", &geometry).unwrap();
        // two extra switch symbols of 11 modules each
        assert_eq!(mixed.width, plain.width + 2 * 11 * geometry.bar_width);
        assert!(encode("line one\r\nline two", &geometry).is_ok());
    }

    #[test]
    fn oversized_geometry_is_an_error_not_a_panic() {
        let wide = BarGeometry {
            bar_width: 100_000_000,
            ..BarGeometry::default()
        };
        assert_eq!(wide.size(100), None);
        assert!(matches!(
            encode("https://example.com", &wide),
            Err(CodeError::TooLarge(_))
        ));

        let tall = BarGeometry {
            bar_height: u32::MAX - 10,
            ..BarGeometry::default()
        };
        assert_eq!(tall.size(10), None);
        assert!(matches!(encode("HELLO", &tall), Err(CodeError::TooLarge(_))));
    }

    #[test]
    fn geometry_matches_defaults() {
        let geometry = BarGeometry::from_settings(&CodeSettings::default());
        assert_eq!(geometry, BarGeometry::default());
        // 100 modules: 200 + 20 wide, 100 + 22 + 20 tall
        assert_eq!(geometry.size(100), Some((220, 142)));

        let bare = BarGeometry {
            display_value: false,
            ..geometry
        };
        assert_eq!(bare.size(100), Some((220, 120)));
    }

    #[test]
    fn encodes_url_and_sizes_graphic() {
        let geometry = BarGeometry::default();
        let graphic = encode("https://example.com", &geometry).unwrap();
        let Modules::Linear { bars, caption, .. } = &graphic.modules else {
            panic!("expected linear modules");
        };
        assert!(!bars.is_empty());
        assert!(bars.iter().all(|&b| b <= 1));
        // Code 128 symbols start with a bar and end with the stop pattern's bar
        assert_eq!(bars.first(), Some(&1));
        assert_eq!(bars.last(), Some(&1));
        assert_eq!(caption.as_deref(), Some("https://example.com"));
        assert_eq!(Some((graphic.width, graphic.height)), geometry.size(bars.len()));
    }

    #[test]
    fn svg_escapes_caption() {
        let graphic = encode("a<b&c", &BarGeometry::default()).unwrap();
        assert!(graphic.svg.starts_with("<svg"));
        assert!(graphic.svg.contains("a&lt;b&amp;c"));
    }

    #[test]
    fn numeric_payload_is_shorter_in_charset_c() {
        let geometry = BarGeometry::default();
        let numeric = encode("12345678", &geometry).unwrap();
        let text = encode("abcdefgh", &geometry).unwrap();
        assert!(numeric.width < text.width);
    }

    #[test]
    fn non_ascii_and_empty_payloads_fail() {
        let geometry = BarGeometry::default();
        assert!(matches!(encode("naïve", &geometry), Err(CodeError::NonAscii)));
        assert!(matches!(encode("", &geometry), Err(CodeError::EmptyPayload)));
    }

    #[test]
    fn raster_paints_bars_inside_margin() {
        let graphic = encode("HELLO", &BarGeometry::default()).unwrap();
        let img = graphic.to_image(None);
        assert_eq!(img.dimensions(), (graphic.width, graphic.height));
        // Margin is white, first module is a bar
        assert_eq!(*img.get_pixel(5, 50), BACKGROUND);
        assert_eq!(*img.get_pixel(10, 50), BAR);
        // Below the bars is caption space
        assert_eq!(*img.get_pixel(10, 115), BACKGROUND);
    }

    #[test]
    fn runs_merge_adjacent_bars() {
        assert_eq!(bar_runs(&[1, 1, 0, 1, 0, 0, 1, 1, 1]), vec![(0, 2), (3, 1), (6, 3)]);
        assert!(bar_runs(&[0, 0]).is_empty());
    }
}
