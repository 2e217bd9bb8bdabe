//! QR codes at error-correction level H.

use super::{CodeError, CodeGraphic, MAX_EDGE, Modules, Symbology};
use image::{Rgba, RgbaImage};
use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};

/// Light modules around the symbol, on every side.
pub const QUIET_ZONE: usize = 4;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Encode `payload` as a `size × size` QR graphic.
pub fn encode(payload: &str, size: u32) -> Result<CodeGraphic, CodeError> {
    if payload.is_empty() {
        return Err(CodeError::EmptyPayload);
    }
    if size == 0 || size > MAX_EDGE {
        return Err(CodeError::TooLarge(format!("QR size {size}")));
    }
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
    let (width, dark) = padded_modules(&code);

    // One SVG unit per module; the outer element is sized for display.
    let svg = code
        .render::<svg::Color<'_>>()
        .quiet_zone(true)
        .module_dimensions(1, 1)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build()
        .replacen(
            &format!(r#"width="{width}" height="{width}""#),
            &format!(r#"width="{size}" height="{size}""#),
            1,
        );

    Ok(CodeGraphic {
        symbology: Symbology::Matrix,
        payload: payload.to_string(),
        svg,
        width: size,
        height: size,
        modules: Modules::Matrix { width, dark },
    })
}

/// Module grid with the quiet zone added, row-major.
fn padded_modules(code: &QrCode) -> (usize, Vec<bool>) {
    let inner = code.width();
    let width = inner + 2 * QUIET_ZONE;
    let mut dark = vec![false; width * width];
    for (i, color) in code.to_colors().iter().enumerate() {
        if *color == Color::Dark {
            let (x, y) = (i % inner, i / inner);
            dark[(y + QUIET_ZONE) * width + x + QUIET_ZONE] = true;
        }
    }
    (width, dark)
}

/// Sample the grid onto a `size × size` canvas.
pub fn rasterize(width: usize, dark: &[bool], size: u32) -> RgbaImage {
    if width == 0 {
        return RgbaImage::from_pixel(size, size, LIGHT);
    }
    RgbaImage::from_fn(size, size, |x, y| {
        let mx = x as usize * width / size as usize;
        let my = y as usize * width / size as usize;
        if dark.get(my * width + mx).copied().unwrap_or(false) {
            DARK
        } else {
            LIGHT
        }
    })
}
