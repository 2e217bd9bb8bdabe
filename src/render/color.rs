//! CSS hex color parsing.

use image::Rgba;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
///
/// Returns `None` for anything else; callers treat that as "no paint".
pub fn parse_hex(input: &str) -> Option<Rgba<u8>> {
    let hex = input.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out[3] = 255;
            Some(Rgba(out))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 {
                channel(&hex[6..8])?
            } else {
                255
            };
            Some(Rgba([r, g, b, a]))
        }
        _ => None,
    }
}

/// Linear interpolation between two colors, `t` in `[0, 1]`.
pub fn mix(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgba([
        lerp(a[0], b[0]),
        lerp(a[1], b[1]),
        lerp(a[2], b[2]),
        lerp(a[3], b[3]),
    ])
}

/// Source-over blend of `src` onto an opaque-or-not `dst`, with extra coverage.
pub fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let s = src[i] as f32;
        let d = dst[i] as f32;
        let c = (s * sa + d * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(parse_hex("#FF6B6B"), Some(Rgba([255, 107, 107, 255])));
        assert_eq!(parse_hex("4ecdc4"), Some(Rgba([78, 205, 196, 255])));
    }

    #[test]
    fn parses_short_and_alpha_forms() {
        assert_eq!(parse_hex("#fff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_hex("#00000080"), Some(Rgba([0, 0, 0, 128])));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gggggg"), None);
        assert_eq!(parse_hex("#ééé"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn mix_endpoints_and_midpoint() {
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(mix(black, white, 0.0), black);
        assert_eq!(mix(black, white, 1.0), white);
        assert_eq!(mix(black, white, 0.5), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn blend_ninety_percent_white_over_black() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend(&mut dst, Rgba([255, 255, 255, 230]), 1.0);
        assert_eq!(dst, Rgba([230, 230, 230, 255]));
    }

    #[test]
    fn blend_zero_coverage_is_noop() {
        let mut dst = Rgba([10, 20, 30, 255]);
        blend(&mut dst, Rgba([255, 255, 255, 255]), 0.0);
        assert_eq!(dst, Rgba([10, 20, 30, 255]));
    }
}
