//! Pure layout calculations for the composition.
//!
//! All functions here are pure and testable without any I/O or images. They
//! work in CSS pixels; the rasterizer multiplies by the export scale.
//!
//! ```text
//! ┌ container (width ≥ 800, padding 16, white) ───────────────┐
//! │ ┌ banner (padding 16, background) ──────────────────────┐ │
//! │ │      ┌ card (≤ 672 wide, padding 24×16, 90% white) ┐  │ │
//! │ │      │           message, 24px / 32px lines        │  │ │
//! │ │      └─────────────────────────────────────────────┘  │ │
//! │ └───────────────────────────────────────────────────────┘ │
//! │   16                                                      │
//! │ ┌ image 1 (full width, ≤ 800 tall, contained) ──────────┐ │
//! │ └───────────────────────────────────────────────────────┘ │
//! │   24                                                      │
//! │ ┌ image 2 ──────────────────────────────────────────────┐ │
//! │ └───────────────────────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```

use crate::config::LayoutSettings;

/// The composition is never laid out narrower than this.
pub const MIN_WIDTH: u32 = 800;

/// Geometry constants of the composition, in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub width: u32,
    pub padding: u32,
    pub banner_padding: u32,
    pub card_padding_x: u32,
    pub card_padding_y: u32,
    pub card_max_width: u32,
    pub card_radius: u32,
    pub font_size: f32,
    pub line_height: u32,
    /// Between the banner and the first image.
    pub section_gap: u32,
    /// Between consecutive images.
    pub image_gap: u32,
    pub image_max_height: u32,
    pub image_radius: u32,
    /// Height of the box drawn for an entry that cannot be decoded.
    pub placeholder_height: u32,
}

impl LayoutParams {
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self {
            width: settings.width.max(MIN_WIDTH),
            image_max_height: settings.image_max_height,
            ..Self::default()
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: MIN_WIDTH,
            padding: 16,
            banner_padding: 16,
            card_padding_x: 24,
            card_padding_y: 16,
            card_max_width: 672,
            card_radius: 12,
            font_size: 24.0,
            line_height: 32,
            section_gap: 16,
            image_gap: 24,
            image_max_height: 800,
            image_radius: 8,
            placeholder_height: 150,
        }
    }
}

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn scaled(self, factor: u32) -> Rect {
        Rect {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// One wrapped line of the message; the text is centered inside `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub rect: Rect,
}

/// Where one image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    /// The full-width image box.
    pub frame: Rect,
    /// The letterboxed picture inside the frame; `None` draws a placeholder.
    pub content: Option<Rect>,
}

/// Complete, un-scrolled layout of the composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionLayout {
    pub width: u32,
    pub height: u32,
    pub banner: Rect,
    pub card: Rect,
    pub lines: Vec<TextLine>,
    pub images: Vec<ImageSlot>,
    pub font_size: f32,
    pub card_radius: u32,
    pub image_radius: u32,
}

/// Fit an image of `natural` size into a box `box_width` wide and at most
/// `max_height` tall, preserving aspect ratio (CSS `object-fit: contain` on a
/// `width: 100%; height: auto; max-height` image).
///
/// Returns `(frame_height, content_width, content_height)`.
pub fn fit_image(natural: (u32, u32), box_width: u32, max_height: u32) -> (u32, u32, u32) {
    let (nat_w, nat_h) = natural;
    if nat_w == 0 || nat_h == 0 || box_width == 0 {
        return (0, 0, 0);
    }
    let full_height = (box_width as f64 * nat_h as f64 / nat_w as f64).round() as u32;
    if full_height <= max_height {
        (full_height, box_width, full_height)
    } else {
        let content_w = (max_height as f64 * nat_w as f64 / nat_h as f64).round() as u32;
        (max_height, content_w.min(box_width), max_height)
    }
}

/// Greedy word wrap; words wider than `max_width` are broken between characters.
///
/// Whitespace runs collapse to a single space, as in normal HTML flow. Text
/// with no visible characters produces no lines.
pub fn wrap_text(text: &str, max_width: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure(word) <= max_width {
            current = word.to_string();
            continue;
        }
        // Word alone is too wide: break it.
        for ch in word.chars() {
            let mut attempt = current.clone();
            attempt.push(ch);
            if !current.is_empty() && measure(&attempt) > max_width {
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            } else {
                current = attempt;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out banner and images.
///
/// `naturals` holds the natural pixel size of each image, in sequence order;
/// `None` marks an entry that cannot be decoded.
pub fn compute_layout(
    params: &LayoutParams,
    text: &str,
    naturals: &[Option<(u32, u32)>],
    measure: &dyn Fn(&str) -> f32,
) -> CompositionLayout {
    let width = params.width.max(MIN_WIDTH);
    let content_x = params.padding;
    let content_w = width.saturating_sub(2 * params.padding);
    let mut y = params.padding;

    // Banner and message card
    let banner_inner_w = content_w.saturating_sub(2 * params.banner_padding);
    let card_w = banner_inner_w.min(params.card_max_width);
    let text_w = card_w.saturating_sub(2 * params.card_padding_x);
    let wrapped = wrap_text(text, text_w as f32, measure);
    let card_h = wrapped.len() as u32 * params.line_height + 2 * params.card_padding_y;
    let banner_h = card_h + 2 * params.banner_padding;

    let banner = Rect {
        x: content_x,
        y,
        width: content_w,
        height: banner_h,
    };
    let card = Rect {
        x: content_x + params.banner_padding + (banner_inner_w - card_w) / 2,
        y: y + params.banner_padding,
        width: card_w,
        height: card_h,
    };
    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text,
            rect: Rect {
                x: card.x + params.card_padding_x,
                y: card.y + params.card_padding_y + i as u32 * params.line_height,
                width: text_w,
                height: params.line_height,
            },
        })
        .collect();
    y += banner_h;

    // Images, stacked in sequence order
    let mut images = Vec::with_capacity(naturals.len());
    if !naturals.is_empty() {
        y += params.section_gap;
    }
    for (i, natural) in naturals.iter().enumerate() {
        if i > 0 {
            y += params.image_gap;
        }
        let slot = match natural {
            Some(dims) => {
                let (frame_h, cw, ch) = fit_image(*dims, content_w, params.image_max_height);
                ImageSlot {
                    frame: Rect {
                        x: content_x,
                        y,
                        width: content_w,
                        height: frame_h,
                    },
                    content: Some(Rect {
                        x: content_x + (content_w - cw) / 2,
                        y,
                        width: cw,
                        height: ch,
                    }),
                }
            }
            None => ImageSlot {
                frame: Rect {
                    x: content_x,
                    y,
                    width: content_w,
                    height: params.placeholder_height,
                },
                content: None,
            },
        };
        y += slot.frame.height;
        images.push(slot);
    }
    y += params.padding;

    CompositionLayout {
        width,
        height: y,
        banner,
        card,
        lines,
        images,
        font_size: params.font_size,
        card_radius: params.card_radius,
        image_radius: params.image_radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 10px wide.
    fn mono(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    // =========================================================================
    // fit_image tests
    // =========================================================================

    #[test]
    fn fit_wide_image_scales_to_width() {
        // 1536x1024 into 768 wide → 768x512
        assert_eq!(fit_image((1536, 1024), 768, 800), (512, 768, 512));
    }

    #[test]
    fn fit_small_image_scales_up_to_width() {
        assert_eq!(fit_image((384, 256), 768, 800), (512, 768, 512));
    }

    #[test]
    fn fit_tall_image_is_letterboxed() {
        // 100x400 would be 3072 tall; capped at 800 and narrowed to 200
        assert_eq!(fit_image((100, 400), 768, 800), (800, 200, 800));
    }

    #[test]
    fn fit_zero_dimension_collapses() {
        assert_eq!(fit_image((0, 100), 768, 800), (0, 0, 0));
    }

    // =========================================================================
    // wrap_text tests
    // =========================================================================

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("Welcome!", 200.0, &mono), ["Welcome!"]);
    }

    #[test]
    fn wrap_breaks_between_words() {
        // 10 chars per line
        assert_eq!(
            wrap_text("hello big world", 100.0, &mono),
            ["hello big", "world"]
        );
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(
            wrap_text("abcdefghijkl", 50.0, &mono),
            ["abcde", "fghij", "kl"]
        );
    }

    #[test]
    fn wrap_collapses_whitespace() {
        assert_eq!(wrap_text("  a \n\n b  ", 100.0, &mono), ["a b"]);
        assert!(wrap_text("   ", 100.0, &mono).is_empty());
    }

    // =========================================================================
    // compute_layout tests
    // =========================================================================

    #[test]
    fn layout_banner_only() {
        let layout = compute_layout(&LayoutParams::default(), "Welcome!", &[], &mono);
        assert_eq!(layout.width, 800);
        // 16 + banner (16 + 16 + 32 + 16 + 16) + 16
        assert_eq!(layout.height, 128);
        assert_eq!(layout.banner, Rect { x: 16, y: 16, width: 768, height: 96 });
        assert_eq!(layout.card, Rect { x: 64, y: 32, width: 672, height: 64 });
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].rect, Rect { x: 88, y: 48, width: 624, height: 32 });
    }

    #[test]
    fn layout_stacks_images_in_order() {
        let layout = compute_layout(
            &LayoutParams::default(),
            "Welcome!",
            &[Some((384, 256)), Some((384, 260))],
            &mono,
        );
        assert_eq!(layout.images.len(), 2);
        assert_eq!(layout.images[0].frame, Rect { x: 16, y: 128, width: 768, height: 512 });
        assert_eq!(layout.images[1].frame, Rect { x: 16, y: 664, width: 768, height: 520 });
        assert_eq!(layout.height, 1200);
    }

    #[test]
    fn layout_centers_letterboxed_content() {
        let layout = compute_layout(
            &LayoutParams::default(),
            "Hi",
            &[Some((100, 400))],
            &mono,
        );
        let slot = layout.images[0];
        assert_eq!(slot.frame.height, 800);
        assert_eq!(
            slot.content,
            Some(Rect { x: 16 + 284, y: 128, width: 200, height: 800 })
        );
    }

    #[test]
    fn layout_undecodable_entry_gets_placeholder() {
        let layout = compute_layout(&LayoutParams::default(), "Hi", &[None], &mono);
        assert_eq!(layout.images[0].content, None);
        assert_eq!(layout.images[0].frame.height, 150);
        assert_eq!(layout.height, 128 + 16 + 150);
    }

    #[test]
    fn layout_long_message_grows_banner() {
        let text = "word ".repeat(40);
        let layout = compute_layout(&LayoutParams::default(), &text, &[], &mono);
        // 624px lines hold 12 "word " groups (59 chars fit, 64 do not)
        assert!(layout.lines.len() > 1);
        assert_eq!(
            layout.card.height,
            layout.lines.len() as u32 * 32 + 32
        );
    }

    #[test]
    fn params_never_narrower_than_minimum() {
        let params = LayoutParams::from_settings(&LayoutSettings {
            width: 320,
            image_max_height: 500,
        });
        assert_eq!(params.width, 800);
        assert_eq!(params.image_max_height, 500);

        let wide = LayoutParams::from_settings(&LayoutSettings {
            width: 1200,
            image_max_height: 800,
        });
        let layout = compute_layout(&wide, "Hi", &[], &mono);
        assert_eq!(layout.width, 1200);
        assert_eq!(layout.banner.width, 1168);
        // card stays capped at 672 and centered
        assert_eq!(layout.card.width, 672);
        assert_eq!(layout.card.x, 16 + 16 + (1136 - 672) / 2);
    }

    #[test]
    fn rect_scaling() {
        let r = Rect { x: 1, y: 2, width: 3, height: 4 };
        assert_eq!(r.scaled(2), Rect { x: 2, y: 4, width: 6, height: 8 });
    }
}
