//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each entity (image,
//! banner, code graphic) leads with its identity, positional index or name,
//! and the file it ended up in is shown after a `→`. Details are indented
//! context lines.
//!
//! # Output Format
//!
//! ## Compose
//!
//! ```text
//! Images
//! 001 beach.jpg
//! 002 notes.txt (not an image)
//!     Failed: missing.png
//!
//! Banner
//!     Text: Welcome!
//!     Background: gradient #FF6B6B → #4ECDC4
//!
//! Export → out/edited-images.png (800x1200 CSS px, 1600x2400 px)
//! Preview → out/preview.html
//! ```
//!
//! ## Codes
//!
//! ```text
//! QR code "https://example.com" → out/qr-code.png (200x200)
//! Facebook → https://www.facebook.com/sharer/sharer.php?u=... (600x400)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O.

use crate::banner::{
    Background, BannerConfig, PRESET_BACKGROUND_IMAGES, PRESET_COLORS, PRESET_GRADIENTS,
};
use crate::codegen::{CodeGraphic, Symbology};
use crate::export::ExportResult;
use crate::intake::IntakeReport;
use crate::share::ShareIntent;
use crate::types::ImageEntry;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn image_line(index: usize, entry: &ImageEntry) -> String {
    if entry.is_image() {
        format!("{} {}", format_index(index), entry.label)
    } else {
        format!("{} {} (not an image)", format_index(index), entry.label)
    }
}

// ============================================================================
// Compose
// ============================================================================

/// The image sequence plus any files that could not be read.
pub fn format_images(images: &[ImageEntry], report: &IntakeReport) -> Vec<String> {
    let mut lines = vec!["Images".to_string()];
    if images.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, entry) in images.iter().enumerate() {
        lines.push(image_line(i + 1, entry));
    }
    for path in &report.failed {
        lines.push(format!("{}Failed: {}", indent(1), path.display()));
    }
    lines
}

pub fn format_banner(banner: &BannerConfig) -> Vec<String> {
    let background = match banner.background().background() {
        Background::Solid { color } => format!("solid {}", color),
        Background::Gradient { color_a, color_b } => {
            format!("gradient {} \u{2192} {}", color_a, color_b)
        }
        Background::Image { url } => format!("image {}", truncate(url, 60)),
    };
    vec![
        "Banner".to_string(),
        format!("{}Text: {}", indent(1), truncate(banner.display_text(), 60)),
        format!("{}Background: {}", indent(1), background),
    ]
}

pub fn format_export(result: Option<&ExportResult>) -> Vec<String> {
    match result {
        Some(r) => vec![format!(
            "Export \u{2192} {} ({}x{} CSS px, {}x{} px)",
            r.path.display(),
            r.css.0,
            r.css.1,
            r.pixels.0,
            r.pixels.1
        )],
        None => vec!["Export skipped: nothing written".to_string()],
    }
}

pub fn format_preview(path: &Path) -> Vec<String> {
    vec![format!("Preview \u{2192} {}", path.display())]
}

/// Print the full compose summary to stdout.
pub fn print_compose_output(
    images: &[ImageEntry],
    report: &IntakeReport,
    banner: &BannerConfig,
    export: Option<&ExportResult>,
    preview: Option<&Path>,
) {
    let mut lines = format_images(images, report);
    lines.push(String::new());
    lines.extend(format_banner(banner));
    lines.push(String::new());
    lines.extend(format_export(export));
    if let Some(path) = preview {
        lines.extend(format_preview(path));
    }
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Codes and sharing
// ============================================================================

pub fn format_code(graphic: &CodeGraphic, path: Option<&Path>) -> Vec<String> {
    let kind = match graphic.symbology {
        Symbology::Matrix => "QR code",
        Symbology::Linear => "Barcode",
    };
    let head = format!("{} \"{}\"", kind, truncate(&graphic.payload, 40));
    let line = match path {
        Some(p) => format!(
            "{} \u{2192} {} ({}x{})",
            head,
            p.display(),
            graphic.width,
            graphic.height
        ),
        None => format!("{} (not written)", head),
    };
    vec![line]
}

pub fn print_code(graphic: &CodeGraphic, path: Option<&Path>) {
    for line in format_code(graphic, path) {
        println!("{}", line);
    }
}

pub fn format_no_code(symbology: Symbology) -> Vec<String> {
    let kind = match symbology {
        Symbology::Matrix => "QR code",
        Symbology::Linear => "Barcode",
    };
    vec![format!("{} not generated", kind)]
}

pub fn print_no_code(symbology: Symbology) {
    for line in format_no_code(symbology) {
        println!("{}", line);
    }
}

pub fn format_share_intent(intent: &ShareIntent) -> String {
    format!(
        "{} \u{2192} {} ({}x{})",
        intent.platform.name(),
        intent.url,
        intent.popup.width,
        intent.popup.height
    )
}

pub fn print_share_intent(intent: &ShareIntent) {
    println!("{}", format_share_intent(intent));
}

// ============================================================================
// Presets
// ============================================================================

pub fn format_presets() -> Vec<String> {
    let mut lines = vec!["Colors".to_string()];
    for (i, color) in PRESET_COLORS.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), color));
    }
    lines.push(String::new());
    lines.push("Gradients".to_string());
    for (i, (a, b)) in PRESET_GRADIENTS.iter().enumerate() {
        lines.push(format!("{} {} \u{2192} {}", format_index(i + 1), a, b));
    }
    lines.push(String::new());
    lines.push("Background images".to_string());
    for (i, url) in PRESET_BACKGROUND_IMAGES.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), url));
    }
    lines
}

pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}

/// Presets as a pretty-printed JSON object, for scripting.
pub fn format_presets_json() -> Result<String, serde_json::Error> {
    let gradients: Vec<[&str; 2]> = PRESET_GRADIENTS.iter().map(|&(a, b)| [a, b]).collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "colors": PRESET_COLORS,
        "gradients": gradients,
        "background_images": PRESET_BACKGROUND_IMAGES,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::{Platform, PopupSize, ShareContent, share_intent};
    use crate::test_helpers::{entry, png_entry};
    use crate::types::BackgroundKind;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn truncate_short() {
        assert_eq!(truncate("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_long_is_char_safe() {
        let text = "é".repeat(50);
        let expected = format!("{}...", "é".repeat(40));
        assert_eq!(truncate(&text, 40), expected);
    }

    // =========================================================================
    // Compose output
    // =========================================================================

    #[test]
    fn images_list_positions_and_failures() {
        let images = vec![png_entry("beach.png", 2, 2), entry("notes.txt")];
        let report = IntakeReport {
            accepted: vec![],
            failed: vec![PathBuf::from("missing.png")],
        };
        let lines = format_images(&images, &report);
        assert_eq!(
            lines,
            vec![
                "Images",
                "001 beach.png",
                "002 notes.txt (not an image)",
                "    Failed: missing.png",
            ]
        );
    }

    #[test]
    fn empty_image_list() {
        let lines = format_images(&[], &IntakeReport::default());
        assert_eq!(lines, vec!["Images", "    (none)"]);
    }

    #[test]
    fn banner_shows_placeholder_and_active_background() {
        let mut banner = BannerConfig::default();
        assert_eq!(
            format_banner(&banner),
            vec!["Banner", "    Text: Welcome!", "    Background: solid #FF6B6B"]
        );

        banner.set_background_type(BackgroundKind::Gradient);
        assert_eq!(
            format_banner(&banner)[2],
            "    Background: gradient #FF6B6B \u{2192} #4ECDC4"
        );
    }

    #[test]
    fn export_line_shows_both_sizes() {
        let result = ExportResult {
            path: PathBuf::from("out/edited-images.png"),
            css: (800, 1200),
            pixels: (1600, 2400),
        };
        assert_eq!(
            format_export(Some(&result)),
            vec!["Export \u{2192} out/edited-images.png (800x1200 CSS px, 1600x2400 px)"]
        );
        assert_eq!(format_export(None), vec!["Export skipped: nothing written"]);
    }

    // =========================================================================
    // Codes and sharing
    // =========================================================================

    #[test]
    fn code_line_with_and_without_file() {
        let qr = crate::codegen::matrix::encode("https://example.com", 200).unwrap();
        assert_eq!(
            format_code(&qr, Some(Path::new("out/qr-code.png"))),
            vec!["QR code \"https://example.com\" \u{2192} out/qr-code.png (200x200)"]
        );
        assert_eq!(
            format_code(&qr, None),
            vec!["QR code \"https://example.com\" (not written)"]
        );
    }

    #[test]
    fn missing_code_line() {
        assert_eq!(format_no_code(Symbology::Linear), vec!["Barcode not generated"]);
    }

    #[test]
    fn share_intent_line() {
        let intent = share_intent(
            Platform::WhatsApp,
            &ShareContent::new("u", "hi there"),
            PopupSize::default(),
        );
        assert_eq!(
            format_share_intent(&intent),
            "WhatsApp \u{2192} https://wa.me/?text=hi%20there (600x400)"
        );
    }

    #[test]
    fn presets_list_every_group() {
        let lines = format_presets();
        assert_eq!(lines[0], "Colors");
        assert_eq!(lines[1], "001 #FF6B6B");
        assert!(lines.contains(&"Gradients".to_string()));
        assert!(lines.contains(&"005 #D4A5A5 \u{2192} #9B786F".to_string()));
        assert!(lines.contains(&"Background images".to_string()));
        // 3 headers + 2 blank separators + 10 + 5 + 3 entries
        assert_eq!(lines.len(), 23);
    }

    #[test]
    fn presets_json_groups() {
        let json: serde_json::Value = serde_json::from_str(&format_presets_json().unwrap()).unwrap();
        assert_eq!(json["colors"][0], "#FF6B6B");
        assert_eq!(json["gradients"].as_array().unwrap().len(), 5);
        assert_eq!(json["gradients"][0][1], "#4ECDC4");
        assert_eq!(json["background_images"].as_array().unwrap().len(), 3);
    }
}
