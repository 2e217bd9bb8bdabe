//! Shared types used across the model, render and codegen layers.
//!
//! [`ImageEntry`] is what intake produces and the composition model owns;
//! [`BackgroundKind`] is the discriminant of the banner background and is
//! shared by config, CLI flags and the model.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Which of the three banner backgrounds is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Solid,
    Gradient,
    Image,
}

impl BackgroundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Gradient => "gradient",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded image held by the composition.
///
/// The payload is a self-describing `data:` URL, embeddable as-is in the HTML
/// preview. Entries have no identity beyond their position in the sequence;
/// `label` is only the name the file was submitted under, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub label: String,
    data_url: String,
}

impl ImageEntry {
    /// Build an entry from raw file bytes.
    ///
    /// The MIME type is sniffed from the content first, then guessed from the
    /// label's extension. Bytes that are not a recognizable image are still
    /// accepted as `application/octet-stream`.
    pub fn from_bytes(label: impl Into<String>, bytes: &[u8]) -> Self {
        let label = label.into();
        let mime = sniff_mime(bytes)
            .or_else(|| mime_from_extension(&label))
            .unwrap_or("application/octet-stream");
        Self {
            data_url: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
            label,
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// MIME type recorded in the data URL header.
    pub fn mime(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("application/octet-stream")
    }

    /// Whether the entry was recognized as an image when it was read.
    pub fn is_image(&self) -> bool {
        self.mime().starts_with("image/")
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    Some(format.to_mime_type())
}

fn mime_from_extension(label: &str) -> Option<&'static str> {
    let ext = std::path::Path::new(label)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::png_bytes;

    #[test]
    fn png_bytes_are_sniffed() {
        let entry = ImageEntry::from_bytes("photo.bin", &png_bytes(4, 3));
        assert_eq!(entry.mime(), "image/png");
        assert!(entry.data_url().starts_with("data:image/png;base64,"));
        assert!(entry.is_image());
    }

    #[test]
    fn unknown_bytes_fall_back_to_extension() {
        let entry = ImageEntry::from_bytes("broken.jpg", b"not really a jpeg");
        assert_eq!(entry.mime(), "image/jpeg");
    }

    #[test]
    fn non_image_is_accepted_as_octet_stream() {
        let entry = ImageEntry::from_bytes("notes.txt", b"hello");
        assert_eq!(entry.mime(), "application/octet-stream");
        assert!(!entry.is_image());
        assert_eq!(
            entry.data_url(),
            "data:application/octet-stream;base64,aGVsbG8="
        );
    }

    #[test]
    fn background_kind_serializes_lowercase() {
        let json = serde_json::to_string(&BackgroundKind::Gradient).unwrap();
        assert_eq!(json, "\"gradient\"");
        assert_eq!(BackgroundKind::Image.to_string(), "image");
    }
}
