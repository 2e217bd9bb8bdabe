//! Payload editing with two regeneration policies.
//!
//! The QR graphic follows the payload: every change regenerates it, an empty
//! payload clears it. The barcode only regenerates on an explicit
//! [`CodeGenSession::generate_linear`]. Generation counters make both
//! policies observable.

use super::linear::{self, BarGeometry};
use super::{CodeGraphic, matrix};
use crate::config::CodeSettings;

/// Payload plus the two current graphics.
#[derive(Debug, Clone, Default)]
pub struct CodeGenSession {
    qr_size: u32,
    geometry: BarGeometry,
    payload: String,
    matrix: Option<CodeGraphic>,
    linear: Option<CodeGraphic>,
    matrix_generations: u64,
    linear_generations: u64,
}

impl CodeGenSession {
    pub fn new(settings: &CodeSettings) -> Self {
        Self {
            qr_size: settings.qr_size,
            geometry: BarGeometry::from_settings(settings),
            ..Self::default()
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Replace the payload; regenerates the QR graphic when it changed.
    pub fn set_payload(&mut self, payload: impl Into<String>) {
        let payload = payload.into();
        if payload == self.payload {
            return;
        }
        self.payload = payload;
        self.matrix_generations += 1;
        self.matrix = if self.payload.is_empty() {
            None
        } else {
            match matrix::encode(&self.payload, self.qr_size) {
                Ok(graphic) => Some(graphic),
                Err(e) => {
                    tracing::warn!(error = %e, "QR generation failed");
                    None
                }
            }
        };
    }

    /// Encode the current payload as a barcode. An empty payload leaves the
    /// previous barcode in place.
    pub fn generate_linear(&mut self) -> Option<&CodeGraphic> {
        if self.payload.is_empty() {
            return self.linear.as_ref();
        }
        self.linear_generations += 1;
        self.linear = match linear::encode(&self.payload, &self.geometry) {
            Ok(graphic) => Some(graphic),
            Err(e) => {
                tracing::warn!(error = %e, "barcode generation failed");
                None
            }
        };
        self.linear.as_ref()
    }

    pub fn matrix(&self) -> Option<&CodeGraphic> {
        self.matrix.as_ref()
    }

    pub fn linear(&self) -> Option<&CodeGraphic> {
        self.linear.as_ref()
    }

    pub fn matrix_generations(&self) -> u64 {
        self.matrix_generations
    }

    pub fn linear_generations(&self) -> u64 {
        self.linear_generations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CodeGenSession {
        CodeGenSession::new(&CodeSettings::default())
    }

    #[test]
    fn qr_follows_payload_but_barcode_waits() {
        let mut s = session();
        s.set_payload("https://example.com");
        assert_eq!(s.matrix_generations(), 1);
        assert_eq!(s.matrix().unwrap().payload, "https://example.com");
        assert!(s.linear().is_none());
        assert_eq!(s.linear_generations(), 0);

        s.set_payload("https://example.org");
        assert_eq!(s.matrix_generations(), 2);
        assert_eq!(s.linear_generations(), 0);

        let bar = s.generate_linear().unwrap();
        assert_eq!(bar.payload, "https://example.org");
        assert_eq!(s.linear_generations(), 1);

        // Barcode keeps the old payload until regenerated
        s.set_payload("changed");
        assert_eq!(s.linear().unwrap().payload, "https://example.org");
        assert_eq!(s.matrix().unwrap().payload, "changed");
    }

    #[test]
    fn unchanged_payload_does_not_regenerate() {
        let mut s = session();
        s.set_payload("same");
        s.set_payload("same");
        assert_eq!(s.matrix_generations(), 1);
    }

    #[test]
    fn empty_payload_clears_qr() {
        let mut s = session();
        s.set_payload("x");
        s.set_payload("");
        assert!(s.matrix().is_none());
        assert_eq!(s.matrix_generations(), 2);
    }

    #[test]
    fn generate_linear_with_empty_payload_is_noop() {
        let mut s = session();
        assert!(s.generate_linear().is_none());
        assert_eq!(s.linear_generations(), 0);
    }

    #[test]
    fn unencodable_barcode_clears_graphic() {
        let mut s = session();
        s.set_payload("ok");
        s.generate_linear().unwrap();
        s.set_payload("über");
        assert!(s.generate_linear().is_none());
        assert_eq!(s.linear_generations(), 2);
        // QR handles any UTF-8
        assert!(s.matrix().is_some());
    }

    #[test]
    fn oversized_settings_fail_without_panicking() {
        let settings = CodeSettings {
            qr_size: 1_000_000,
            barcode_bar_width: 100_000_000,
            ..CodeSettings::default()
        };
        let mut s = CodeGenSession::new(&settings);
        s.set_payload("https://example.com");
        assert!(s.matrix().is_none());
        assert!(s.generate_linear().is_none());
        assert_eq!(s.linear_generations(), 1);
    }

    #[test]
    fn control_characters_mix_with_lowercase() {
        let mut s = session();
        s.set_payload("hello\tworld");
        assert!(s.generate_linear().is_some());
    }

    #[test]
    fn sizes_come_from_settings() {
        let settings = CodeSettings {
            qr_size: 300,
            barcode_display_value: false,
            ..CodeSettings::default()
        };
        let mut s = CodeGenSession::new(&settings);
        s.set_payload("12345678");
        assert_eq!(s.matrix().unwrap().width, 300);
        let bar = s.generate_linear().unwrap();
        // bar height 100 + 2 × 10 margin, no caption
        assert_eq!(bar.height, 120);
        assert!(!bar.svg.contains("<text"));
    }
}
