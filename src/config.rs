//! Editor configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the values the editor starts with; a user `config.toml` overrides any subset
//! of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [banner]
//! text = ""                       # Empty shows the "Welcome!" placeholder
//! background = "solid"            # solid | gradient | image
//! color = "#FF6B6B"
//! gradient = ["#FF6B6B", "#4ECDC4"]
//! image_url = "https://images.unsplash.com/photo-1557683316-973673baf926?w=400"
//!
//! [layout]
//! width = 800                     # CSS pixels, never narrower than 800
//! image_max_height = 800
//!
//! [text]
//! font = ""                       # TTF/OTF path; empty searches system fonts
//!
//! [codes]
//! qr_size = 200
//! barcode_bar_width = 2
//! barcode_height = 100
//! barcode_display_value = true
//!
//! [share]
//! popup_width = 600
//! popup_height = 400
//!
//! [network]
//! timeout_secs = 10
//!
//! [processing]
//! max_processes = 4               # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::BackgroundKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Initial banner text and background values.
    pub banner: BannerSettings,
    /// Composition geometry.
    pub layout: LayoutSettings,
    /// Font used for the banner message and barcode captions.
    pub text: TextSettings,
    /// QR code and barcode sizing.
    pub codes: CodeSettings,
    /// Share popup geometry.
    pub share: ShareSettings,
    /// Remote image fetching.
    pub network: NetworkSettings,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.image_max_height == 0 {
            return Err(ConfigError::Validation(
                "layout.image_max_height must be non-zero".into(),
            ));
        }
        let codes = &self.codes;
        if !(1..=MAX_QR_SIZE).contains(&codes.qr_size) {
            return Err(ConfigError::Validation(format!(
                "codes.qr_size must be between 1 and {MAX_QR_SIZE}"
            )));
        }
        if !(1..=MAX_BAR_WIDTH).contains(&codes.barcode_bar_width) {
            return Err(ConfigError::Validation(format!(
                "codes.barcode_bar_width must be between 1 and {MAX_BAR_WIDTH}"
            )));
        }
        if !(1..=MAX_BAR_HEIGHT).contains(&codes.barcode_height) {
            return Err(ConfigError::Validation(format!(
                "codes.barcode_height must be between 1 and {MAX_BAR_HEIGHT}"
            )));
        }
        if self.share.popup_width == 0 || self.share.popup_height == 0 {
            return Err(ConfigError::Validation(
                "share.popup_width and share.popup_height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Initial banner state.
///
/// These only seed the editing session; every value can be changed afterwards
/// through the banner setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerSettings {
    pub text: String,
    pub background: BackgroundKind,
    pub color: String,
    pub gradient: [String; 2],
    pub image_url: String,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            background: BackgroundKind::Solid,
            color: "#FF6B6B".to_string(),
            gradient: ["#FF6B6B".to_string(), "#4ECDC4".to_string()],
            image_url: "https://images.unsplash.com/photo-1557683316-973673baf926?w=400"
                .to_string(),
        }
    }
}

/// Composition geometry in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    /// Container width. Values below 800 are raised to 800.
    pub width: u32,
    /// Tallest an image box may grow before its content is letterboxed.
    pub image_max_height: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 800,
            image_max_height: 800,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextSettings {
    /// Path to a TrueType/OpenType font. Empty searches well-known system paths.
    pub font: String,
}

/// Largest accepted `codes.qr_size`.
pub const MAX_QR_SIZE: u32 = 4096;
/// Largest accepted `codes.barcode_bar_width`.
pub const MAX_BAR_WIDTH: u32 = 64;
/// Largest accepted `codes.barcode_height`.
pub const MAX_BAR_HEIGHT: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeSettings {
    /// Edge length of the QR graphic, quiet zone included.
    pub qr_size: u32,
    /// Width of the narrowest barcode bar.
    pub barcode_bar_width: u32,
    pub barcode_height: u32,
    /// Print the payload under the barcode.
    pub barcode_display_value: bool,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            qr_size: 200,
            barcode_bar_width: 2,
            barcode_height: 100,
            barcode_display_value: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareSettings {
    pub popup_width: u32,
    pub popup_height: u32,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            popup_width: 600,
            popup_height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSettings {
    /// Timeout for fetching one remote image.
    pub timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image workers used while rasterizing.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Worker count for the rayon pool: all cores unless `max_processes` asks
/// for fewer. Never more than the machine has.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Loading
// =============================================================================

/// [`EditorConfig::default`] as a TOML table, the base every overlay lands on.
///
/// `max_processes` is `None` by default and therefore absent from the table;
/// TOML has no null.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EditorConfig::default()).expect("default config must serialize")
}

/// Deep-merge two TOML values. Tables combine per key with `overlay`
/// winning; anything else in `overlay` replaces `base` outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<EditorConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Read `dir/config.toml` (if any) over the stock defaults.
pub fn load_config(dir: &Path) -> Result<EditorConfig, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// Documented `config.toml` printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Banner Studio Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Banner: the values a new editing session starts with
# ---------------------------------------------------------------------------
[banner]
# Welcome message. Empty renders the "Welcome!" placeholder.
text = ""

# Active background: "solid", "gradient" or "image".
# Switching keeps the values of the other two.
background = "solid"

# Solid background color.
color = "#FF6B6B"

# Gradient stops, drawn along a 45 degree diagonal (bottom-left to top-right).
gradient = ["#FF6B6B", "#4ECDC4"]

# Background image (http(s) URL, data: URL or local path).
# Covers the banner, centered. Unloadable images leave the banner blank.
image_url = "https://images.unsplash.com/photo-1557683316-973673baf926?w=400"

# ---------------------------------------------------------------------------
# Layout (CSS pixels; the export is rendered at 2x)
# ---------------------------------------------------------------------------
[layout]
# Composition width. Never narrower than 800.
width = 800

# Tallest an image may be before it is letterboxed.
image_max_height = 800

# ---------------------------------------------------------------------------
# Text
# ---------------------------------------------------------------------------
[text]
# Path to a TTF/OTF font. Empty searches well-known system font locations;
# without any font the message is laid out but not drawn.
font = ""

# ---------------------------------------------------------------------------
# QR codes and barcodes
# ---------------------------------------------------------------------------
[codes]
# QR edge length in pixels, quiet zone included. At most 4096.
qr_size = 200

# Code 128 narrow bar width (at most 64) and bar height (at most 4096), in pixels.
barcode_bar_width = 2
barcode_height = 100

# Print the payload under the barcode.
barcode_display_value = true

# ---------------------------------------------------------------------------
# Sharing
# ---------------------------------------------------------------------------
[share]
popup_width = 600
popup_height = 400

# ---------------------------------------------------------------------------
# Network
# ---------------------------------------------------------------------------
[network]
# Seconds to wait for one remote image.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image workers while rasterizing.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
