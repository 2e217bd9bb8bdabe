//! Banner configuration: the welcome message and its background.
//!
//! The background is deliberately *not* a plain sum type. [`BackgroundSpec`]
//! keeps the solid color, the gradient stops and the image URL side by side
//! with a separate active [`BackgroundKind`], so toggling the type never loses
//! what the user entered for the other two. [`BackgroundSpec::background`]
//! derives the sum-type view the renderers match on.
//!
//! Every setter accepts any string. Nothing is validated here: a malformed
//! color or an unreachable URL degrades at render time, not at input time.

use crate::config::BannerSettings;
use crate::types::BackgroundKind;
use serde::Serialize;

/// Rendered in place of an empty message.
pub const PLACEHOLDER_TEXT: &str = "Welcome!";

/// Swatches offered for the solid background.
pub const PRESET_COLORS: &[&str] = &[
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD", "#D4A5A5", "#9B786F", "#A8E6CF",
    "#FFD3B6", "#FF8B94",
];

/// Stop pairs offered for the gradient background.
pub const PRESET_GRADIENTS: &[(&str, &str)] = &[
    ("#FF6B6B", "#4ECDC4"),
    ("#A8E6CF", "#FFD3B6"),
    ("#FF8B94", "#4ECDC4"),
    ("#96CEB4", "#FFEEAD"),
    ("#D4A5A5", "#9B786F"),
];

/// Images offered for the image background.
pub const PRESET_BACKGROUND_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1557683316-973673baf926?w=400",
    "https://images.unsplash.com/photo-1579546929662-711aa81148cf?w=400",
    "https://img.freepik.com/free-vector/copy-space-bokeh-spring-lights-background_52683-55649.jpg?semt=ais_hybrid",
];

/// The active background, borrowed from a [`BackgroundSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background<'a> {
    Solid { color: &'a str },
    /// Fixed 45° diagonal: `color_a` bottom-left, `color_b` top-right.
    Gradient { color_a: &'a str, color_b: &'a str },
    /// Covers the banner, centered, no repeat.
    Image { url: &'a str },
}

/// All three background payloads plus which one is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundSpec {
    active: BackgroundKind,
    solid: String,
    gradient: (String, String),
    image_url: String,
}

impl BackgroundSpec {
    pub fn kind(&self) -> BackgroundKind {
        self.active
    }

    pub fn background(&self) -> Background<'_> {
        match self.active {
            BackgroundKind::Solid => Background::Solid { color: &self.solid },
            BackgroundKind::Gradient => Background::Gradient {
                color_a: &self.gradient.0,
                color_b: &self.gradient.1,
            },
            BackgroundKind::Image => Background::Image {
                url: &self.image_url,
            },
        }
    }

    pub fn solid_color(&self) -> &str {
        &self.solid
    }

    pub fn gradient_colors(&self) -> (&str, &str) {
        (&self.gradient.0, &self.gradient.1)
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// CSS declarations for the active background, as the preview uses them.
    pub fn to_css(&self) -> String {
        match self.background() {
            Background::Solid { color } => format!("background-color: {color};"),
            Background::Gradient { color_a, color_b } => {
                format!("background: linear-gradient(45deg, {color_a}, {color_b});")
            }
            Background::Image { url } => format!(
                "background-image: url({url}); background-size: cover; \
                 background-position: center; background-repeat: no-repeat;"
            ),
        }
    }
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        BannerConfig::from_settings(&BannerSettings::default()).background
    }
}

/// Message text plus background.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BannerConfig {
    text: String,
    background: BackgroundSpec,
}

impl BannerConfig {
    /// Seed a banner from the `[banner]` config section.
    pub fn from_settings(settings: &BannerSettings) -> Self {
        let [color_a, color_b] = &settings.gradient;
        Self {
            text: settings.text.clone(),
            background: BackgroundSpec {
                active: settings.background,
                solid: settings.color.clone(),
                gradient: (color_a.clone(), color_b.clone()),
                image_url: settings.image_url.clone(),
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The message as drawn: the text, or the placeholder when it is empty.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            &self.text
        }
    }

    pub fn background(&self) -> &BackgroundSpec {
        &self.background
    }

    /// CSS declarations for the banner's active background.
    pub fn css_background(&self) -> String {
        self.background.to_css()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Switch the active background. The other payloads are left as they are.
    pub fn set_background_type(&mut self, kind: BackgroundKind) {
        self.background.active = kind;
    }

    pub fn set_solid_color(&mut self, color: impl Into<String>) {
        self.background.solid = color.into();
    }

    pub fn set_gradient_colors(&mut self, color_a: impl Into<String>, color_b: impl Into<String>) {
        self.background.gradient = (color_a.into(), color_b.into());
    }

    /// Replace the first gradient stop only.
    pub fn set_gradient_color_a(&mut self, color: impl Into<String>) {
        self.background.gradient.0 = color.into();
    }

    /// Replace the second gradient stop only.
    pub fn set_gradient_color_b(&mut self, color: impl Into<String>) {
        self.background.gradient.1 = color.into();
    }

    pub fn set_background_image_url(&mut self, url: impl Into<String>) {
        self.background.image_url = url.into();
    }
}
