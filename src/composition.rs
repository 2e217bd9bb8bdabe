//! The composition model: ordered images plus the banner.
//!
//! This is the single piece of mutable editor state. Images are append-only
//! and remove-only; there is no move operation. Every successful mutation,
//! including each banner setter, notifies subscribers synchronously with a
//! read-only [`Snapshot`] before returning, which is how the live preview
//! stays in step with the model.

use crate::banner::BannerConfig;
use crate::types::{BackgroundKind, ImageEntry};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("image index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Read-only view of the model handed to subscribers and renderers.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub images: &'a [ImageEntry],
    pub banner: &'a BannerConfig,
}

type Listener = Box<dyn FnMut(&Snapshot<'_>)>;

#[derive(Default)]
pub struct CompositionModel {
    images: Vec<ImageEntry>,
    banner: BannerConfig,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for CompositionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionModel")
            .field("images", &self.images.len())
            .field("banner", &self.banner)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CompositionModel {
    pub fn new(banner: BannerConfig) -> Self {
        Self {
            images: Vec::new(),
            banner,
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            images: &self.images,
            banner: &self.banner,
        }
    }

    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    pub fn banner(&self) -> &BannerConfig {
        &self.banner
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Register a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Append an entry; returns its position.
    pub fn add_image(&mut self, entry: ImageEntry) -> usize {
        self.images.push(entry);
        self.notify();
        self.images.len() - 1
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    ///
    /// An out-of-range index leaves the sequence untouched and notifies nobody.
    pub fn remove_image(&mut self, index: usize) -> Result<ImageEntry, CompositionError> {
        if index >= self.images.len() {
            return Err(CompositionError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        let removed = self.images.remove(index);
        self.notify();
        Ok(removed)
    }

    /// Drop every image (session reset). The banner is kept.
    pub fn clear(&mut self) {
        self.images.clear();
        self.notify();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.banner.set_text(text);
        self.notify();
    }

    pub fn set_background_type(&mut self, kind: BackgroundKind) {
        self.banner.set_background_type(kind);
        self.notify();
    }

    pub fn set_solid_color(&mut self, color: impl Into<String>) {
        self.banner.set_solid_color(color);
        self.notify();
    }

    pub fn set_gradient_colors(&mut self, color_a: impl Into<String>, color_b: impl Into<String>) {
        self.banner.set_gradient_colors(color_a, color_b);
        self.notify();
    }

    pub fn set_gradient_color_a(&mut self, color: impl Into<String>) {
        self.banner.set_gradient_color_a(color);
        self.notify();
    }

    pub fn set_gradient_color_b(&mut self, color: impl Into<String>) {
        self.banner.set_gradient_color_b(color);
        self.notify();
    }

    pub fn set_background_image_url(&mut self, url: impl Into<String>) {
        self.banner.set_background_image_url(url);
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = Snapshot {
            images: &self.images,
            banner: &self.banner,
        };
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
