//! # Banner Studio
//!
//! Stack images under a welcome banner and export the composition as a single
//! PNG. A companion tool turns a text or URL payload into a QR code or a
//! Code 128 barcode, with PNG download and share-intent links.
//!
//! # Architecture: Model → Layout → Raster
//!
//! ```text
//! files ──► intake ──► CompositionModel ──► preview (live HTML, on every change)
//!                      (images + banner)
//!                             │
//!                             └──► export: layout (CSS px) → rasterize 2× → edited-images.png
//!
//! payload ──► CodeGenSession ──► qr-code.png / barcode.png / share intents
//! ```
//!
//! The composition model is the single piece of mutable state. Everything
//! downstream of it reads a [`composition::Snapshot`]: the preview re-renders
//! from one synchronously after each mutation, and export lays one out and
//! paints it. Layout is pure arithmetic over CSS pixels, so the geometry of an
//! export can be tested without decoding a single image.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`intake`] | Read files into `data:` URL entries; concurrent submissions append in completion order |
//! | [`banner`] | Message text and the three-way background, presets |
//! | [`composition`] | Ordered images + banner, observer list |
//! | [`render`] | Layout math, the [`render::Rasterizer`] trait and its pure-Rust backend |
//! | [`export`] | Layout → 2× raster → PNG, failures logged and swallowed |
//! | [`preview`] | Maud HTML rendition of the composition, kept live by subscription |
//! | [`codegen`] | QR (level H) and Code 128 graphics, PNG download |
//! | [`share`] | Share-intent URLs for four platforms and the [`share::Opener`] seam |
//! | [`config`] | `config.toml` loading: stock defaults, sparse overrides, validation |
//! | [`types`] | Shared types: [`types::ImageEntry`], [`types::BackgroundKind`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Non-Destructive Background Toggle
//!
//! The banner keeps all three background payloads (solid color, gradient
//! stops, image URL) and a separate active kind. Switching the kind never
//! discards what was entered for the others, so Solid → Gradient → Solid
//! returns to the same color.
//!
//! ## Degrade, Don't Fail
//!
//! Inputs are opaque strings. A bad color, an unreachable background URL or
//! a non-image file all render as blank or placeholder regions at export time,
//! logged at `warn`. The only errors that stop the binary are configuration
//! errors at startup.
//!
//! ## Pure-Rust Rendering
//!
//! Decoding, resizing (Lanczos3) and compositing use the `image` crate, text
//! uses `rusttype`. No browser, no system libraries beyond an optional font.

pub mod banner;
pub mod codegen;
pub mod composition;
pub mod config;
pub mod export;
pub mod intake;
pub mod output;
pub mod preview;
pub mod render;
pub mod share;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
