//! Composition rendering in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Layout** | pure arithmetic over CSS pixels |
//! | **Text** | `rusttype` |
//! | **Rasterize** | `image` + `rayon` (Lanczos3 resize, alpha compositing) |
//!
//! The module is split into:
//! - **Layout**: Pure functions for box geometry (unit testable)
//! - **Color / Text / Source**: Paint, glyph and image-reference helpers
//! - **Backend**: [`Rasterizer`] trait + [`RustRasterizer`]

pub mod backend;
pub mod color;
pub mod layout;
pub mod rust_backend;
pub mod source;
pub mod text;

pub use backend::{Dimensions, Rasterizer, RenderError, Scene};
pub use layout::{CompositionLayout, LayoutParams, Rect, compute_layout};
pub use rust_backend::RustRasterizer;
pub use source::{DefaultResolver, ImageResolver, SourceError};
pub use text::Typeface;
