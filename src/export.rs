//! Export: rasterize the whole composition and save it as one PNG.
//!
//! ## Pipeline
//!
//! ```text
//! identify entries ─► lay out (CSS px) ─► rasterize at 2× ─► encode PNG ─► edited-images.png
//! ```
//!
//! The PNG is encoded in memory and written in one call, so a failure at any
//! step leaves no partial file behind. [`export`] is the editor-facing entry
//! point: it never fails, it logs and returns `None`. [`try_export`] exposes
//! the error for callers that want it.

use crate::composition::CompositionModel;
use crate::render::layout::{CompositionLayout, LayoutParams, compute_layout};
use crate::render::{Rasterizer, RenderError, Scene};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the exported file inside the output directory.
pub const EXPORT_FILENAME: &str = "edited-images.png";

/// Device pixels per CSS pixel in the export.
pub const EXPORT_SCALE: u32 = 2;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rasterization failed: {0}")]
    Render(#[from] RenderError),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub path: PathBuf,
    /// Composition size in CSS pixels.
    pub css: (u32, u32),
    /// Size of the written PNG.
    pub pixels: (u32, u32),
}

/// Lay the model out the way the rasterizer will see it.
pub fn plan_layout(
    model: &CompositionModel,
    rasterizer: &dyn Rasterizer,
    params: &LayoutParams,
) -> CompositionLayout {
    let naturals: Vec<Option<(u32, u32)>> = rasterizer
        .identify(model.images())
        .into_iter()
        .map(|d| d.map(|d| (d.width, d.height)))
        .collect();
    compute_layout(
        params,
        model.banner().display_text(),
        &naturals,
        &|text: &str| rasterizer.measure_text(text, params.font_size),
    )
}

/// Export, surfacing failures. `Ok(None)` means there was nothing to export.
pub fn try_export(
    model: &CompositionModel,
    rasterizer: &dyn Rasterizer,
    params: &LayoutParams,
    output_dir: &Path,
) -> Result<Option<ExportResult>, ExportError> {
    if model.is_empty() {
        tracing::debug!("export skipped: no images");
        return Ok(None);
    }

    let layout = plan_layout(model, rasterizer, params);
    let scene = Scene {
        layout: &layout,
        banner: model.banner(),
        images: model.images(),
    };
    let canvas = rasterizer.rasterize(&scene, EXPORT_SCALE)?;
    let expected = (layout.width * EXPORT_SCALE, layout.height * EXPORT_SCALE);
    if canvas.dimensions() != expected {
        return Err(RenderError::RasterizationFailed(format!(
            "rasterizer returned {}x{}, expected {}x{}",
            canvas.width(),
            canvas.height(),
            expected.0,
            expected.1
        ))
        .into());
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(EXPORT_FILENAME);
    std::fs::write(&path, &png)?;
    tracing::debug!(path = %path.display(), bytes = png.len(), "export written");

    Ok(Some(ExportResult {
        path,
        css: (layout.width, layout.height),
        pixels: expected,
    }))
}

/// Export the composition. Failures are logged and yield `None`; nothing is
/// retried.
pub fn export(
    model: &CompositionModel,
    rasterizer: &dyn Rasterizer,
    params: &LayoutParams,
    output_dir: &Path,
) -> Option<ExportResult> {
    match try_export(model, rasterizer, params, output_dir) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            None
        }
    }
}
