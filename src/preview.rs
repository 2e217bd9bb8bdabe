//! Live HTML preview of the composition.
//!
//! The preview mirrors what the export rasterizes: the same container,
//! banner, card and image stack, styled with the same geometry. It is kept
//! current by subscribing to the [`CompositionModel`]: every mutation
//! re-renders the document synchronously, before the mutating call returns.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! the message text and image labels are escaped automatically.

use crate::composition::{CompositionModel, Snapshot};
use crate::render::LayoutParams;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// File name used when the preview is written to disk.
pub const PREVIEW_FILENAME: &str = "preview.html";

const CSS: &str = include_str!("../static/preview.css");

/// Render a full HTML document for one snapshot.
pub fn render_preview(snapshot: &Snapshot<'_>, params: &LayoutParams) -> Markup {
    let background = snapshot.banner.css_background();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Banner preview" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.composition style=(format!("width: {}px;", params.width)) {
                    div.banner style=(background) {
                        div.card {
                            p { (snapshot.banner.display_text()) }
                        }
                    }
                    div.images {
                        @for (index, entry) in snapshot.images.iter().enumerate() {
                            div.entry data-index=(index) {
                                @if entry.is_image() {
                                    img src=(entry.data_url())
                                        alt=(entry.label)
                                        style=(format!("max-height: {}px;", params.image_max_height));
                                } @else {
                                    div.placeholder { (entry.label) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct PreviewState {
    html: String,
    renders: usize,
}

/// A preview that re-renders on every model change.
///
/// Cloning yields another handle to the same document; one handle is moved
/// into the model's listener list by [`LivePreview::attach`].
#[derive(Debug, Clone, Default)]
pub struct LivePreview {
    params: LayoutParams,
    state: Rc<RefCell<PreviewState>>,
}

impl LivePreview {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            state: Rc::default(),
        }
    }

    /// Render the model's current state and follow every later change.
    pub fn attach(&self, model: &mut CompositionModel) {
        self.refresh(&model.snapshot());
        let handle = self.clone();
        model.subscribe(move |snapshot| handle.refresh(snapshot));
    }

    pub fn refresh(&self, snapshot: &Snapshot<'_>) {
        let html = render_preview(snapshot, &self.params).into_string();
        let mut state = self.state.borrow_mut();
        state.html = html;
        state.renders += 1;
    }

    /// The current document.
    pub fn html(&self) -> String {
        self.state.borrow().html.clone()
    }

    /// How many times the document has been rendered.
    pub fn renders(&self) -> usize {
        self.state.borrow().renders
    }

    /// Write the current document as `preview.html` in `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(PREVIEW_FILENAME);
        std::fs::write(&path, self.state.borrow().html.as_bytes())?;
        Ok(path)
    }
}
