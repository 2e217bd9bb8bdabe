//! Resolve image references to bytes.
//!
//! A reference is whatever the editor holds for a picture: the `data:` URL of
//! an intake entry, or the banner's background image URL. Three forms are
//! understood:
//!
//! | Reference | Resolution |
//! |---|---|
//! | `data:[mime][;base64],payload` | decoded in memory (`base64` or percent-encoding) |
//! | `http://…`, `https://…` | fetched with `reqwest` (feature `remote`) |
//! | anything else | local path, optional `file://` prefix |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("empty image reference")]
    Empty,
    #[error("malformed data URL")]
    MalformedDataUrl,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("fetch failed: {0}")]
    Http(String),
    #[error("remote images are not supported in this build: {0}")]
    RemoteDisabled(String),
}

/// Turns an image reference into raw bytes.
pub trait ImageResolver: Sync {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, SourceError>;
}

/// Resolver for `data:` URLs, local paths and (with `remote`) http(s) URLs.
#[derive(Debug, Clone)]
pub struct DefaultResolver {
    timeout: Duration,
}

impl DefaultResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[cfg(feature = "remote")]
    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let http = |e: reqwest::Error| SourceError::Http(e.to_string());
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http)?;
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http)?;
        Ok(response.bytes().map_err(http)?.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let _ = self.timeout;
        Err(SourceError::RemoteDisabled(url.to_string()))
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl ImageResolver for DefaultResolver {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SourceError::Empty);
        }
        if reference.starts_with("data:") {
            return decode_data_url(reference);
        }
        if is_remote(reference) {
            tracing::debug!(url = reference, "fetching remote image");
            return self.fetch_remote(reference);
        }
        let path = reference.strip_prefix("file://").unwrap_or(reference);
        Ok(std::fs::read(path)?)
    }
}

pub fn is_remote(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decode the payload of a `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, SourceError> {
    let rest = url.strip_prefix("data:").ok_or(SourceError::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(SourceError::MalformedDataUrl)?;
    if header.ends_with(";base64") {
        Ok(STANDARD.decode(payload.trim())?)
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Resolve and decode.
pub fn load_image(resolver: &dyn ImageResolver, reference: &str) -> Result<DynamicImage, SourceError> {
    let bytes = resolver.fetch(reference)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Pixel size from the header alone, without decoding the whole image.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), SourceError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}
