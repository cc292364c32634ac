//! Inline QR preview with placeholder fallback
//!
//! A preview that cannot be shown is replaced by a fixed placeholder graphic.
//! The failure stays inside this module: callers always get something to
//! display.

use bytes::Bytes;

use crate::error::ExportError;
use crate::export::{FetchedImage, ImageSource};

/// Grey diamond with a "QR Code" caption
pub const PLACEHOLDER_SVG: &str = r##"<svg width="200" height="200" viewBox="0 0 200 200" fill="none" xmlns="http://www.w3.org/2000/svg">
<rect width="200" height="200" fill="#F3F4F6"/>
<path d="M100 50L150 100L100 150L50 100L100 50Z" fill="#9B9B9B"/>
<text x="100" y="180" text-anchor="middle" fill="#9B9B9B" font-size="12">QR Code</text>
</svg>"##;

pub const PLACEHOLDER_CONTENT_TYPE: &str = "image/svg+xml";

/// Placeholder as a `data:` URI for `<img onerror>` swaps
pub fn placeholder_data_uri() -> String {
    format!(
        "data:{};charset=utf-8,{}",
        PLACEHOLDER_CONTENT_TYPE,
        urlencoding::encode(PLACEHOLDER_SVG)
    )
}

/// Why a preview was replaced
#[derive(Debug)]
enum DisplayFailed {
    Unreachable(ExportError),
    NotAnImage(Option<String>),
}

impl std::fmt::Display for DisplayFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayFailed::Unreachable(e) => write!(f, "{}", e),
            DisplayFailed::NotAnImage(Some(ct)) => write!(f, "content type {} is not an image", ct),
            DisplayFailed::NotAnImage(None) => write!(f, "no content type"),
        }
    }
}

/// What the detail view actually displays
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    pub bytes: Bytes,
    pub content_type: String,
    pub is_placeholder: bool,
}

impl PreviewImage {
    pub fn placeholder() -> Self {
        Self {
            bytes: Bytes::from_static(PLACEHOLDER_SVG.as_bytes()),
            content_type: PLACEHOLDER_CONTENT_TYPE.to_string(),
            is_placeholder: true,
        }
    }
}

fn displayable(result: Result<FetchedImage, ExportError>) -> Result<PreviewImage, DisplayFailed> {
    let image = result.map_err(DisplayFailed::Unreachable)?;
    match image.content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") && !image.bytes.is_empty() => {
            Ok(PreviewImage {
                bytes: image.bytes,
                content_type: ct,
                is_placeholder: false,
            })
        }
        other => Err(DisplayFailed::NotAnImage(other)),
    }
}

/// Fetch `image_ref` for display, substituting the placeholder on any failure
pub async fn load_preview(source: &dyn ImageSource, image_ref: &str) -> PreviewImage {
    match displayable(source.fetch(image_ref).await) {
        Ok(image) => image,
        Err(reason) => {
            log::debug!("preview of {} replaced by placeholder: {}", image_ref, reason);
            PreviewImage::placeholder()
        }
    }
}
