//! Image payload preparation for vision requests.
//!
//! Validates the screenshot once, before any provider is called: it must be
//! non-empty, under the size limit, and decodable enough to read its
//! dimensions. The bytes are then base64-encoded with a MIME type every
//! supported provider accepts.

use crate::error::PayloadError;
use base64::Engine;
use std::io::Cursor;

/// MIME types accepted by both vision providers.
pub const SUPPORTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Default payload limit (20 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: &'static str,
    pub data_base64: String,
    pub size_bytes: usize,
    pub width: u32,
    pub height: u32,
}

impl ImagePayload {
    pub fn prepare(bytes: &[u8], mime_type: &str, max_bytes: usize) -> Result<Self, PayloadError> {
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(PayloadError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let (width, height) = image_dimensions(bytes)?;
        let mime_type = normalize_mime(mime_type, bytes);
        let data_base64 = base64::engine::general_purpose::STANDARD.encode(bytes);

        log::info!(
            "[PAYLOAD] {}x{} {} ({:.2} MB, base64 {} chars)",
            width,
            height,
            mime_type,
            bytes.len() as f64 / (1024.0 * 1024.0),
            data_base64.len()
        );

        Ok(Self {
            mime_type,
            data_base64,
            size_bytes: bytes.len(),
            width,
            height,
        })
    }

    /// `data:<mime>;base64,<data>` for providers that take image URLs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

/// Pixel dimensions read from the image header.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), PayloadError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PayloadError::Undecodable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| PayloadError::Undecodable(e.to_string()))
}

/// Declared MIME type if supported, else the sniffed format if supported,
/// else JPEG.
fn normalize_mime(declared: &str, bytes: &[u8]) -> &'static str {
    let declared = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if let Some(m) = supported(&declared) {
        return m;
    }

    let sniffed = match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => Some("image/png"),
        Ok(image::ImageFormat::Jpeg) => Some("image/jpeg"),
        Ok(image::ImageFormat::Gif) => Some("image/gif"),
        Ok(image::ImageFormat::WebP) => Some("image/webp"),
        _ => None,
    };
    if let Some(m) = sniffed {
        log::debug!("[PAYLOAD] Declared type '{}' unsupported, sniffed {}", declared, m);
        return m;
    }

    log::warn!("[PAYLOAD] Unsupported type '{}', falling back to image/jpeg", declared);
    "image/jpeg"
}

fn supported(mime: &str) -> Option<&'static str> {
    let mime = if mime == "image/jpg" { "image/jpeg" } else { mime };
    SUPPORTED_MIME_TYPES.iter().copied().find(|m| *m == mime)
}
