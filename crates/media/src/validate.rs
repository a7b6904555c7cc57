//! Size and type checks applied before any store is tried.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use regex::Regex;

use crate::error::UploadError;
use crate::input::ImageInput;

/// Declared content types the API accepts.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// File extensions the API accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^data:(image/[a-zA-Z0-9.+-]+);base64,(.*)$").expect("valid regex")
});

/// Image encodings accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// Sniff the encoding from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Decoded, checked image bytes ready for a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
}

/// What the chain has to do with an input once it passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Already hosted elsewhere; no store is involved.
    Hosted(String),
    Image(ImageData),
}

/// Validate `input` against `max_bytes` and the accepted image types.
pub fn prepare(input: ImageInput, max_bytes: usize) -> Result<Prepared, UploadError> {
    match input {
        ImageInput::HostedUrl(url) => Ok(Prepared::Hosted(url)),
        ImageInput::File {
            file_name,
            content_type,
            bytes,
        } => {
            if let Some(ct) = content_type.as_deref() {
                check_mime(ct)?;
            }
            if let Some(ext) = file_name.as_deref().and_then(extension_of) {
                if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(UploadError::UnsupportedType(format!(".{ext}")));
                }
            }
            check_bytes(bytes, max_bytes).map(Prepared::Image)
        }
        ImageInput::DataUrl(url) => {
            let bytes = decode_data_url(&url, max_bytes)?;
            check_bytes(bytes, max_bytes).map(Prepared::Image)
        }
    }
}

/// Decode a base64 data URL, rejecting oversize payloads before decoding.
pub fn decode_data_url(url: &str, max_bytes: usize) -> Result<Vec<u8>, UploadError> {
    let caps = DATA_URL_RE
        .captures(url)
        .ok_or_else(|| UploadError::InvalidDataUrl("expected data:image/<type>;base64,".into()))?;

    check_mime(&caps[1].to_ascii_lowercase())?;

    let payload: String = caps[2].chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let estimated = payload.len() / 4 * 3;
    if estimated > max_bytes + 2 {
        return Err(UploadError::TooLarge {
            size: estimated,
            max: max_bytes,
        });
    }

    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| UploadError::InvalidDataUrl(e.to_string()))
}

fn check_mime(content_type: &str) -> Result<(), UploadError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType(essence))
    }
}

fn check_bytes(bytes: Vec<u8>, max_bytes: usize) -> Result<ImageData, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    let kind = ImageKind::detect(&bytes)
        .ok_or_else(|| UploadError::UnsupportedType("unrecognized image data".into()))?;
    Ok(ImageData { bytes, kind })
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}
