//! # Image Attachments
//!
//! Reads one user-selected file and turns it into an in-memory
//! [`ImageAttachment`]. Only images are accepted: the extension decides
//! whether a file is an image, and the leading bytes pick the exact type
//! (or decide alone when there is no extension).

use std::fmt;
use std::fs;
use std::path::Path;

use base64::Engine;
use log::{info, warn};

use crate::core::message::ImageAttachment;

/// Inline error for anything that is not an image.
pub const NOT_AN_IMAGE_MESSAGE: &str = "Please select an image file.";

#[derive(Debug)]
pub enum AttachmentError {
    /// The file exists but is not an image.
    NotAnImage,
    /// The file could not be read.
    Io { path: String, source: std::io::Error },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::NotAnImage => write!(f, "{NOT_AN_IMAGE_MESSAGE}"),
            AttachmentError::Io { path, source } => write!(f, "Could not read {path}: {source}"),
        }
    }
}

impl std::error::Error for AttachmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttachmentError::NotAnImage => None,
            AttachmentError::Io { source, .. } => Some(source),
        }
    }
}

/// Loads the file at `path` as an image attachment.
///
/// A leading `~/` is expanded to the home directory and surrounding quotes
/// (as left by terminal drag-and-drop) are stripped.
pub fn load_image(path: &str) -> Result<ImageAttachment, AttachmentError> {
    let cleaned = clean_path(path);
    let bytes = fs::read(&cleaned).map_err(|source| {
        warn!("Failed to read attachment {}: {}", cleaned, source);
        AttachmentError::Io {
            path: cleaned.clone(),
            source,
        }
    })?;

    let file_name = Path::new(&cleaned)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cleaned.clone());

    let attachment = from_bytes(&file_name, &bytes)?;
    info!("Attached image {}", attachment.describe());
    Ok(attachment)
}

/// Builds an attachment from raw bytes, rejecting non-images.
///
/// A file extension decides whether the file is an image at all; the magic
/// bytes only refine which image type it is. Files without an extension are
/// classified by their magic bytes alone.
pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Result<ImageAttachment, AttachmentError> {
    let mime_type = match Path::new(file_name).extension() {
        Some(_) => {
            mime_from_extension(file_name).map(|by_ext| sniff_mime(bytes).unwrap_or(by_ext))
        }
        None => sniff_mime(bytes),
    }
    .ok_or(AttachmentError::NotAnImage)?;

    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(ImageAttachment {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        byte_len: bytes.len(),
        data_uri: format!("data:{mime_type};base64,{payload}"),
    })
}

fn clean_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    if let Some(rest) = trimmed.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest).to_string_lossy().into_owned();
    }
    trimmed.to_string()
}

/// Identifies common raster formats by their magic numbers.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', _, _, _, _, _, _, _, _, _, _, _, _, dib @ ..] if is_bmp_dib_header(dib) => {
            Some("image/bmp")
        }
        _ => None,
    }
}

/// `BM` alone is too weak: also require a known DIB header size at offset 14.
fn is_bmp_dib_header(dib: &[u8]) -> bool {
    match dib {
        [a, b, c, d, ..] => matches!(
            u32::from_le_bytes([*a, *b, *c, *d]),
            12 | 40 | 52 | 56 | 108 | 124
        ),
        _ => false,
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "tif" | "tiff" => Some("image/tiff"),
        "ico" => Some("image/x-icon"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}
