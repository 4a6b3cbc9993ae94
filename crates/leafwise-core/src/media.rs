//! Image input handling: format sniffing, size limits, and data URIs.
//!
//! Images reach the model as base64 payloads. They arrive either as files on
//! disk (CLI) or as `data:<mime>;base64,<payload>` URIs (the identification
//! flow's input schema), so both directions are covered here.

use base64::Engine;
use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::InputError;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "heic" => "image/heic",
            "avif" => "image/avif",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Parse a `data:<mimetype>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, InputError> {
        let invalid = |reason: &str| InputError::InvalidDataUri(reason.to_string());

        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| invalid("missing 'data:' prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing ',' before payload"))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("payload must be base64-encoded"))?;

        if !media_type.starts_with("image/") {
            return Err(InputError::InvalidDataUri(format!(
                "expected an image MIME type, got '{media_type}'"
            )));
        }
        if payload.is_empty() {
            return Err(invalid("empty payload"));
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| InputError::InvalidDataUri(format!("bad base64 payload: {e}")))?;

        Ok(Self {
            data: payload.to_string(),
            media_type: media_type.to_string(),
        })
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Detect an image format from its leading bytes.
///
/// Returns the short format name used by [`ImageInput::from_bytes`].
pub fn sniff_format(header: &[u8]) -> Option<&'static str> {
    if header.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpeg");
    }

    // PNG: 89 50 4E 47
    if header.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("png");
    }

    // GIF: GIF8
    if header.starts_with(b"GIF8") {
        return Some("gif");
    }

    // WebP: RIFF....WEBP
    if header.starts_with(b"RIFF") {
        return (header.len() >= 12 && &header[8..12] == b"WEBP").then_some("webp");
    }

    // BMP: BM
    if header.starts_with(b"BM") {
        return Some("bmp");
    }

    // ISO-BMFF: ....ftyp<brand>
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"avif" | b"avis" => Some("avif"),
            b"heic" | b"heix" | b"mif1" | b"msf1" => Some("heic"),
            _ => None,
        };
    }

    None
}

/// Read and validate an image file, returning it ready for a vision model.
///
/// Checks:
/// - File exists and is readable
/// - File size is within limits
/// - File has valid image magic bytes
pub fn load_image(path: &Path, limits: &LimitsConfig) -> Result<ImageInput, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path).map_err(|e| InputError::UnsupportedFormat {
        path: path.to_path_buf(),
        message: format!("Cannot read metadata: {e}"),
    })?;

    let max_bytes = limits.max_file_size_mb.saturating_mul(1024 * 1024);
    if metadata.len() > max_bytes {
        return Err(InputError::FileTooLarge {
            path: path.to_path_buf(),
            size_mb: metadata.len() / (1024 * 1024),
            max_mb: limits.max_file_size_mb,
        });
    }

    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| InputError::UnsupportedFormat {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;

    let format = sniff_format(&bytes[..bytes.len().min(16)]).ok_or_else(|| {
        InputError::UnsupportedFormat {
            path: path.to_path_buf(),
            message: "Unrecognized image format (invalid magic bytes)".to_string(),
        }
    })?;

    tracing::debug!(
        "Loaded {:?} as {format} ({} bytes)",
        path,
        metadata.len()
    );
    Ok(ImageInput::from_bytes(&bytes, format))
}
