//! Data URL encoding
//!
//! Renderers hand back `data:<mime>;base64,<payload>` strings; the exporter
//! turns them into raw bytes before packaging.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{CanvasError, Result};

/// Wrap encoded bytes in a base64 data URL.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Decode a base64 data URL back into bytes.
pub fn data_url_to_bytes(url: &str) -> Result<Vec<u8>> {
    let rest = url.strip_prefix("data:").ok_or_else(|| CanvasError::InvalidDataUrl {
        reason: "missing 'data:' prefix".to_string(),
    })?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| CanvasError::InvalidDataUrl {
        reason: "missing ',' separator".to_string(),
    })?;
    if !header.ends_with(";base64") {
        return Err(CanvasError::InvalidDataUrl {
            reason: format!("unsupported encoding in '{}'", header),
        });
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Mime type declared by a data URL, if it is one.
pub fn data_url_mime_type(url: &str) -> Option<&str> {
    url.strip_prefix("data:")?
        .split([';', ','])
        .next()
        .filter(|mime| !mime.is_empty())
}
