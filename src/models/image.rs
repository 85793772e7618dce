use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

/// The photo currently loaded into the scanner, kept in encoded form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    pub mime_type: String,
    /// Standard base64 of the original file bytes
    pub data: String,
}

impl SelectedImage {
    /// Build from raw file bytes, sniffing the format from the content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ControllerError> {
        let format = image::guess_format(bytes)
            .map_err(|e| ControllerError::InvalidImage(e.to_string()))?;

        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Parse a `data:image/...;base64,...` URL as produced by a browser file reader.
    pub fn from_data_url(url: &str) -> Result<Self, ControllerError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ControllerError::InvalidImage("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ControllerError::InvalidImage("data URL has no payload".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ControllerError::InvalidImage("data URL is not base64".to_string()))?;

        if !mime_type.starts_with("image/") {
            return Err(ControllerError::InvalidImage(format!(
                "unsupported media type '{}'",
                mime_type
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ControllerError::InvalidImage(format!("bad base64: {}", e)))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// 1x1 RGBA PNG
#[cfg(test)]
pub(crate) const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];
