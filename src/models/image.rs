// src/models/image.rs
use base64::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::gemini_client::{InlineData, Part};

const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

lazy_static::lazy_static! {
    static ref DATA_URL_MEDIA_TYPE: regex::Regex =
        regex::Regex::new(r"^data:([a-zA-Z0-9]+/[a-zA-Z0-9\-.+]+).*,").expect("valid data URL pattern");
}

/// An inline image attached to a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub media_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

impl ImageAttachment {
    /// Accepts either a `data:<type>;base64,<payload>` URL or a bare base64 payload.
    /// A missing or unreadable media type falls back to JPEG.
    pub fn from_data_url(input: &str) -> Self {
        let data = match input.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => payload,
            _ => input,
        };

        let media_type = DATA_URL_MEDIA_TYPE
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_MEDIA_TYPE);

        Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            media_type: sniff_media_type(bytes).to_string(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        tracing::debug!("Loaded image {} ({} bytes)", path.as_ref().display(), bytes.len());
        Ok(Self::from_bytes(&bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    pub fn to_part(&self) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: self.media_type.clone(),
                data: self.data.clone(),
            },
        }
    }
}

/// Determine MIME type from image signature
fn sniff_media_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else if bytes.starts_with(&[0x47, 0x49, 0x46]) {
        "image/gif"
    } else if bytes.starts_with(&[0x52, 0x49, 0x46, 0x46]) {
        "image/webp"
    } else {
        "image/png"
    }
}
