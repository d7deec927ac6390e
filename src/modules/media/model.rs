use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;
use validator::Validate;

use crate::modules::media::MediaError;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "image" => MediaKind::Image,
            "audio" => MediaKind::Audio,
            "video" => MediaKind::Video,
            _ => MediaKind::Document,
        }
    }
}

/// An attachment as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RawMedia {
    pub kind: MediaKind,
    #[validate(length(min = 1, message = "Media data cannot be empty"))]
    pub data: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawMedia {
    /// Payload estimate in bytes, falling back to the declared size for empty payloads.
    pub fn estimated_size(&self) -> u64 {
        if self.data.is_empty() { self.size } else { estimate_size(&self.data) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedMedia {
    pub data: String,
    pub original_size: u64,
    pub size: u64,
    pub optimized: bool,
}

/// A media item ready for submission: either an optimized image or a passthrough.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedMedia {
    pub kind: MediaKind,
    pub name: Option<String>,
    pub data: String,
    pub original_size: u64,
    pub size: u64,
    pub optimized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MediaOptimizationOptions {
    #[validate(range(exclusive_min = 0.0, message = "max_size_mb must be positive"))]
    pub max_size_mb: f64,
    #[validate(range(min = 1, max = 20))]
    pub max_images: usize,
    #[validate(range(min = 1, max = 100))]
    pub image_quality: u8,
    #[validate(range(min = 16, max = 8192))]
    pub max_dimension: u32,
}

impl Default for MediaOptimizationOptions {
    fn default() -> Self {
        Self { max_size_mb: 1.0, max_images: 3, image_quality: 80, max_dimension: 1024 }
    }
}

impl MediaOptimizationOptions {
    pub fn max_size_bytes(&self) -> f64 {
        self.max_size_mb * BYTES_PER_MB
    }
}

/// Borrowed view over a `data:<mime>;base64,<payload>` string.
#[derive(Debug, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    pub fn parse(input: &'a str) -> Result<Self, MediaError> {
        let rest = input.strip_prefix("data:").ok_or(MediaError::InvalidDataUri)?;
        let (meta, payload) = rest.split_once(',').ok_or(MediaError::InvalidDataUri)?;
        let mime = meta.strip_suffix(";base64").ok_or(MediaError::UnsupportedEncoding)?;
        Ok(DataUri { mime, payload })
    }

    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        Ok(B64.decode(self.payload.trim())?)
    }

    pub fn encode(mime: &str, bytes: &[u8]) -> String {
        format!("data:{mime};base64,{}", B64.encode(bytes))
    }
}

/// Approximates the decoded size of a base64 data URI as `len * 3 / 4`.
pub fn estimate_size(data: &str) -> u64 {
    let payload = match data.split_once(',') {
        Some((meta, payload)) if meta.starts_with("data:") => payload,
        _ => data,
    };
    payload.len() as u64 * 3 / 4
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / BYTES_PER_MB)
}

#[derive(Debug, Deserialize, Validate)]
pub struct MediaBatchModel {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 media items are required"))]
    #[validate(nested)]
    pub media: Vec<RawMedia>,
    #[serde(default)]
    #[validate(nested)]
    pub options: MediaOptimizationOptions,
}

#[derive(Debug, Serialize)]
pub struct MediaOptimizeResponse {
    pub report: String,
    pub processed_images: usize,
    pub skipped_images: usize,
    pub failed_images: usize,
    pub classification: crate::modules::media::MediaClassification<PreparedMedia>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_mime_family() {
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("audio/mpeg"), MediaKind::Audio);
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Document);
        assert_eq!(MediaKind::from_mime(""), MediaKind::Document);
    }

    #[test]
    fn data_uri_parse_and_decode() {
        let uri = DataUri::parse("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(uri.mime, "text/plain");
        assert_eq!(uri.decode().unwrap(), b"hello");
    }

    #[test]
    fn data_uri_rejects_non_base64() {
        assert!(matches!(DataUri::parse("hello"), Err(MediaError::InvalidDataUri)));
        assert!(matches!(
            DataUri::parse("data:text/plain,hello"),
            Err(MediaError::UnsupportedEncoding)
        ));
    }

    #[test]
    fn size_estimate_ignores_prefix() {
        assert_eq!(estimate_size("data:image/png;base64,AAAA"), 3);
        assert_eq!(estimate_size("AAAAAAAA"), 6);
    }

    #[test]
    fn declared_size_used_for_empty_payload() {
        let media = RawMedia { kind: MediaKind::Audio, data: String::new(), size: 42, name: None };
        assert_eq!(media.estimated_size(), 42);
    }
}
