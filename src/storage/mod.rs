//! Image storage module - validation, persistence and public URLs

pub mod base64;
pub mod file;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileImageStore;

/// Encoding used when persisting an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub(crate) fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// A persisted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Location on disk
    pub path: String,
    pub filename: String,
    /// Publicly retrievable URL
    pub url: String,
}

/// Persists generated images.
///
/// Both operations take the raw image bytes; the provider's base64 transport
/// encoding is removed once by the caller.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// True if `image` is non-empty and decodes to an image with positive dimensions
    async fn validate(&self, image: &[u8]) -> bool;

    /// Re-encode `image` as `format` and write it under a name derived from `keyword_hint`
    async fn save(&self, image: &[u8], keyword_hint: &str, format: OutputFormat)
        -> Result<StoredImage>;
}
