//! Filesystem image store

use async_trait::async_trait;
use chrono::Local;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::storage::{ImageStore, OutputFormat, StoredImage};

/// Maximum number of keyword characters kept in a filename
const KEYWORD_FRAGMENT_LEN: usize = 30;

/// Stores images in a local directory served under a public URL prefix
pub struct FileImageStore {
    storage_path: PathBuf,
    url_prefix: String,
}

impl FileImageStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_paths(&config.base_path, &config.url_prefix)
    }

    pub fn with_paths(storage_path: impl AsRef<Path>, url_prefix: &str) -> Self {
        Self {
            storage_path: storage_path.as_ref().to_path_buf(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Ensure the storage directory exists
    pub async fn ensure_storage_dir(&self) -> Result<()> {
        if !fs::try_exists(&self.storage_path).await.unwrap_or(false) {
            fs::create_dir_all(&self.storage_path).await?;
            debug!(path = ?self.storage_path, "Created storage directory");
        }
        Ok(())
    }

    /// Public URL of a stored file
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix, filename)
    }
}

#[async_trait]
impl ImageStore for FileImageStore {
    async fn validate(&self, image: &[u8]) -> bool {
        if image.is_empty() {
            return false;
        }

        let bytes = image.to_vec();
        match tokio::task::spawn_blocking(move || decode_image(&bytes)).await {
            Ok(Ok(decoded)) => decoded.width() > 0 && decoded.height() > 0,
            Ok(Err(e)) => {
                debug!(error = %e, "Image validation failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Image validation task failed");
                false
            }
        }
    }

    async fn save(
        &self,
        image: &[u8],
        keyword_hint: &str,
        format: OutputFormat,
    ) -> Result<StoredImage> {
        let bytes = image.to_vec();

        let encoded = tokio::task::spawn_blocking(move || encode_image(&bytes, format))
            .await
            .map_err(|e| AppError::Storage(format!("encoder task failed: {}", e)))??;

        self.ensure_storage_dir()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let filename = image_filename(keyword_hint, format);
        let file_path = self.storage_path.join(&filename);

        fs::write(&file_path, &encoded)
            .await
            .map_err(|e| AppError::Storage(format!("failed to write {}: {}", file_path.display(), e)))?;

        info!(path = ?file_path, size = encoded.len(), "Image saved");

        Ok(StoredImage {
            path: file_path.to_string_lossy().to_string(),
            url: self.url_for(&filename),
            filename,
        })
    }
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AppError::Integrity(format!("image decode error: {}", e)))
}

fn encode_image(bytes: &[u8], format: OutputFormat) -> Result<Vec<u8>> {
    let image = decode_image(bytes)?;

    // JPEG has no alpha channel
    let image = match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        OutputFormat::Png => image,
    };

    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format.image_format())
        .map_err(|e| AppError::Storage(format!("image encode error: {}", e)))?;
    Ok(buffer)
}

/// Keep only alphanumerics and underscores, truncated
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(KEYWORD_FRAGMENT_LEN)
        .collect()
}

/// `mockup_<keyword>_<timestamp>_<suffix>.<ext>`
pub fn image_filename(keyword: &str, format: OutputFormat) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "mockup_{}_{}_{}.{}",
        sanitize_keyword(keyword),
        timestamp,
        &suffix[..8],
        format.extension()
    )
}
