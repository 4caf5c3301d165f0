//! Common traits and types for image generation providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Image returned by a generation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Base64 encoded image data
    pub b64_json: String,

    /// Revised prompt if the model modified it
    pub revised_prompt: Option<String>,
}

/// Trait for image generation providers
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Get the provider name, used in logs
    fn name(&self) -> &str;

    /// Generate a single image for `prompt` at `size` (e.g. `1024x1536`)
    async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage>;
}
