//! HTTP client for OpenAI-compatible image generation endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::traits::{GeneratedImage, GenerationClient};
use crate::config::GenerationConfig;
use crate::error::{AppError, Result};

/// HTTP-based image generation client
pub struct HttpGenerationClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Request body sent to the provider
#[derive(Debug, Serialize)]
struct ApiGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

/// Response body returned by the provider
#[derive(Debug, Deserialize)]
struct ApiGenerateResponse {
    #[serde(default)]
    data: Vec<ApiImageData>,
}

#[derive(Debug, Deserialize)]
struct ApiImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

impl HttpGenerationClient {
    /// Create a new client from configuration
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage> {
        debug!(url = %self.api_url, model = %self.model, size = %size, "Sending generate request");

        let api_request = ApiGenerateRequest {
            model: &self.model,
            prompt,
            n: 1,
            size,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("Image provider did not respond: {}", e))
                } else {
                    AppError::Provider(format!("Request to provider failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Provider returned an error status");
            return Err(AppError::Provider(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let api_response = response
            .json::<ApiGenerateResponse>()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse response: {}", e)))?;

        let image = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Provider("Response contained no images".to_string()))?;

        let b64_json = image
            .b64_json
            .filter(|data| !data.is_empty())
            .ok_or_else(|| AppError::Provider("Response image has no b64_json payload".to_string()))?;

        debug!(model = %self.model, bytes = b64_json.len(), "Image generated");

        Ok(GeneratedImage {
            b64_json,
            revised_prompt: image.revised_prompt,
        })
    }
}
