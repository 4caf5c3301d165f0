//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Image generation provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_generation_timeout")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/images/generations".to_string()
}

fn default_model() -> String {
    "gpt-image-1-mini".to_string()
}

fn default_image_size() -> String {
    "1024x1536".to_string()
}

fn default_generation_timeout() -> u64 {
    120000
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            image_size: default_image_size(),
            timeout_ms: default_generation_timeout(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Path prefix under which stored images are served
    #[serde(default = "default_public_path")]
    pub public_path: String,
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "default_storage_timeout")]
    pub timeout_ms: u64,
}

fn default_storage_path() -> String {
    "./mockups".to_string()
}

fn default_public_path() -> String {
    "/mockups".to_string()
}

fn default_url_prefix() -> String {
    "http://localhost:8000/mockups".to_string()
}

fn default_storage_timeout() -> u64 {
    10000
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            public_path: default_public_path(),
            url_prefix: default_url_prefix(),
            timeout_ms: default_storage_timeout(),
        }
    }
}

/// SMTP configuration. Delivery is disabled when `smtp_host` is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Use STARTTLS instead of implicit TLS
    #[serde(default)]
    pub starttls: bool,
    #[serde(default = "default_mail_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_attachment_name")]
    pub attachment_name: String,
}

fn default_smtp_port() -> u16 {
    465
}

fn default_sender() -> String {
    "noreply@localhost".to_string()
}

fn default_mail_timeout() -> u64 {
    30000
}

fn default_attachment_name() -> String {
    "mockup.png".to_string()
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_enabled(&self) -> bool {
        self.smtp_host.as_deref().is_some_and(|h| !h.trim().is_empty())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            sender: default_sender(),
            starttls: false,
            timeout_ms: default_mail_timeout(),
            attachment_name: default_attachment_name(),
        }
    }
}

/// Network-level access configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Client IPs allowed to call the API. Empty allows everyone.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .add_source(File::from(path.as_ref()).required(false))
            // Override with environment variables (prefixed with MOCKUP__)
            .add_source(
                Environment::with_prefix("MOCKUP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.allowed_ips")
                    .with_list_parse_key("security.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.generation.api_key.trim().is_empty() {
            return Err(invalid("generation.api_key must be set"));
        }

        if self.generation.image_size.trim().is_empty() {
            return Err(invalid("generation.image_size cannot be empty"));
        }

        if self.storage.base_path.trim().is_empty() {
            return Err(invalid("storage.base_path cannot be empty"));
        }

        if !self.storage.public_path.starts_with('/') {
            return Err(invalid(format!(
                "storage.public_path '{}' must start with '/'",
                self.storage.public_path
            )));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(format!(
                "logging.format '{}' must be 'json' or 'pretty'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            generation: GenerationConfig::default(),
            storage: StorageConfig::default(),
            mail: MailConfig::default(),
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
