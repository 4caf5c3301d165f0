//! Configuration module

pub mod settings;

pub use settings::{
    GenerationConfig, LoggingConfig, MailConfig, SecurityConfig, ServerConfig, Settings,
    StorageConfig,
};
