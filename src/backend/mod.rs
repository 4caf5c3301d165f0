//! Backend module - Generation client trait, HTTP provider client, and prompt building

pub mod http_backend;
pub mod prompt;
pub mod traits;

pub use http_backend::HttpGenerationClient;
pub use traits::{GeneratedImage, GenerationClient};
