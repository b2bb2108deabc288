//! Embedding configuration types.

use docchat_core::AppConfig;
use serde::{Deserialize, Serialize};

/// Embedding configuration for one session.
///
/// All vectors in a session share the dimension declared here; providers
/// reject responses of any other length, so a misconfigured model surfaces
/// as an error instead of corrupting the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram", "ollama", "openai"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Custom endpoint URL for local providers
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

impl EmbeddingConfig {
    /// Derive the session's embedding configuration from the application
    /// configuration.
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            provider: config.embedding_provider.clone(),
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dimensions,
            endpoint: config.endpoint.clone(),
        }
    }
}
