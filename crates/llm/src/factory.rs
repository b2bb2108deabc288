//! LLM provider factory.
//!
//! Creates answer-generation clients from provider names so the pipeline
//! owns its collaborators explicitly instead of reaching for globals.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use docchat_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client for the named provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for OpenAI)
///
/// # Errors
/// Returns a configuration error if the provider is unknown or a required
/// API key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI provider requires an API key".to_string())
            })?;
            let mut client = OpenAiClient::new(api_key)?;
            if let Some(url) = endpoint {
                client = client.with_endpoint(url);
            }
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown provider: {}. Supported: ollama, openai",
            provider
        ))),
    }
}
