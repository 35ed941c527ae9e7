//! LLM provider factory.
//!
//! Resolves a provider name to a concrete client implementation behind the
//! `LlmClient` trait.

use crate::client::LlmClient;
use crate::providers::OpenAiClient;
use recall_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required for providers that need one)
///
/// # Errors
/// Returns a `Config` error when the provider is unknown or a required
/// credential is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI provider requires an API key".to_string())
            })?;

            let client = match endpoint {
                Some(url) => OpenAiClient::with_base_url(url, api_key)?,
                None => OpenAiClient::new(api_key)?,
            };

            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_client() {
        let client = create_client("openai", None, Some("sk-test"));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().provider_name(), "openai");
    }

    #[test]
    fn test_create_openai_with_custom_endpoint() {
        let client = create_client("openai", Some("http://localhost:8080"), Some("sk-test"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_client("openai", None, None) {
            Err(err) => assert!(err.to_string().contains("requires an API key")),
            Ok(_) => panic!("Expected error for OpenAI without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, Some("key")) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
