//! Vendor transport: the chat-completion RPC and its reqwest-backed
//! implementation.

use crate::error::OpenAiError;
use crate::wire::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The vendor's chat-completion endpoint, treated as an opaque async
/// RPC. The registry depends only on this trait, so tests can
/// substitute a mock.
///
/// Cancellation and deadlines ride on the future itself: dropping the
/// call (e.g. under `tokio::time::timeout`) aborts the RPC.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError>;
}

// Compile-time check: ChatTransport must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn ChatTransport) {}
};

/// HTTP client for the OpenAI API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create with a custom base URL (for testing/proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ChatTransport for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::trace!(model = %request.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(OpenAiError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OpenAiError::Api(format!("HTTP {status}: {body}")));
        }

        Ok(response.json().await.map_err(OpenAiError::Http)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = OpenAiClient::new("test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url() {
        let client = OpenAiClient::new("test-key").with_base_url("http://localhost:8080/v1");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
