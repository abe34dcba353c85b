//! OpenRouter provider implementation using the Chat Completions API.
//!
//! One POST per completion, no streaming:
//! - request: `{ model, messages: [{ role, content }] }` with a bearer token
//! - success: `choices[0].message.content`
//! - failure: non-2xx, optionally `{ "error": { "message": ... } }`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionProvider, CompletionRequest, PromptMessage, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// The request body for the Chat Completions API
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Error envelope returned alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Pulls `choices[0].message.content` out of a success body.
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ProviderError::EmptyCompletion)
}

/// Builds the error for a non-2xx status, preferring the server's own message.
fn api_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("API request failed with status {status}"));
    ProviderError::Api { status, message }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider using the Chat Completions endpoint
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    /// * `timeout` - Whole-request timeout; expiry maps to `ProviderError::Timeout`
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config(
                "OpenRouter API key is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()
            .map_err(|e| ProviderError::Config(format!("HTTP client build failed: {e}")))?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            api_key,
            base_url,
            timeout,
            client,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: request.model,
            messages: request.messages,
        };

        info!(
            "OpenRouter chat request: model={}, message_count={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        debug!("OpenRouter response status: {status}");

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!("OpenRouter API error: {} - {}", status.as_u16(), text);
            return Err(api_error(status.as_u16(), &text));
        }

        let content = extract_content(&text)?;
        info!("OpenRouter completion received: {} bytes", content.len());
        Ok(content)
    }
}
