use std::fmt;

use async_trait::async_trait;

use super::types::PromptMessage;

/// Shown when the endpoint answers 2xx but carries no completion text.
pub const INVALID_RESPONSE_MESSAGE: &str = "Received an invalid response from the AI.";

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// No response within the configured window. Resolves like a network failure.
    Timeout { secs: u64 },
    /// API returned a non-2xx response. `message` is the server-provided
    /// `error.message` when the body had one.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response body.
    Parse(String),
    /// 2xx response without `choices[0].message.content`, or with blank content.
    EmptyCompletion,
}

impl ProviderError {
    /// Text suitable for the inline error line.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Config(msg) => format!("Configuration problem: {msg}"),
            ProviderError::Network(msg) => format!("Network error: {msg}"),
            ProviderError::Timeout { secs } => {
                format!("The request timed out after {secs}s. Please try again.")
            }
            ProviderError::Api { message, .. } => message.clone(),
            ProviderError::Parse(_) | ProviderError::EmptyCompletion => {
                INVALID_RESPONSE_MESSAGE.to_string()
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Timeout { secs } => write!(f, "request timed out after {secs}s"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::EmptyCompletion => write!(f, "response carried no completion text"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill a completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [PromptMessage],
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Performs one request/response exchange and returns the completion text.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}
