//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::config::ResolvedConfig;
use crate::core::message::ImageAttachment;
use crate::core::state::ConversationState;
use crate::inference::{CompletionProvider, CompletionRequest, PromptMessage, ProviderError};

/// An owned copy of a request the provider saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
}

/// A provider that answers from a queue and records every request.
/// Once the queue is empty, calls fail with a network error.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: request.model.to_string(),
            messages: request.messages.to_vec(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".to_string())))
    }
}

/// Defaults with a fixed model name and no API key.
pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        model_name: "test-model".to_string(),
        ..ResolvedConfig::default()
    }
}

/// A fresh conversation seeded with the default greeting.
pub fn test_state() -> ConversationState {
    ConversationState::new(test_config().greeting)
}

pub fn test_image() -> ImageAttachment {
    ImageAttachment {
        file_name: "cat.png".to_string(),
        mime_type: "image/png".to_string(),
        byte_len: 2048,
        data_uri: "data:image/png;base64,iVBORw0KGgo=".to_string(),
    }
}
