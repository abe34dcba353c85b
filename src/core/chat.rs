//! # Chat Driver
//!
//! Runs the I/O half of the reducer loop: each request [`Effect`] becomes one
//! completion call whose outcome comes back as an [`Action`].
//!
//! ```text
//! Effect::RequestReply       → complete() → ReplyReceived | ReplyFailed
//! Effect::RequestSuggestions → complete() → SuggestionsReady (empty on any failure)
//! Effect::RequestSummary     → complete() → SummaryReceived | SummaryFailed
//! ```
//!
//! The TUI runs these inside spawned tasks. [`ChatSession`] runs them inline,
//! which is what tests and non-interactive callers want.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::action::{Action, Effect, Persona, update};
use crate::core::config::ResolvedConfig;
use crate::core::prompt;
use crate::core::state::ConversationState;
use crate::inference::{CompletionProvider, CompletionRequest, PromptMessage};

/// Executes one request effect. Returns `None` for effects that involve no
/// completion call.
pub async fn run_effect(
    provider: &dyn CompletionProvider,
    model: &str,
    effect: Effect,
) -> Option<Action> {
    match effect {
        Effect::RequestReply { seq, prompt } => {
            let result = provider
                .complete(CompletionRequest {
                    model,
                    messages: &prompt,
                })
                .await;
            Some(match result {
                Ok(text) => Action::ReplyReceived { seq, text },
                Err(error) => Action::ReplyFailed { seq, error },
            })
        }
        Effect::RequestSuggestions { seq, prompt } => {
            let suggestions = fetch_suggestions(provider, model, &prompt).await;
            Some(Action::SuggestionsReady { seq, suggestions })
        }
        Effect::RequestSummary { seq, prompt } => {
            let result = provider
                .complete(CompletionRequest {
                    model,
                    messages: &prompt,
                })
                .await;
            Some(match result {
                Ok(text) => Action::SummaryReceived { seq, text },
                Err(error) => Action::SummaryFailed { seq, error },
            })
        }
        Effect::None | Effect::Quit => None,
    }
}

/// Never fails: transport, HTTP and parse problems all yield an empty list.
async fn fetch_suggestions(
    provider: &dyn CompletionProvider,
    model: &str,
    prompt: &[PromptMessage],
) -> Vec<String> {
    let raw = match provider
        .complete(CompletionRequest {
            model,
            messages: prompt,
        })
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Suggestion request failed: {}", e);
            return Vec::new();
        }
    };
    match prompt::parse_suggestions(&raw) {
        Some(list) => {
            debug!("Parsed {} suggestions", list.len());
            list
        }
        None => {
            warn!("Suggestion reply was not a JSON string array");
            Vec::new()
        }
    }
}

/// A conversation wired to a provider, with effects executed inline.
pub struct ChatSession {
    state: ConversationState,
    persona: Persona,
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        Self {
            state: ConversationState::new(config.greeting.clone()),
            persona: Persona {
                assistant_name: config.assistant_name.clone(),
                system_prompt: config.system_prompt.clone(),
            },
            provider,
            model: config.model_name.clone(),
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Applies `action` and keeps running the effects it produces until the
    /// chain settles. Returns `false` once the session was asked to quit.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        let mut effect = update(&mut self.state, &self.persona, action);
        loop {
            match effect {
                Effect::None => return true,
                Effect::Quit => {
                    info!("Session quit requested");
                    return false;
                }
                request => {
                    let Some(next) = run_effect(self.provider.as_ref(), &self.model, request).await
                    else {
                        return true;
                    };
                    effect = update(&mut self.state, &self.persona, next);
                }
            }
        }
    }

    pub async fn send(&mut self, text: &str) {
        self.dispatch(Action::Submit(text.to_string())).await;
    }

    pub async fn summarize(&mut self) {
        self.dispatch(Action::Summarize).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::inference::ProviderError;
    use crate::test_support::{ScriptedProvider, test_config, test_image};

    fn session(provider: &Arc<ScriptedProvider>) -> ChatSession {
        ChatSession::new(provider.clone(), &test_config())
    }

    #[tokio::test]
    async fn hello_scenario_gets_reply_and_suggestions() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Hi! How are you?".to_string()),
            Ok(r#"["Great!", "Tired.", "And you?"]"#.to_string()),
        ]));
        let mut chat = session(&provider);
        chat.send("Hello").await;

        let state = chat.state();
        assert_eq!(state.messages().len(), 3);
        assert_eq!(state.messages()[2].text(), Some("Hi! How are you?"));
        assert_eq!(state.suggestions(), ["Great!", "Tired.", "And you?"]);
        assert!(!state.is_busy());

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "test-model");
        assert!(requests[1].messages[0].content.contains("\"Hi! How are you?\""));
    }

    #[tokio::test]
    async fn suggestion_failure_is_silent() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Hey".to_string()),
            Err(ProviderError::Network("connection reset".to_string())),
        ]));
        let mut chat = session(&provider);
        chat.send("Hello").await;

        assert_eq!(chat.state().messages().len(), 3);
        assert!(chat.state().suggestions().is_empty());
        assert!(chat.state().last_error().is_none());
    }

    #[tokio::test]
    async fn non_array_suggestions_are_empty() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Hey".to_string()),
            Ok("Sure, here are some ideas: ...".to_string()),
        ]));
        let mut chat = session(&provider);
        chat.send("Hello").await;
        assert!(chat.state().suggestions().is_empty());
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_send_sets_error_and_skips_suggestions() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Timeout {
            secs: 30,
        })]));
        let mut chat = session(&provider);
        chat.send("Hello").await;

        let state = chat.state();
        assert_eq!(state.messages().len(), 2);
        assert!(!state.is_busy());
        assert_eq!(
            state.last_error(),
            Some("The request timed out after 30s. Please try again.")
        );
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn image_send_makes_one_request() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("A cat!".to_string())]));
        let mut chat = session(&provider);
        chat.dispatch(Action::AttachImage(test_image())).await;
        chat.send("What is this?").await;

        assert_eq!(chat.state().messages().len(), 3);
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let last = requests[0].messages.last().unwrap();
        assert_eq!(last.content, "[Image is present] What is this?");
    }

    #[tokio::test]
    async fn summarize_appends_note() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Hey".to_string()),
            Ok("[]".to_string()),
            Ok("They said hi.".to_string()),
        ]));
        let mut chat = session(&provider);
        chat.send("Hello").await;
        chat.summarize().await;

        let last = chat.state().messages().last().unwrap();
        assert_eq!(last.role(), Role::SummaryNote);
        assert_eq!(last.text(), Some("They said hi."));
        assert!(provider.requests()[2].messages[0].content.contains("Aiko: Hey"));
    }

    #[tokio::test]
    async fn every_send_adds_one_exchange() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("R1".to_string()),
            Ok(r#"["ok"]"#.to_string()),
            Ok("R2".to_string()),
            Ok("[]".to_string()),
            Ok("They chatted.".to_string()),
            Ok("R3".to_string()),
            Ok("[]".to_string()),
        ]));
        let mut chat = session(&provider);

        chat.send("one").await;
        assert_eq!(chat.state().messages().len(), 3);
        assert_eq!(chat.state().suggestions(), ["ok"]);
        chat.send("two").await;
        assert_eq!(chat.state().messages().len(), 5);

        chat.summarize().await;
        assert_eq!(chat.state().messages().len(), 6);

        chat.send("three").await;
        let state = chat.state();
        assert_eq!(state.messages().len(), 8);
        assert_eq!(state.messages()[7].text(), Some("R3"));
        assert!(state.last_error().is_none());

        let requests = provider.requests();
        assert_eq!(requests.len(), 7);
        assert_eq!(
            requests[5].messages,
            vec![
                PromptMessage::assistant(test_config().greeting),
                PromptMessage::user("one"),
                PromptMessage::assistant("R1"),
                PromptMessage::user("two"),
                PromptMessage::assistant("R2"),
                PromptMessage::user("three"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_send_makes_no_request() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let mut chat = session(&provider);
        chat.send("   ").await;
        assert_eq!(chat.state().messages().len(), 1);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn quit_stops_the_session() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let mut chat = session(&provider);
        assert!(!chat.dispatch(Action::Quit).await);
    }
}
