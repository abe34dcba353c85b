//! # Actions
//!
//! Everything that can happen in Aiko becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The API answers? That's `Action::ReplyReceived { seq, text }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an [`Effect`] describing the I/O the caller should start.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! Effects carry every input their task needs (sequence number, prompt), so
//! the task that runs them never reads the state.

use log::{debug, info, warn};

use crate::core::message::{ImageAttachment, Message, Role};
use crate::core::prompt;
use crate::core::state::ConversationState;
use crate::inference::types::replace_typography;
use crate::inference::{PromptMessage, ProviderError};

/// Shown inline when summarization fails for any reason.
pub const SUMMARY_ERROR_MESSAGE: &str = "Sorry, I couldn't create a summary.";

/// Prompt inputs that come from configuration rather than the conversation.
#[derive(Debug, Clone)]
pub struct Persona {
    pub assistant_name: String,
    pub system_prompt: Option<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            assistant_name: crate::core::config::DEFAULT_ASSISTANT_NAME.to_string(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // User
    /// Send the typed text together with any staged image.
    Submit(String),
    /// Stage an image for the next send.
    AttachImage(ImageAttachment),
    /// An attach attempt was rejected; the message is shown inline.
    AttachFailed(String),
    ClearImage,
    Summarize,
    Quit,

    // Completion results
    ReplyReceived { seq: u64, text: String },
    ReplyFailed { seq: u64, error: ProviderError },
    SuggestionsReady { seq: u64, suggestions: Vec<String> },
    SummaryReceived { seq: u64, text: String },
    SummaryFailed { seq: u64, error: ProviderError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RequestReply { seq: u64, prompt: Vec<PromptMessage> },
    /// Ask for quick replies to the assistant's latest message. Failures are
    /// reported as an empty `SuggestionsReady`.
    RequestSuggestions { seq: u64, prompt: Vec<PromptMessage> },
    RequestSummary { seq: u64, prompt: Vec<PromptMessage> },
    Quit,
}

pub fn update(state: &mut ConversationState, persona: &Persona, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if !state.can_submit() {
                debug!("Ignoring submit while a request is in flight");
                return Effect::None;
            }
            let image = state.pending_image().cloned();
            let has_image = image.is_some();
            let Some(message) = Message::user(&text, image) else {
                return Effect::None;
            };

            // Cleared with the send so a failed reply can't resend it.
            state.take_pending_image();
            state.append(message);
            let seq = state.begin_request();
            info!(
                "Sending message #{} (seq={}, image={})",
                state.messages().len(),
                seq,
                has_image
            );
            Effect::RequestReply {
                seq,
                prompt: prompt::reply_prompt(state.messages(), persona.system_prompt.as_deref()),
            }
        }

        Action::AttachImage(image) => {
            info!("Staged image {}", image.describe());
            state.set_pending_image(Some(image));
            state.set_error(None);
            Effect::None
        }

        Action::AttachFailed(message) => {
            warn!("Attachment rejected: {}", message);
            state.set_error(Some(message));
            Effect::None
        }

        Action::ClearImage => {
            state.set_pending_image(None);
            Effect::None
        }

        Action::Summarize => {
            if !state.can_summarize() {
                debug!("Ignoring summarize (busy or too little history)");
                return Effect::None;
            }
            let seq = state.begin_request();
            info!("Summarizing {} messages (seq={})", state.messages().len(), seq);
            Effect::RequestSummary {
                seq,
                prompt: prompt::summary_prompt(state.messages(), &persona.assistant_name),
            }
        }

        Action::Quit => Effect::Quit,

        Action::ReplyReceived { seq, text } => {
            if seq != state.request_seq() {
                debug!("Dropping stale reply (seq={})", seq);
                return Effect::None;
            }
            let text = replace_typography(&text);
            state.append(Message::assistant(text));
            state.set_busy(false);
            follow_up_suggestions(state, persona, seq)
        }

        Action::ReplyFailed { seq, error } => {
            if seq != state.request_seq() {
                return Effect::None;
            }
            warn!("Reply failed: {}", error);
            state.set_error(Some(error.user_message()));
            state.set_busy(false);
            Effect::None
        }

        Action::SuggestionsReady { seq, suggestions } => {
            // A newer request (or a busy one) owns the suggestion area now.
            if seq != state.request_seq() || state.is_busy() {
                debug!("Dropping stale suggestions (seq={})", seq);
                return Effect::None;
            }
            state.set_suggestions(suggestions);
            Effect::None
        }

        Action::SummaryReceived { seq, text } => {
            if seq != state.request_seq() {
                return Effect::None;
            }
            state.append(Message::summary_note(replace_typography(&text)));
            state.set_busy(false);
            Effect::None
        }

        Action::SummaryFailed { seq, error } => {
            if seq != state.request_seq() {
                return Effect::None;
            }
            warn!("Summary failed: {}", error);
            state.set_error(Some(SUMMARY_ERROR_MESSAGE.to_string()));
            state.set_busy(false);
            Effect::None
        }
    }
}

/// Quick replies are only offered after a text-only exchange: the reply must
/// be the newest message and the user turn before it must carry no image.
fn follow_up_suggestions(state: &ConversationState, persona: &Persona, seq: u64) -> Effect {
    let messages = state.messages();
    let [.., trigger, reply] = messages else {
        return Effect::None;
    };
    if trigger.role() != Role::User || trigger.has_image() || reply.role() != Role::Assistant {
        return Effect::None;
    }
    Effect::RequestSuggestions {
        seq,
        prompt: prompt::suggestions_prompt(&persona.assistant_name, reply.text_or_empty()),
    }
}
