//! # Conversation State
//!
//! Core business state for Aiko. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! ConversationState
//! ├── messages: Vec<Message>              // append-only log
//! ├── pending_image: Option<Attachment>   // staged for the next send
//! ├── suggestions: Vec<String>            // quick replies
//! ├── is_busy: bool                       // primary request in flight
//! ├── last_error: Option<String>          // shown inline
//! ├── request_seq: u64                    // id of the latest primary request
//! └── revision: u64                       // bumped on every mutation
//! ```
//!
//! State changes only happen through the named setters below, and in the app
//! only `update(state, action)` in action.rs calls them.

use crate::core::message::{ImageAttachment, Message};

pub struct ConversationState {
    messages: Vec<Message>,
    pending_image: Option<ImageAttachment>,
    suggestions: Vec<String>,
    is_busy: bool,
    last_error: Option<String>,
    request_seq: u64,
    revision: u64,
}

impl ConversationState {
    /// Creates the state seeded with the assistant's greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
            pending_image: None,
            suggestions: Vec::new(),
            is_busy: false,
            last_error: None,
            request_seq: 0,
            revision: 0,
        }
    }

    /// Appends to the log. Any visible suggestions belong to the previous
    /// turn, so they are dropped.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.suggestions.clear();
        self.touch();
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.is_busy = busy;
        self.touch();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.last_error = error;
        self.touch();
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
        self.touch();
    }

    pub fn set_pending_image(&mut self, image: Option<ImageAttachment>) {
        self.pending_image = image;
        self.touch();
    }

    /// Removes and returns the staged image.
    pub fn take_pending_image(&mut self) -> Option<ImageAttachment> {
        let image = self.pending_image.take();
        if image.is_some() {
            self.touch();
        }
        image
    }

    /// Starts a new primary request and returns its sequence number.
    /// Late results tagged with an older number are stale.
    pub fn begin_request(&mut self) -> u64 {
        self.request_seq += 1;
        self.suggestions.clear();
        self.last_error = None;
        self.is_busy = true;
        self.touch();
        self.request_seq
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_image(&self) -> Option<&ImageAttachment> {
        self.pending_image.as_ref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }

    /// Monotonic change counter; observers redraw when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy
    }

    /// Summaries need something beyond the greeting and one exchange.
    pub fn can_summarize(&self) -> bool {
        !self.is_busy && self.messages.len() > 2
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
