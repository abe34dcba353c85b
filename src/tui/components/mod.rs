//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: assistant name, model, status hint
//! - `Message`: one conversation message
//! - `SuggestionBar`: numbered quick-reply chips
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state between frames and react to events:
//! - `InputBox`: multi-line text entry
//! - `MessageList`: scrollable conversation with layout caching
//!
//! Components get their data as props, never by reaching into
//! `ConversationState` themselves:
//!
//! ```rust,ignore
//! TitleBar::new(&config.assistant_name, &config.model_name, hint, unseen).render(frame, area);
//! ```
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── suggestions.rs
//! └── input_box/
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod suggestions;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use suggestions::SuggestionBar;
