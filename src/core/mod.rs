//! # Core Application Logic
//!
//! This module contains Aiko's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (conversation) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • chat (effect runner) │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌─────────────┐
//!          │    TUI     │                │ ChatSession │
//!          │  Adapter   │                │ (headless)  │
//!          │ (ratatui)  │                │             │
//!          └────────────┘                └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ConversationState`, the message log plus transient flags
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`chat`]: turns request effects into completion calls
//! - [`prompt`]: prompt construction and suggestion parsing
//! - [`attachment`]: image loading and validation
//! - [`config`]: layered configuration

pub mod action;
pub mod attachment;
pub mod chat;
pub mod config;
pub mod message;
pub mod prompt;
pub mod state;

pub use action::{Action, Effect, Persona, update};
pub use chat::ChatSession;
pub use state::ConversationState;
