//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (request in flight): draws every ~80ms so the typing spinner moves.
//! - **Idle**: sleeps up to 500ms and only redraws after an input event or a
//!   change to the conversation's revision counter.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, Persona, update};
use crate::core::attachment;
use crate::core::chat;
use crate::core::config::ResolvedConfig;
use crate::core::state::ConversationState;
use crate::inference::{CompletionProvider, OpenRouterProvider, ProviderError};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ViewInfo;

/// What the input box is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A chat message.
    Chat,
    /// A path to an image file (entered with Ctrl+O).
    AttachPath,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    /// Chat text set aside while the box collects a path
    draft: String,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Chat,
            draft: String::new(),
        }
    }

    /// Push conversation-derived props into the input box.
    pub fn sync_props(&mut self, state: &ConversationState) {
        match self.input_mode {
            InputMode::Chat => {
                self.input_box.title = "Message".to_string();
                self.input_box.dimmed = state.is_busy();
                self.input_box.allow_empty_submit = state.pending_image().is_some();
            }
            InputMode::AttachPath => {
                self.input_box.title = "Attach image (path)".to_string();
                self.input_box.dimmed = false;
                self.input_box.allow_empty_submit = false;
            }
        }
    }

    fn enter_attach_mode(&mut self) {
        self.draft = std::mem::take(&mut self.input_box.buffer);
        self.input_box.clear();
        self.input_mode = InputMode::AttachPath;
    }

    fn leave_attach_mode(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        self.input_box.set_text(draft);
        self.input_mode = InputMode::Chat;
    }
}

/// Turns one terminal event into at most one core action. TUI-local events
/// (typing, scrolling, mode switches) are handled here and yield `None`.
pub fn route_event(
    tui: &mut TuiState,
    state: &ConversationState,
    event: TuiEvent,
) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            None
        }
        _ => match tui.input_mode {
            InputMode::AttachPath => route_attach_event(tui, event),
            InputMode::Chat => route_chat_event(tui, state, event),
        },
    }
}

fn route_attach_event(tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Escape => {
            debug!("Attach cancelled");
            tui.leave_attach_mode();
            None
        }
        TuiEvent::Submit => {
            let path = std::mem::take(&mut tui.input_box.buffer);
            tui.leave_attach_mode();
            if path.trim().is_empty() {
                return None;
            }
            Some(match attachment::load_image(&path) {
                Ok(image) => Action::AttachImage(image),
                Err(e) => Action::AttachFailed(e.to_string()),
            })
        }
        TuiEvent::Attach
        | TuiEvent::Summarize
        | TuiEvent::ClearImage
        | TuiEvent::PickSuggestion(_) => None,
        other => {
            tui.input_box.handle_event(&other);
            None
        }
    }
}

fn route_chat_event(
    tui: &mut TuiState,
    state: &ConversationState,
    event: TuiEvent,
) -> Option<Action> {
    match event {
        TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::Summarize => Some(Action::Summarize),
        TuiEvent::Attach => {
            if state.can_submit() {
                tui.enter_attach_mode();
            }
            None
        }
        TuiEvent::ClearImage => state.pending_image().map(|_| Action::ClearImage),
        TuiEvent::PickSuggestion(index) => {
            if !state.can_submit() {
                return None;
            }
            state
                .suggestions()
                .get(index)
                .map(|text| Action::Submit(text.clone()))
        }
        // Keep the draft intact while a reply is pending
        TuiEvent::Submit if !state.can_submit() => None,
        other => match tui.input_box.handle_event(&other) {
            Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
            _ => None,
        },
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (disambiguates Alt+digit
        // and Ctrl+J); terminals that don't support it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Build the OpenRouter provider from a resolved config.
pub fn build_provider(
    config: &ResolvedConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let api_key = config.openrouter_api_key.clone().ok_or_else(|| {
        ProviderError::Config(
            "OpenRouter API key is not set (use OPENROUTER_API_KEY or [openrouter].api_key in ~/.aiko/config.toml)"
                .to_string(),
        )
    })?;
    let provider = OpenRouterProvider::new(
        api_key,
        Some(config.openrouter_base_url.clone()),
        config.request_timeout,
    )?;
    Ok(Arc::new(provider))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config).map_err(|e| {
        warn!("Cannot start: {}", e);
        std::io::Error::other(e.user_message())
    })?;
    let persona = Persona {
        assistant_name: config.assistant_name.clone(),
        system_prompt: config.system_prompt.clone(),
    };
    let view = ViewInfo {
        assistant_name: &config.assistant_name,
        model_name: &config.model_name,
    };
    let mut state = ConversationState::new(config.greeting.clone());
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut drawn_revision: Option<u64> = None;
    let mut needs_redraw = true;

    'event_loop: loop {
        tui.sync_props(&state);

        let animating = state.is_busy();
        if animating || drawn_revision != Some(state.revision()) {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &state, &mut tui, &view, spinner_frame))?;
            drawn_revision = Some(state.revision());
            needs_redraw = false;
        }

        // Short timeout while the spinner runs (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&mut tui, &state, event) else {
                continue;
            };
            debug!("Event loop dispatching: {:?}", action);
            let effect = update(&mut state, &persona, action);
            if !start_effect(effect, &provider, &config.model_name, &tx) {
                break 'event_loop;
            }
        }

        // Handle background task actions (completion results)
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut state, &persona, action);
            if !start_effect(effect, &provider, &config.model_name, &tx) {
                break 'event_loop;
            }
        }
    }

    info!("Aiko shutting down");
    ratatui::restore();
    Ok(())
}

/// Starts the I/O an effect asks for. Returns `false` when the app should quit.
fn start_effect(
    effect: Effect,
    provider: &Arc<dyn CompletionProvider>,
    model: &str,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => true,
        Effect::Quit => false,
        request => {
            spawn_request(request, provider.clone(), model.to_string(), tx.clone());
            true
        }
    }
}

fn spawn_request(
    effect: Effect,
    provider: Arc<dyn CompletionProvider>,
    model: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning API request via {}", provider.name());
    tokio::spawn(async move {
        let started = Instant::now();
        let Some(action) = chat::run_effect(provider.as_ref(), &model, effect).await else {
            return;
        };
        debug!("Request finished in {}ms", started.elapsed().as_millis());
        if tx.send(action).is_err() {
            warn!("Failed to send completion result: receiver dropped");
        }
    });
}
