//! # TitleBar Component
//!
//! Top status bar: who you are talking to, which model answers, and a short
//! status or shortcut hint.
//!
//! TitleBar is stateless. It receives everything as props and renders a single
//! line, so the most important information comes first and the hint is the
//! first thing cut off on a narrow terminal:
//!
//! 1. **Unseen content**: `"Aiko (model: x) | hint | ↓ New"`
//! 2. **Hint present**: `"Aiko (model: x) | hint"`
//! 3. **Default**: `"Aiko (model: x)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub assistant_name: String,
    pub model_name: String,
    /// Status or key hint (e.g., "Ctrl+S summarize")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        assistant_name: impl Into<String>,
        model_name: impl Into<String>,
        status_message: impl Into<String>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            model_name: model_name.into(),
            status_message: status_message.into(),
            has_unseen_content,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                self.assistant_name.clone(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" (model: {})", self.model_name)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Yellow)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
