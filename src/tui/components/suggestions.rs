//! # SuggestionBar Component
//!
//! One row of numbered quick-reply chips. Chip `n` is sent with Alt+n or Fn.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct SuggestionBar<'a> {
    pub suggestions: &'a [String],
}

impl<'a> SuggestionBar<'a> {
    pub fn new(suggestions: &'a [String]) -> Self {
        Self { suggestions }
    }

    /// Rows this bar needs: none when there is nothing to offer.
    pub fn height(suggestions: &[String]) -> u16 {
        u16::from(!suggestions.is_empty())
    }

    fn line(&self) -> Line<'a> {
        let key_style = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);
        let chip_style = Style::default().fg(Color::White).bg(Color::DarkGray);

        let mut spans = Vec::with_capacity(self.suggestions.len() * 3);
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("{}", i + 1), key_style));
            spans.push(Span::styled(format!(" {suggestion} "), chip_style));
        }
        Line::from(spans)
    }
}

impl<'a> Component for SuggestionBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.suggestions.is_empty() {
            return;
        }
        frame.render_widget(self.line(), area);
    }
}
