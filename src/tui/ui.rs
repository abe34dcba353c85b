use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::ConversationState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, SuggestionBar, TitleBar};
use crate::tui::{InputMode, TuiState};

/// Static facts about the session shown in the chrome.
pub struct ViewInfo<'a> {
    pub assistant_name: &'a str,
    pub model_name: &'a str,
}

/// Title-bar hint for the current mode.
pub fn status_hint(state: &ConversationState, mode: InputMode) -> String {
    match mode {
        InputMode::AttachPath => "Type an image path · Enter attach · Esc cancel".to_string(),
        InputMode::Chat if state.is_busy() => "Waiting for reply...".to_string(),
        InputMode::Chat => {
            let mut hints = vec!["Enter send", "Ctrl+O attach"];
            if state.pending_image().is_some() {
                hints.push("Ctrl+X remove image");
            }
            if state.can_summarize() {
                hints.push("Ctrl+S summarize");
            }
            if !state.suggestions().is_empty() {
                hints.push("Alt+1-3 reply");
            }
            hints.push("Esc quit");
            hints.join(" · ")
        }
    }
}

pub fn draw_ui(
    frame: &mut Frame,
    state: &ConversationState,
    tui: &mut TuiState,
    view: &ViewInfo,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let suggestions_height = if state.is_busy() {
        0
    } else {
        SuggestionBar::height(state.suggestions())
    };
    let error_height = u16::from(state.last_error().is_some());
    let preview_height = u16::from(state.pending_image().is_some());
    let input_height = tui.input_box.calculate_height(area.width);

    let [
        title_area,
        main_area,
        suggestions_area,
        error_area,
        preview_area,
        input_area,
    ] = Layout::vertical([
        Length(1),
        Min(0),
        Length(suggestions_height),
        Length(error_height),
        Length(preview_height),
        Length(input_height),
    ])
    .areas(area);

    MessageList::new(
        &mut tui.message_list,
        state.messages(),
        view.assistant_name,
        state.is_busy(),
        spinner_frame,
    )
    .render(frame, main_area);

    TitleBar::new(
        view.assistant_name,
        view.model_name,
        status_hint(state, tui.input_mode),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    if suggestions_height > 0 {
        SuggestionBar::new(state.suggestions()).render(frame, suggestions_area);
    }

    if let Some(error) = state.last_error() {
        draw_error_line(frame, error_area, error);
    }

    if let Some(image) = state.pending_image() {
        let preview = Line::from(vec![
            Span::styled("📎 ", Style::default().fg(Color::Cyan)),
            Span::styled(image.describe(), Style::default().fg(Color::Cyan)),
            Span::styled(
                "  (sent with your next message)",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        frame.render_widget(preview, preview_area);
    }

    tui.input_box.render(frame, input_area);
}

fn draw_error_line(frame: &mut Frame, area: Rect, error: &str) {
    let line = Paragraph::new(format!("⚠ {error}")).style(
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(line, area);
}
