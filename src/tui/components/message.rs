use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message as ChatMessage, Role};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Title of the box around summary notes.
pub const SUMMARY_TITLE: &str = "Conversation Summary";
/// Title of the box around the user's own messages.
pub const USER_TITLE: &str = "You";

/// A stateless component that renders one chat message.
///
/// `Message` is created fresh each frame. Each role gets its own treatment:
/// - **User** (magenta): title on the right, like the sending side of a chat
/// - **Assistant** (blue): titled with the assistant's name
/// - **SummaryNote** (yellow, italic): a "Conversation Summary" box
///
/// Messages that carried an image show a `[image] name (mime, size)` line
/// above the text in place of a thumbnail.
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap` options that match ratatui's `Paragraph` wrapping, so the
/// parent `MessageList` can lay out the scroll canvas without rendering.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub assistant_name: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, assistant_name: &'a str) -> Self {
        Self {
            message,
            assistant_name,
        }
    }

    /// Calculate the height required for this message given a width.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still take one row.
            return 1;
        }

        let options = || {
            textwrap::Options::new(content_width as usize)
                .break_words(true)
                .word_separator(textwrap::WordSeparator::AsciiSpace)
        };

        let rows =
            |text: &str| u16::try_from(textwrap::wrap(text, options()).len()).unwrap_or(u16::MAX);

        let image_lines = message
            .image()
            .map(|image| rows(&image_line(image)))
            .unwrap_or(0);
        let text_lines = match message.text().map(str::trim) {
            Some(text) if !text.is_empty() => rows(text).max(1),
            _ => 0,
        };

        image_lines
            .saturating_add(text_lines)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn image_line(image: &crate::core::message::ImageAttachment) -> String {
    format!("[image] {}", image.describe())
}

pub(crate) fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Magenta),
        Role::Assistant => Style::default().fg(Color::Blue),
        Role::SummaryNote => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role = self.message.role();
        let style = role_style(role);
        let border_style = style.add_modifier(Modifier::DIM);

        let title = match role {
            Role::User => Line::from(USER_TITLE).right_aligned(),
            Role::Assistant => Line::from(self.assistant_name),
            Role::SummaryNote => Line::from(SUMMARY_TITLE),
        };

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let mut lines: Vec<Line> = Vec::new();
        if let Some(image) = self.message.image() {
            lines.push(Line::from(Span::styled(
                image_line(image),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
            )));
        }
        if let Some(text) = self.message.text().map(str::trim) {
            lines.extend(text.lines().map(|l| Line::from(l.to_string())));
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Text::from(lines))
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
