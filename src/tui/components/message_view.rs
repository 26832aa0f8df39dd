//! # Message views
//!
//! The main pane in its two read-only modes:
//!
//! - [`Transcript`]: the whole conversation, scrollable, newest at the bottom.
//! - [`FocusedMessage`]: a single entry opened from the sidebar.
//!
//! Both render message text through [`crate::tui::markdown`]. Scroll position
//! lives in `TuiState` and is borrowed for the duration of a frame.

use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::inference::{Message, Role};
use crate::tui::component::Component;
use crate::tui::markdown;

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
        Role::System => Color::Gray,
    }
}

/// Header line plus markdown body for one chat entry.
fn entry_text(message: &Message, starred: bool) -> Text<'static> {
    let mut header = vec![Span::styled(
        format!("{}:", message.role.label()),
        Style::default()
            .fg(role_color(message.role))
            .add_modifier(Modifier::BOLD),
    )];
    if starred {
        let star = Style::default().fg(Color::Yellow);
        header.push(Span::styled(" ★", star));
    }

    let mut text = Text::from(Line::from(header));
    text.extend(markdown::render(&message.text, Color::Reset));
    text
}

/// Row count clamped to what a `u16` canvas can hold.
fn rows(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

pub struct Transcript<'a> {
    pub messages: &'a [Message],
    pub starred: &'a BTreeSet<usize>,
    pub is_loading: bool,
    pub scroll: &'a mut ScrollViewState,
}

impl Transcript<'_> {
    fn content(&self) -> Text<'static> {
        let mut text = Text::default();
        for (index, message) in self.messages.iter().enumerate() {
            if message.role == Role::System {
                continue;
            }
            let starred = self.starred.contains(&index);
            text.extend(entry_text(message, starred));
            text.push_line(Line::default());
        }
        if self.is_loading {
            text.push_line(Line::styled(
                "Bot is thinking...",
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            ));
        }
        text
    }
}

impl Component for Transcript<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().add_modifier(Modifier::DIM))
            .title("Conversation");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content = self.content();
        if content.lines.is_empty() {
            let hint = Paragraph::new("Say hello to start the conversation.")
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(hint, inner);
            return;
        }

        // One column reserved for the scrollbar
        let content_width = inner.width.saturating_sub(1).max(1);
        let paragraph = Paragraph::new(content).wrap(Wrap { trim: false });
        let height = rows(paragraph.line_count(content_width));

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never)
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, inner, self.scroll);
    }
}

pub struct FocusedMessage<'a> {
    pub message: &'a Message,
    pub starred: bool,
}

impl Component for FocusedMessage<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = self.message.role.title().to_string();
        if self.starred {
            title.push_str(" ★");
        }
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(role_color(self.message.role)))
            .title(title)
            .title_bottom(Line::styled(
                " Esc: back to full chat view ",
                Style::default().add_modifier(Modifier::DIM),
            ));

        let body = markdown::render(&self.message.text, Color::Reset);
        frame.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(width: u16, height: u16, component: &mut dyn Component) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                component.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::system("You are a helpful AI assistant."),
            Message::user("Hi"),
            Message::assistant("Hello! **How** can I help?"),
        ]
    }

    #[test]
    fn test_transcript_hides_system_prompt() {
        let messages = conversation();
        let starred = BTreeSet::from([2]);
        let mut scroll = ScrollViewState::default();
        let mut transcript = Transcript {
            messages: &messages,
            starred: &starred,
            is_loading: false,
            scroll: &mut scroll,
        };

        let text = draw(60, 12, &mut transcript);
        assert!(text.contains("You:"));
        assert!(text.contains("Bot: ★"));
        assert!(text.contains("How can I help?"));
        assert!(!text.contains("helpful AI assistant"));
    }

    #[test]
    fn test_transcript_shows_thinking_indicator() {
        let messages = conversation();
        let starred = BTreeSet::new();
        let mut scroll = ScrollViewState::default();
        let mut transcript = Transcript {
            messages: &messages[..2],
            starred: &starred,
            is_loading: true,
            scroll: &mut scroll,
        };

        let text = draw(60, 12, &mut transcript);
        assert!(text.contains("Bot is thinking..."));
    }

    #[test]
    fn test_empty_transcript_shows_hint() {
        let messages = vec![Message::system("prompt")];
        let starred = BTreeSet::new();
        let mut scroll = ScrollViewState::default();
        let mut transcript = Transcript {
            messages: &messages,
            starred: &starred,
            is_loading: false,
            scroll: &mut scroll,
        };

        let text = draw(60, 6, &mut transcript);
        assert!(text.contains("Say hello"));
    }

    #[test]
    fn test_rows_saturate_instead_of_wrapping() {
        assert_eq!(rows(42), 42);
        assert_eq!(rows(70_000), u16::MAX);
    }

    #[test]
    fn test_focused_message_shows_role_title_and_hint() {
        let message = Message::assistant("Paris is the capital.");
        let mut focused = FocusedMessage {
            message: &message,
            starred: true,
        };

        let text = draw(50, 6, &mut focused);
        assert!(text.contains("Assistant ★"));
        assert!(text.contains("Paris is the capital."));
        assert!(text.contains("Esc: back to full chat view"));
    }
}
