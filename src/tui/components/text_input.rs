//! # TextInput Component
//!
//! Editable text field used three ways: the send box (single line, Enter
//! submits), the sidebar search box, and the message editor (multi-line,
//! Enter inserts a newline).
//!
//! The buffer is internal state; `title` and `focused` are props.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the TextInput
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on a single-line input with non-blank text.
    Submit(String),
    /// The buffer changed.
    ContentChanged,
}

pub struct TextInput {
    pub buffer: String,
    pub title: String,
    pub focused: bool,
    multiline: bool,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(pos)
}

/// Byte offset of the `col`-th char of `line`, or its end when shorter.
fn offset_at_column(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl TextInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            title: title.into(),
            focused: false,
            multiline: false,
            cursor: 0,
        }
    }

    pub fn multiline(title: impl Into<String>) -> Self {
        Self {
            multiline: true,
            ..Self::new(title)
        }
    }

    /// Replaces the contents and parks the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// (column, row) of the cursor within the text, in terminal cells.
    fn cursor_cell(&self) -> (u16, u16) {
        let before = &self.buffer[..self.cursor];
        let row = before.matches('\n').count();
        let line = before.rsplit('\n').next().unwrap_or("");
        (line.width() as u16, row as u16)
    }

    /// Start of the line holding the cursor and the cursor's char column in it.
    fn line_position(&self) -> (usize, usize) {
        let start = self.buffer[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        (start, self.buffer[start..self.cursor].chars().count())
    }

    fn move_up(&mut self) {
        let (start, col) = self.line_position();
        if start == 0 {
            return;
        }
        let prev_end = start - 1;
        let prev_start = self.buffer[..prev_end]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.cursor = prev_start + offset_at_column(&self.buffer[prev_start..prev_end], col);
    }

    fn move_down(&mut self) {
        let (_, col) = self.line_position();
        let Some(newline) = self.buffer[self.cursor..].find('\n') else {
            return;
        };
        let next_start = self.cursor + newline + 1;
        let next_end = self.buffer[next_start..]
            .find('\n')
            .map(|i| next_start + i)
            .unwrap_or(self.buffer.len());
        self.cursor = next_start + offset_at_column(&self.buffer[next_start..next_end], col);
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

impl Component for TextInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str());

        // Keep the cursor row on screen
        let (col, row) = self.cursor_cell();
        let inner_height = area.height.saturating_sub(2).max(1);
        let scroll = row.saturating_sub(inner_height - 1);

        let paragraph = Paragraph::new(self.buffer.as_str())
            .block(block)
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);

        if self.focused && area.width > 2 && area.height > 2 {
            let x = area.x + 1 + col.min(area.width - 3);
            let y = area.y + 1 + (row - scroll);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for TextInput {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                if *c == '\n' && !self.multiline {
                    return None;
                }
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = if self.multiline {
                    text.clone()
                } else {
                    text.replace(['\r', '\n'], " ")
                };
                self.insert(&text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.replace_range(prev..self.cursor, "");
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.replace_range(self.cursor..next, "");
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                None
            }
            TuiEvent::CursorUp if self.multiline => {
                self.move_up();
                None
            }
            TuiEvent::CursorDown if self.multiline => {
                self.move_down();
                None
            }
            TuiEvent::Submit if self.multiline => {
                self.insert("\n");
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                self.cursor = 0;
                Some(InputEvent::Submit(std::mem::take(&mut self.buffer)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new("Message");
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        type_text(&mut input, "bé");
        assert_eq!(input.buffer, "abé");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "ab");
    }

    #[test]
    fn test_cursor_movement_edits_in_place() {
        let mut input = TextInput::new("Message");
        type_text(&mut input, "ac");
        input.handle_event(&TuiEvent::CursorLeft);
        type_text(&mut input, "b");
        assert_eq!(input.buffer, "abc");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "bc");
    }

    #[test]
    fn test_submit_takes_buffer() {
        let mut input = TextInput::new("Message");
        type_text(&mut input, "hello");
        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(
            input.buffer.is_empty(),
            "Buffer should be cleared after submit"
        );
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = TextInput::new("Message");
        type_text(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ");
    }

    #[test]
    fn test_multiline_enter_inserts_newline() {
        let mut input = TextInput::multiline("Edit");
        input.set_text("line one");
        input.handle_event(&TuiEvent::Submit);
        type_text(&mut input, "two");
        assert_eq!(input.buffer, "line one\ntwo");
    }

    #[test]
    fn test_multiline_up_down_keeps_column() {
        let mut input = TextInput::multiline("Edit");
        input.set_text("abc\nde\nfghij");

        // From column 5 on the last line, clamped to the end of "de"
        input.handle_event(&TuiEvent::CursorUp);
        type_text(&mut input, "X");
        assert_eq!(input.buffer, "abc\ndeX\nfghij");

        input.handle_event(&TuiEvent::CursorUp);
        type_text(&mut input, "Y");
        assert_eq!(input.buffer, "abcY\ndeX\nfghij");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::CursorDown);
        input.handle_event(&TuiEvent::CursorDown);
        type_text(&mut input, "Z");
        assert_eq!(input.buffer, "abcY\ndeX\nfZghij");
    }

    #[test]
    fn test_up_down_stop_at_edges() {
        let mut input = TextInput::multiline("Edit");
        input.set_text("only line");
        input.handle_event(&TuiEvent::CursorUp);
        input.handle_event(&TuiEvent::CursorDown);
        type_text(&mut input, "!");
        assert_eq!(input.buffer, "only line!");
    }

    #[test]
    fn test_single_line_ignores_up_down() {
        let mut input = TextInput::new("Message");
        input.set_text("abc");
        assert_eq!(input.handle_event(&TuiEvent::CursorUp), None);
        type_text(&mut input, "d");
        assert_eq!(input.buffer, "abcd");
    }

    #[test]
    fn test_single_line_paste_flattens_newlines() {
        let mut input = TextInput::new("Search");
        input.handle_event(&TuiEvent::Paste("a\nb".to_string()));
        assert_eq!(input.buffer, "a b");
    }

    #[test]
    fn test_render_shows_title_and_text() {
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = TextInput::new("Search");
        input.focused = true;
        input.set_text("rust");

        terminal
            .draw(|f| {
                let area = f.area();
                input.render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Search"));
        assert!(text.contains("rust"));
    }
}
