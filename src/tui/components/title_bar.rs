//! # TitleBar Component
//!
//! Single status line across the top of the screen: application name,
//! active model, sampling temperature and the latest status message.
//!
//! Stateless. Every field is a prop copied from `App` right before rendering,
//! so the bar never disagrees with the core state.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub model_name: String,
    pub temperature: f32,
    pub status_message: String,
    pub is_loading: bool,
    /// Monotonic frame counter driving the spinner.
    pub spinner_frame: usize,
}

impl TitleBar {
    fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled("Quantum Chat", bold),
            Span::raw(format!(" (model: {})", self.model_name)),
            Span::styled(" | ", dim),
            Span::raw(format!("temp {:.2}", self.temperature)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", dim));
            if self.is_loading {
                spans.push(Span::styled(
                    format!("{} ", self.spinner()),
                    Style::default().fg(Color::Yellow),
                ));
            }
            spans.push(Span::raw(self.status_message.clone()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                title_bar.render(f, area);
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

    fn title_bar(status: &str, is_loading: bool) -> TitleBar {
        TitleBar {
            model_name: "deepseek-r1:1.5b".to_string(),
            temperature: 0.7,
            status_message: status.to_string(),
            is_loading,
            spinner_frame: 0,
        }
    }

    #[test]
    fn test_shows_model_and_temperature() {
        let text = render_to_string(&mut title_bar("", false));
        assert!(text.contains("Quantum Chat"));
        assert!(text.contains("deepseek-r1:1.5b"));
        assert!(text.contains("temp 0.70"));
    }

    #[test]
    fn test_shows_status_message() {
        let mut bar = title_bar("Exported chat to /tmp/chat_history.pdf", false);
        let text = render_to_string(&mut bar);
        assert!(text.contains("Exported chat to"));
        assert!(!text.contains('⠋'));
    }

    #[test]
    fn test_spinner_while_loading() {
        let text = render_to_string(&mut title_bar("Thinking...", true));
        assert!(text.contains('⠋'));
        assert!(text.contains("Thinking..."));
    }

    #[test]
    fn test_spinner_cycles() {
        let mut bar = title_bar("Thinking...", true);
        bar.spinner_frame = 11;
        assert_eq!(bar.spinner(), "⠙");
    }
}
