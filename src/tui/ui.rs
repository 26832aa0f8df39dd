use crate::core::state::{App, View};
use crate::tui::component::Component;
use crate::tui::components::{FocusedMessage, TitleBar, Transcript};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

/// Sidebar share of the body width, in percent.
const SIDEBAR_PERCENT: u16 = 32;
const INPUT_HEIGHT: u16 = 3;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min, Percentage};

    let input_height = if app.show_input { INPUT_HEIGHT } else { 0 };
    let [title_area, body_area, input_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height), Length(1)])
            .areas(frame.area());
    let [sidebar_area, main_area] =
        Layout::horizontal([Percentage(SIDEBAR_PERCENT), Min(0)]).areas(body_area);
    let [search_area, list_area] =
        Layout::vertical([Length(INPUT_HEIGHT), Min(0)]).areas(sidebar_area);

    TitleBar {
        model_name: app.model_name.clone(),
        temperature: app.temperature,
        status_message: app.status_message.clone(),
        is_loading: app.is_loading,
        spinner_frame,
    }
    .render(frame, title_area);

    tui.search_box.render(frame, search_area);
    tui.sidebar.render(frame, list_area);
    draw_main(frame, main_area, app, tui);

    if app.show_input {
        tui.input_box.render(frame, input_area);
    }

    frame.render_widget(
        Paragraph::new(Line::styled(
            help_text(app.view(), tui.focus),
            Style::default().add_modifier(Modifier::DIM),
        )),
        help_area,
    );
}

fn draw_main(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    match app.view() {
        View::Editing(_) => tui.editor.render(frame, area),
        View::Focused(index) => match app.store.get(index) {
            Some(message) => FocusedMessage {
                message,
                starred: app.store.is_starred(index),
            }
            .render(frame, area),
            None => draw_transcript(frame, area, app, tui),
        },
        View::List => draw_transcript(frame, area, app, tui),
    }
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    Transcript {
        messages: app.store.messages(),
        starred: app.store.starred(),
        is_loading: app.is_loading,
        scroll: &mut tui.transcript_scroll,
    }
    .render(frame, area);
}

/// Key hints for the bottom line, depending on what currently has the keys.
fn help_text(view: View, focus: Focus) -> &'static str {
    match (view, focus) {
        (View::Editing(_), _) => "Ctrl+S save · Esc cancel · Enter new line",
        (_, Focus::Sidebar) => {
            "↑↓ move · Enter open · s star · e edit · + new message · Tab search · Esc back"
        }
        (_, Focus::Search) => "Type to filter · Enter results · Tab input · Esc back",
        (View::Focused(_), Focus::Input) => "Esc back to full chat view · Tab history",
        (View::List, Focus::Input) => {
            "Enter send · Tab history · Ctrl+↑↓ temperature · Ctrl+E export · Ctrl+L clear · Ctrl+N new chat · Ctrl+C quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState) -> String {
        tui.sync(app);
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn chatted_app() -> App {
        let mut app = test_app();
        update(&mut app, Action::Submit("What is Rust?".to_string()));
        let reply = Action::ResponseReady("A systems language.".to_string());
        update(&mut app, reply);
        app
    }

    #[test]
    fn test_draw_ui_fresh_app() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Quantum Chat"));
        assert!(text.contains("test-model"));
        assert!(text.contains("Chat History (0)"));
        assert!(text.contains("Say hello"));
    }

    #[test]
    fn test_draw_ui_list_view() {
        let app = chatted_app();
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Chat History (2)"));
        assert!(text.contains("What is Rust?"));
        assert!(text.contains("A systems language."));
    }

    #[test]
    fn test_draw_ui_focused_view() {
        let mut app = chatted_app();
        update(&mut app, Action::Select(2));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Assistant"));
        assert!(text.contains("Esc: back to full chat view"));
    }

    #[test]
    fn test_draw_ui_editing_view() {
        let mut app = chatted_app();
        update(&mut app, Action::BeginEdit(1));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Edit Message"));
        assert!(text.contains("Ctrl+S save"));
        assert_eq!(tui.editor.buffer, "What is Rust?");
    }

    #[test]
    fn test_draw_ui_hidden_input() {
        let mut app = test_app();
        app.show_input = false;
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(!text.contains("Message (Enter to send)"));
    }

    #[test]
    fn test_help_text_follows_focus() {
        assert!(help_text(View::List, Focus::Sidebar).contains("s star"));
        assert!(help_text(View::Editing(1), Focus::Input).contains("Ctrl+S"));
        let input_hint = help_text(View::List, Focus::Input);
        assert!(input_hint.contains("Ctrl+E export"));
    }
}
