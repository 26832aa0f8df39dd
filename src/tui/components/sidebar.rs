//! # Sidebar Component
//!
//! Scrollable list of chat entries matching the current search term. Each
//! row shows the speaker, a short preview and a star marker.
//!
//! Rows are props rebuilt from the store on every loop iteration; only the
//! highlighted row is internal state. Keys handled while focused:
//!
//! | Key        | Event                   |
//! |------------|-------------------------|
//! | Up / Down  | move highlight          |
//! | Enter      | `SidebarEvent::Open`    |
//! | `s`        | `SidebarEvent::ToggleStar` |
//! | `e`        | `SidebarEvent::Edit`    |
//! | `+`        | `SidebarEvent::ShowInput` |

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};

use crate::core::conversation::{ConversationStore, PREVIEW_CHARS, preview};
use crate::inference::Role;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    /// Position in the conversation store.
    pub index: usize,
    pub role: Role,
    pub preview: String,
    pub starred: bool,
}

impl SidebarEntry {
    /// Entries for every message matching `search`, in chat order.
    pub fn collect(store: &ConversationStore, search: &str) -> Vec<SidebarEntry> {
        store
            .filter(search)
            .iter()
            .map(|(index, message)| SidebarEntry {
                index,
                role: message.role,
                preview: preview(&message.text, PREVIEW_CHARS),
                starred: store.is_starred(index),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    Open(usize),
    ToggleStar(usize),
    Edit(usize),
    ShowInput,
}

#[derive(Default)]
pub struct Sidebar {
    pub entries: Vec<SidebarEntry>,
    pub focused: bool,
    list_state: ListState,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows, keeping the highlight in range.
    pub fn set_entries(&mut self, entries: Vec<SidebarEntry>) {
        self.entries = entries;
        let selected = match (self.list_state.selected(), self.entries.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.list_state.select(selected);
    }

    /// Store index of the highlighted row.
    pub fn highlighted(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|row| self.entries.get(row))
            .map(|entry| entry.index)
    }
}

impl Component for Sidebar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (star, star_style) = if entry.starred {
                    ("★ ", Style::default().fg(Color::Yellow))
                } else {
                    ("☆ ", Style::default().add_modifier(Modifier::DIM))
                };
                let role_style = match entry.role {
                    Role::User => Style::default().fg(Color::Cyan),
                    _ => Style::default().fg(Color::Green),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(star, star_style),
                    Span::styled(format!("{}: ", entry.role.label()), role_style),
                    Span::raw(entry.preview.clone()),
                ]))
            })
            .collect();

        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!("Chat History ({})", self.entries.len()));

        let mut list = List::new(items).block(block);
        if self.focused {
            list = list
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
        }
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl EventHandler for Sidebar {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select_previous();
                None
            }
            TuiEvent::CursorDown => {
                if let Some(row) = self.list_state.selected()
                    && row + 1 < self.entries.len()
                {
                    self.list_state.select(Some(row + 1));
                }
                None
            }
            TuiEvent::Submit => self.highlighted().map(SidebarEvent::Open),
            TuiEvent::InputChar('s') => self.highlighted().map(SidebarEvent::ToggleStar),
            TuiEvent::InputChar('e') => self.highlighted().map(SidebarEvent::Edit),
            TuiEvent::InputChar('+') => Some(SidebarEvent::ShowInput),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn store() -> ConversationStore {
        let mut store = ConversationStore::default();
        store.append(Role::User, "What is the capital of France?");
        store.append(Role::Assistant, "Paris.");
        store.append(Role::User, "And of Italy?");
        store
    }

    #[test]
    fn test_collect_skips_sentinel_and_marks_stars() {
        let mut store = store();
        store.toggle_star(2).unwrap();

        let entries = SidebarEntry::collect(&store, "");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].preview, "What is the capital of Fr...");
        assert!(entries[1].starred);
        assert!(!entries[0].starred);
    }

    #[test]
    fn test_collect_filters_by_search() {
        let entries = SidebarEntry::collect(&store(), "ITALY");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 3);
    }

    #[test]
    fn test_navigation_and_events() {
        let mut sidebar = Sidebar::new();
        sidebar.set_entries(SidebarEntry::collect(&store(), ""));

        assert_eq!(
            sidebar.handle_event(&TuiEvent::Submit),
            Some(SidebarEvent::Open(1))
        );

        sidebar.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            sidebar.handle_event(&TuiEvent::InputChar('s')),
            Some(SidebarEvent::ToggleStar(2))
        );

        sidebar.handle_event(&TuiEvent::CursorDown);
        sidebar.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            sidebar.handle_event(&TuiEvent::InputChar('e')),
            Some(SidebarEvent::Edit(3)),
            "Highlight should stop at the last row"
        );

        assert_eq!(
            sidebar.handle_event(&TuiEvent::InputChar('+')),
            Some(SidebarEvent::ShowInput)
        );
    }

    #[test]
    fn test_empty_sidebar_emits_nothing() {
        let mut sidebar = Sidebar::new();
        sidebar.set_entries(Vec::new());
        assert_eq!(sidebar.highlighted(), None);
        assert_eq!(sidebar.handle_event(&TuiEvent::Submit), None);
        assert_eq!(sidebar.handle_event(&TuiEvent::InputChar('s')), None);
    }

    #[test]
    fn test_highlight_clamped_when_entries_shrink() {
        let mut sidebar = Sidebar::new();
        sidebar.set_entries(SidebarEntry::collect(&store(), ""));
        sidebar.handle_event(&TuiEvent::CursorDown);
        sidebar.handle_event(&TuiEvent::CursorDown);
        assert_eq!(sidebar.highlighted(), Some(3));

        sidebar.set_entries(SidebarEntry::collect(&store(), "paris"));
        assert_eq!(sidebar.highlighted(), Some(2));
    }

    #[test]
    fn test_render_shows_labels_and_stars() {
        let mut store = store();
        store.toggle_star(1).unwrap();
        let mut sidebar = Sidebar::new();
        sidebar.set_entries(SidebarEntry::collect(&store, ""));

        let backend = TestBackend::new(40, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                sidebar.render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Chat History (3)"));
        assert!(text.contains("★"));
        assert!(text.contains("You:"));
        assert!(text.contains("Bot:"));
    }
}
