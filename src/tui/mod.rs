//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! never sees a key code; this module never mutates `App` except through
//! `update()`.
//!
//! ## Keyboard focus
//!
//! Three widgets can own the keys: the send box, the sidebar list and the
//! sidebar search box. Tab cycles between them. While a message is being
//! edited the editor owns every key except the global shortcuts.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or replies.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::Provider;
use crate::core::action::{Action, Effect, TEMPERATURE_STEP, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, View};
use crate::export;
use crate::inference::{CompletionProvider, CompletionRequest, LmStudioProvider, OllamaProvider};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputEvent, Sidebar, SidebarEntry, SidebarEvent, TextInput};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which widget receives keys outside the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
    Search,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub input_box: TextInput,
    pub search_box: TextInput,
    pub editor: TextInput,
    pub sidebar: Sidebar,
    pub transcript_scroll: ScrollViewState,
    /// Message index the editor was seeded for.
    editing: Option<usize>,
    /// Store length at the last sync; growth scrolls the transcript down.
    seen_len: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Input, // User expects to type immediately
            input_box: TextInput::new("Message (Enter to send)"),
            search_box: TextInput::new("Search"),
            editor: TextInput::multiline("Edit Message"),
            sidebar: Sidebar::new(),
            transcript_scroll: ScrollViewState::default(),
            editing: None,
            seen_len: 0,
        }
    }

    /// Copy props from `App` into the components. Runs before every event
    /// and every frame so the widgets never act on stale rows.
    pub fn sync(&mut self, app: &App) {
        self.sidebar
            .set_entries(SidebarEntry::collect(&app.store, &app.search));

        if !app.show_input && self.focus == Focus::Input {
            self.focus = Focus::Sidebar;
        }

        match app.view() {
            View::Editing(index) => {
                if self.editing != Some(index) {
                    let seed = app
                        .store
                        .edit_cursor()
                        .map(|cursor| cursor.buffer.as_str())
                        .unwrap_or_default();
                    self.editor.set_text(seed);
                    self.editing = Some(index);
                }
            }
            _ => self.editing = None,
        }

        let editing = self.editing.is_some();
        self.editor.focused = editing;
        self.input_box.focused = !editing && self.focus == Focus::Input;
        self.search_box.focused = !editing && self.focus == Focus::Search;
        self.sidebar.focused = !editing && self.focus == Focus::Sidebar;

        if app.store.len() != self.seen_len {
            self.seen_len = app.store.len();
            self.transcript_scroll.scroll_to_bottom();
        }
    }

    fn cycle_focus(&mut self, show_input: bool) {
        self.focus = match self.focus {
            Focus::Input => Focus::Sidebar,
            Focus::Sidebar => Focus::Search,
            Focus::Search if show_input => Focus::Input,
            Focus::Search => Focus::Sidebar,
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the completion provider selected by the resolved config.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    match config.provider {
        Provider::Ollama => Arc::new(OllamaProvider::new(config.ollama_base_url.clone())),
        Provider::LmStudio => Arc::new(LmStudioProvider::new(config.lmstudio_base_url.clone())),
    }
}

/// Map one terminal event onto at most one core action. Widget-local state
/// (focus, cursor, highlighted row) is updated in place.
pub fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    // Global shortcuts work in every view
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Clear => return Some(Action::Clear),
        TuiEvent::NewChat => return Some(Action::NewChat),
        TuiEvent::Export => return Some(Action::Export),
        TuiEvent::TemperatureUp => return Some(Action::AdjustTemperature(TEMPERATURE_STEP)),
        TuiEvent::TemperatureDown => return Some(Action::AdjustTemperature(-TEMPERATURE_STEP)),
        TuiEvent::ScrollUp => {
            tui.transcript_scroll.scroll_up();
            return None;
        }
        TuiEvent::ScrollDown => {
            tui.transcript_scroll.scroll_down();
            return None;
        }
        TuiEvent::ScrollPageUp => {
            tui.transcript_scroll.scroll_page_up();
            return None;
        }
        TuiEvent::ScrollPageDown => {
            tui.transcript_scroll.scroll_page_down();
            return None;
        }
        TuiEvent::Resize => return None,
        _ => {}
    }

    if let View::Editing(_) = app.view() {
        return match event {
            TuiEvent::Save => Some(Action::SaveEdit),
            TuiEvent::Escape => Some(Action::CancelEdit),
            _ => match tui.editor.handle_event(event) {
                Some(InputEvent::ContentChanged) => {
                    Some(Action::EditBufferChanged(tui.editor.buffer.clone()))
                }
                _ => None,
            },
        };
    }

    match event {
        TuiEvent::Tab => {
            tui.cycle_focus(app.show_input);
            return None;
        }
        TuiEvent::Escape => {
            if let View::Focused(_) = app.view() {
                return Some(Action::Back);
            }
            tui.focus = if tui.focus == Focus::Input || !app.show_input {
                Focus::Sidebar
            } else {
                Focus::Input
            };
            return None;
        }
        _ => {}
    }

    match tui.focus {
        Focus::Input => {
            // Keep the draft until the pending reply lands
            if app.is_loading && *event == TuiEvent::Submit {
                return None;
            }
            match tui.input_box.handle_event(event) {
                Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                _ => None,
            }
        }
        Focus::Search => {
            if *event == TuiEvent::Submit {
                tui.focus = Focus::Sidebar;
                return None;
            }
            match tui.search_box.handle_event(event) {
                Some(InputEvent::ContentChanged) => {
                    Some(Action::SetSearch(tui.search_box.buffer.clone()))
                }
                _ => None,
            }
        }
        Focus::Sidebar => match tui.sidebar.handle_event(event)? {
            SidebarEvent::Open(index) => Some(Action::Select(index)),
            SidebarEvent::ToggleStar(index) => Some(Action::ToggleStar(index)),
            SidebarEvent::Edit(index) => Some(Action::BeginEdit(index)),
            SidebarEvent::ShowInput => {
                tui.focus = Focus::Input;
                Some(Action::ShowInput)
            }
        },
    }
}

/// Apply an action and carry out its effect. Returns true when the app
/// should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>, export_dir: &Path) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::SpawnRequest => {
            spawn_request(app, tx.clone());
            false
        }
        Effect::Export => {
            let result = match export::write_transcript(app.store.messages(), export_dir) {
                Ok(path) => Ok(path),
                Err(e) => {
                    warn!("Export to {} failed: {}", export_dir.display(), e);
                    Err(e.to_string())
                }
            };
            dispatch(app, Action::ExportFinished(result), tx, export_dir)
        }
        Effect::None => false,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    info!(
        "Starting with provider {} (model {})",
        provider.name(),
        config.model_name
    );
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync(&app);
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            tui.sync(&app);
            if let Some(action) = route_event(&app, &mut tui, &event) {
                debug!("{:?} -> {:?}", event, action);
                if dispatch(&mut app, action, &tx, &config.export_dir) {
                    should_quit = true;
                    break;
                }
            }
        }

        // Replies from background requests
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit = dispatch(&mut app, action, &tx, &config.export_dir);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

fn spawn_request(app: &App, tx: mpsc::Sender<Action>) {
    info!("Spawning completion request");

    // Clone what we need for the async task
    let provider = app.provider.clone();
    let history = app.store.messages().to_vec();
    let model = app.model_name.clone();
    let temperature = app.temperature;

    tokio::spawn(async move {
        let request = CompletionRequest {
            messages: &history,
            model: &model,
            temperature,
        };
        let action = match provider.complete(request).await {
            Ok(text) => Action::ResponseReady(text),
            Err(e) => {
                info!("Completion failed: {}", e);
                Action::ResponseFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver completion result: receiver dropped");
        }
    });
}
