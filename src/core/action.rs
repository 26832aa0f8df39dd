//! # Actions
//!
//! Everything that can happen in Quantum Chat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The model replies? That's `Action::ResponseReady(text)`.
//!
//! `update()` applies an action to the `App` and returns an `Effect` naming
//! the I/O the adapter must perform next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## View transitions
//!
//! ```text
//!            Select(i)               BeginEdit(i)
//!   LIST ───────────────▶ FOCUSED ───────────────▶ EDITING
//!    ▲  ◀─────────────────   │                       │
//!    │        Back           │                       │ SaveEdit / CancelEdit
//!    │                       └── BeginEdit(i) ───────┤
//!    └───────────────────────────────────────────────┘
//!   Clear / NewChat reset from anywhere. Submit keeps the current view.
//! ```
//!
//! While a request is in flight, anything that mutates the conversation is
//! dropped: there is no queue.

use std::path::PathBuf;

use log::{debug, info};

use crate::core::state::App;
use crate::inference::Role;

/// Temperature change applied by one nudge from the keyboard.
pub const TEMPERATURE_STEP: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send a user message.
    Submit(String),
    /// The completion request produced a reply.
    ResponseReady(String),
    /// The completion request failed; carries the reason.
    ResponseFailed(String),
    /// Pin a message in the focused view.
    Select(usize),
    /// Leave the focused view.
    Back,
    /// Open a message in the editor.
    BeginEdit(usize),
    /// Scratch buffer contents changed.
    EditBufferChanged(String),
    SaveEdit,
    CancelEdit,
    ToggleStar(usize),
    SetSearch(String),
    SetTemperature(f32),
    AdjustTemperature(f32),
    /// Re-open and focus the send box.
    ShowInput,
    Clear,
    NewChat,
    Export,
    ExportFinished(Result<PathBuf, String>),
    Quit,
}

impl Action {
    /// Actions rejected while a completion is pending.
    fn mutates_conversation(&self) -> bool {
        matches!(
            self,
            Action::Submit(_)
                | Action::BeginEdit(_)
                | Action::SaveEdit
                | Action::ToggleStar(_)
                | Action::Clear
                | Action::NewChat
        )
    }
}

/// Side effect requested by `update()`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send the current history to the provider.
    SpawnRequest,
    /// Render the transcript and hand it to the user.
    Export,
    Quit,
}

fn clamp_temperature(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    // Round to two decimals so repeated nudges don't drift
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

pub fn update(app: &mut App, action: Action) -> Effect {
    if app.is_loading && action.mutates_conversation() {
        debug!("Ignoring {:?}: request in flight", action);
        return Effect::None;
    }

    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() {
                return Effect::None;
            }
            let index = app.store.append(Role::User, text);
            info!("User message appended at index {}", index);
            app.is_loading = true;
            app.status_message = String::from("Thinking...");
            Effect::SpawnRequest
        }
        Action::ResponseReady(text) => {
            let index = app.store.append(Role::Assistant, text);
            info!("Assistant reply appended at index {}", index);
            app.is_loading = false;
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::ResponseFailed(reason) => {
            let text = format!("Error: {reason}");
            app.store.append(Role::Assistant, text);
            app.is_loading = false;
            app.status_message = String::from("Request failed");
            Effect::None
        }
        Action::Select(index) => {
            if let Err(e) = app.store.select(index) {
                debug!("Select ignored: {}", e);
            }
            Effect::None
        }
        Action::Back => {
            app.store.deselect();
            Effect::None
        }
        Action::BeginEdit(index) => {
            if let Err(e) = app.store.begin_edit(index) {
                debug!("Edit ignored: {}", e);
            }
            Effect::None
        }
        Action::EditBufferChanged(text) => {
            app.store.set_edit_buffer(text);
            Effect::None
        }
        Action::SaveEdit => {
            match app.store.commit_edit() {
                Ok(Some(index)) => app.status_message = format!("Message {index} updated"),
                Ok(None) => {}
                Err(e) => debug!("Save ignored: {}", e),
            }
            Effect::None
        }
        Action::CancelEdit => {
            app.store.cancel_edit();
            Effect::None
        }
        Action::ToggleStar(index) => {
            if let Err(e) = app.store.toggle_star(index) {
                debug!("Star ignored: {}", e);
            }
            Effect::None
        }
        Action::SetSearch(term) => {
            app.search = term;
            Effect::None
        }
        Action::SetTemperature(value) => {
            app.temperature = clamp_temperature(value);
            app.status_message = format!("Temperature: {:.2}", app.temperature);
            Effect::None
        }
        Action::AdjustTemperature(delta) => {
            app.temperature = clamp_temperature(app.temperature + delta);
            app.status_message = format!("Temperature: {:.2}", app.temperature);
            Effect::None
        }
        Action::ShowInput => {
            app.show_input = true;
            Effect::None
        }
        Action::Clear => {
            app.store.reset();
            app.status_message = String::from("Chat cleared");
            Effect::None
        }
        Action::NewChat => {
            app.store.reset();
            app.status_message = String::from("New chat started");
            Effect::None
        }
        Action::Export => Effect::Export,
        Action::ExportFinished(result) => {
            app.status_message = match result {
                Ok(path) => format!("Exported chat to {}", path.display()),
                Err(e) => format!("Export failed: {e}"),
            };
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
