//! # Application State
//!
//! Session-scoped business state. No TUI types live here; presentation
//! state belongs to the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // generation service
//! ├── store: ConversationStore               // messages, stars, cursors
//! ├── model_name: String                     // model sent with each request
//! ├── temperature: f32                       // 0.0..=1.0
//! ├── search: String                         // sidebar filter
//! ├── status_message: String                 // status bar text
//! ├── is_loading: bool                       // a completion is in flight
//! └── show_input: bool                       // send box visible
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::{DEFAULT_TEMPERATURE, ResolvedConfig};
use crate::core::conversation::ConversationStore;
use crate::inference::CompletionProvider;

/// What the main pane shows. Derived from the store's cursors,
/// with editing taking precedence over the focused view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Focused(usize),
    Editing(usize),
}

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub store: ConversationStore,
    pub model_name: String,
    pub temperature: f32,
    pub search: String,
    pub status_message: String,
    pub is_loading: bool,
    pub show_input: bool,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>, model_name: String) -> Self {
        Self {
            provider,
            store: ConversationStore::default(),
            model_name,
            temperature: DEFAULT_TEMPERATURE,
            search: String::new(),
            status_message: String::from("Welcome to Quantum Chat!"),
            is_loading: false,
            show_input: true,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        Self {
            store: ConversationStore::new(config.system_prompt.clone()),
            temperature: config.temperature,
            ..Self::new(provider, config.model_name.clone())
        }
    }

    pub fn view(&self) -> View {
        if let Some(cursor) = self.store.edit_cursor() {
            View::Editing(cursor.index)
        } else if let Some(index) = self.store.selection() {
            View::Focused(index)
        } else {
            View::List
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::Role;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Quantum Chat!");
        assert!(!app.is_loading);
        assert!(app.show_input);
        assert_eq!(app.model_name, "test-model");
        assert_eq!(app.temperature, 0.7);
        assert_eq!(app.view(), View::List);
    }

    #[test]
    fn test_view_precedence() {
        let mut app = test_app();
        app.store.append(Role::User, "a");
        app.store.append(Role::Assistant, "b");

        app.store.select(1).unwrap();
        assert_eq!(app.view(), View::Focused(1));

        app.store.begin_edit(2).unwrap();
        assert_eq!(app.view(), View::Editing(2));

        app.store.cancel_edit();
        assert_eq!(app.view(), View::List);
    }
}
