//! # TUI Components
//!
//! ### Stateless (props only)
//! - `TitleBar`: model, temperature and status line
//! - `Transcript` / `FocusedMessage`: the main pane in list and focused view
//!
//! ### Stateful (event-driven)
//! - `TextInput`: send box, search box and message editor
//! - `Sidebar`: filtered chat history with a highlighted row
//!
//! Stateful components translate `TuiEvent`s into their own small event
//! enums; `tui::route_event` maps those onto core `Action`s. Components never
//! touch `App` directly.

pub mod message_view;
pub mod sidebar;
pub mod text_input;
pub mod title_bar;

pub use message_view::{FocusedMessage, Transcript};
pub use sidebar::{Sidebar, SidebarEntry, SidebarEvent};
pub use text_input::{InputEvent, TextInput};
pub use title_bar::TitleBar;
