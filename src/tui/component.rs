use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that knows how to draw itself.
///
/// Props are plain struct fields set by the parent before each frame.
/// `render` takes `&mut self` so stateful components can keep layout caches
/// (list offsets, scroll positions) between frames.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events and reports what they mean.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent`; `None` means nothing the parent cares about.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
