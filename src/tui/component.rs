use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a `Rect` of the frame.
///
/// Data comes in as props (struct fields); panels additionally borrow
/// their persistent state from `TuiState`.
///
/// `render` takes `&mut self` so components can update scroll offsets or
/// list cursors during the render pass, like ratatui's `StatefulWidget`.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns raw terminal events into component-level events.
pub trait EventHandler {
    type Event;

    /// `None` when the event is not meant for this component.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
