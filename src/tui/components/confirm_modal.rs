//! # Confirm Modal
//!
//! Centered yes/no dialog over whatever panel is active. Enter or `y`
//! confirms, Esc or `n` cancels, and so does a click outside the box.
//! Sized from the wrapped message so it never clips.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::core::confirm::Confirmation;
use crate::tui::component::Component;
use crate::tui::components::helpers::centered_fixed;
use crate::tui::event::TuiEvent;

const WIDTH_PERCENT: u16 = 60;
/// Borders (2) + vertical padding (2) + blank line + button row
const CHROME_HEIGHT: u16 = 6;

#[derive(Debug, PartialEq, Eq)]
pub enum ModalEvent {
    Confirm,
    Cancel,
}

/// Map an event to a modal decision. Every other event is swallowed.
pub fn modal_event(event: &TuiEvent, modal_area: Rect) -> Option<ModalEvent> {
    match event {
        TuiEvent::Submit | TuiEvent::InputChar('y') | TuiEvent::InputChar('Y') => {
            Some(ModalEvent::Confirm)
        }
        TuiEvent::Escape | TuiEvent::InputChar('n') | TuiEvent::InputChar('N') => {
            Some(ModalEvent::Cancel)
        }
        TuiEvent::MouseClick(x, y) if !modal_area.contains((*x, *y).into()) => {
            Some(ModalEvent::Cancel)
        }
        _ => None,
    }
}

fn message_lines(message: &str, width: u16) -> Vec<String> {
    let inner = width.saturating_sub(4).max(10) as usize;
    textwrap::wrap(message, inner)
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

/// Screen rect the modal occupies inside `outer`.
pub fn modal_rect(confirmation: &Confirmation, outer: Rect) -> Rect {
    let width = centered_fixed(WIDTH_PERCENT, 1, outer).width;
    let lines = message_lines(&confirmation.message, width).len() as u16;
    centered_fixed(WIDTH_PERCENT, lines + CHROME_HEIGHT, outer)
}

pub struct ConfirmModal<'a> {
    pub confirmation: &'a Confirmation,
}

impl<'a> ConfirmModal<'a> {
    pub fn new(confirmation: &'a Confirmation) -> Self {
        Self { confirmation }
    }
}

impl Component for ConfirmModal<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = modal_rect(self.confirmation, area);
        frame.render_widget(Clear, rect);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                format!(" {} ", self.confirmation.title),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::new(1, 1, 1, 1));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [message_area, button_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        let lines: Vec<Line> = message_lines(&self.confirmation.message, rect.width)
            .into_iter()
            .map(Line::from)
            .collect();
        frame.render_widget(Paragraph::new(lines), message_area);

        let buttons = Line::from(vec![
            Span::styled(
                " Yes (Enter/y) ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(" No (Esc/n) ", Style::default().fg(Color::Black).bg(Color::Gray)),
        ])
        .centered();
        frame.render_widget(buttons, button_area);
    }
}
