//! # NavBar Component
//!
//! One tab per panel, the active one highlighted. Tabs are laid out by
//! hand so a mouse click can be mapped back to its panel.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::state::Panel;
use crate::tui::component::Component;

const DIVIDER: &str = "│";

pub struct NavBar {
    pub active: Panel,
}

fn tab_label(index: usize, panel: Panel) -> String {
    format!(" F{} {} ", index + 1, panel.title())
}

impl NavBar {
    pub fn new(active: Panel) -> Self {
        Self { active }
    }

    /// Panel whose tab covers column `x`, if any.
    pub fn panel_at(area: Rect, x: u16) -> Option<Panel> {
        let mut left = area.x;
        for (i, panel) in Panel::ALL.iter().enumerate() {
            let width = tab_label(i, *panel).width() as u16;
            if x >= left && x < left + width {
                return Some(*panel);
            }
            left += width + DIVIDER.width() as u16;
        }
        None
    }
}

impl Component for NavBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, panel) in Panel::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(DIVIDER, Style::default().fg(Color::DarkGray)));
            }
            let style = if *panel == self.active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(tab_label(i, *panel), style));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
