//! # TitleBar Component
//!
//! Top status line: server address, health probe result and the busy
//! spinner shown while refreshes, deletions, uploads or chat replies are
//! in flight.
//!
//! Stateless: every field is a prop copied out of `App` each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::ServerHealth;
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub base_url: String,
    pub health: ServerHealth,
    /// Label of the in-flight operation, if any (e.g. "Loading...")
    pub busy: Option<&'static str>,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(base_url: String, health: ServerHealth, busy: Option<&'static str>) -> Self {
        Self {
            base_url,
            health,
            busy,
            spinner_frame: 0,
        }
    }

    fn health_style(&self) -> Style {
        match self.health {
            ServerHealth::Healthy => Style::default().fg(Color::Green),
            ServerHealth::Degraded(_) => Style::default().fg(Color::Yellow),
            ServerHealth::Unreachable => Style::default().fg(Color::Red),
            ServerHealth::Unknown => Style::default().fg(Color::DarkGray),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " Tabula ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.base_url.clone()),
            Span::raw(" "),
            Span::styled(format!("({})", self.health.label()), self.health_style()),
        ];

        if let Some(label) = self.busy {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                format!("{spinner} {label}"),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
