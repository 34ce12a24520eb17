//! # Notification Toasts
//!
//! The newest few notifications stacked in the top-right corner, newest
//! on top, colored by level.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::notify::{Level, Notifications};
use crate::tui::component::Component;

const MAX_VISIBLE: usize = 3;
const TOAST_WIDTH: u16 = 48;

fn level_style(level: Level) -> (Style, &'static str) {
    match level {
        Level::Info => (Style::default().fg(Color::Cyan), " Info "),
        Level::Success => (Style::default().fg(Color::Green), " Success "),
        Level::Error => (Style::default().fg(Color::Red), " Error "),
    }
}

pub struct Toasts<'a> {
    notifications: &'a Notifications,
}

impl<'a> Toasts<'a> {
    pub fn new(notifications: &'a Notifications) -> Self {
        Self { notifications }
    }
}

impl Component for Toasts<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(2) as usize;
        let mut y = area.y;

        for notification in self.notifications.iter().rev().take(MAX_VISIBLE) {
            let lines = textwrap::wrap(&notification.message, inner_width.max(1)).len() as u16;
            let height = lines + 2;
            if y + height > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, height);
            let (style, title) = level_style(notification.level);

            frame.render_widget(Clear, rect);
            let toast = Paragraph::new(notification.message.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(style)
                        .title(title),
                );
            frame.render_widget(toast, rect);
            y += height;
        }
    }
}
