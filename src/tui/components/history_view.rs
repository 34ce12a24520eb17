//! # History View
//!
//! Past question/answer turns across all documents, each in its own block
//! titled with the context label and timestamp. Text is wrapped up front
//! with `textwrap` so block heights are known before layout.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::HistoryEntry;
use crate::core::history::context_label;
use crate::core::state::Loadable;
use crate::tui::component::Component;
use crate::tui::components::helpers::format_server_date;
use crate::tui::event::TuiEvent;

const QUESTION_PREFIX: &str = "Q: ";
const ANSWER_PREFIX: &str = "A: ";

#[derive(Default)]
pub struct HistoryViewState {
    pub scroll_state: ScrollViewState,
}

impl HistoryViewState {
    pub fn handle_scroll(&mut self, event: &TuiEvent) {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::CursorHome => self.scroll_state.scroll_to_top(),
            TuiEvent::CursorEnd => self.scroll_state.scroll_to_bottom(),
            _ => {}
        }
    }
}

/// Wrap `text` to `width` columns, hanging-indented under `prefix`.
fn wrapped_lines(prefix: &'static str, text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let indent = " ".repeat(prefix.len());
    let options = textwrap::Options::new(width.max(prefix.len() + 1))
        .initial_indent(prefix)
        .subsequent_indent(&indent);
    textwrap::wrap(text.trim(), options)
        .into_iter()
        .map(|line| Line::from(Span::styled(line.into_owned(), style)))
        .collect()
}

fn entry_block(entry: &HistoryEntry, width: u16) -> (Paragraph<'static>, u16) {
    let inner = width.saturating_sub(2) as usize;
    let mut lines = wrapped_lines(
        QUESTION_PREFIX,
        &entry.message,
        inner,
        Style::default().fg(Color::Cyan),
    );
    lines.extend(wrapped_lines(
        ANSWER_PREFIX,
        &entry.response,
        inner,
        Style::default().fg(Color::Gray),
    ));

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", context_label(entry)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", format_server_date(entry.timestamp.as_deref())),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let height = lines.len() as u16 + 2;
    let paragraph = Paragraph::new(lines).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title),
    );
    (paragraph, height)
}

pub struct HistoryView<'a> {
    history: &'a Loadable<Vec<HistoryEntry>>,
    state: &'a mut HistoryViewState,
}

impl<'a> HistoryView<'a> {
    pub fn new(history: &'a Loadable<Vec<HistoryEntry>>, state: &'a mut HistoryViewState) -> Self {
        Self { history, state }
    }
}

impl Component for HistoryView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let entries = match self.history {
            Loadable::Loaded(entries) if !entries.is_empty() => entries,
            other => {
                let (text, style) = match other {
                    Loadable::Failed(message) => {
                        (message.as_str(), Style::default().fg(Color::Red))
                    }
                    Loadable::NotLoaded => {
                        ("Loading history...", Style::default().fg(Color::DarkGray))
                    }
                    Loadable::Loaded(_) => {
                        ("No chat history yet.", Style::default().fg(Color::DarkGray))
                    }
                };
                let empty = Paragraph::new(text)
                    .style(style)
                    .alignment(Alignment::Center)
                    .block(
                        Block::bordered()
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(Color::DarkGray))
                            .title(" Chat history "),
                    );
                frame.render_widget(empty, area);
                return;
            }
        };

        let content_width = area.width.saturating_sub(1);
        let blocks: Vec<(Paragraph, u16)> = entries
            .iter()
            .map(|entry| entry_block(entry, content_width))
            .collect();
        let total_height: u16 = blocks.iter().map(|(_, h)| *h).sum();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        let mut y_offset: u16 = 0;
        for (paragraph, height) in blocks {
            scroll_view.render_widget(paragraph, Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn entry(message: &str, response: &str, doc: Option<&str>, turn: Option<u32>) -> HistoryEntry {
        HistoryEntry {
            message: message.to_string(),
            response: response.to_string(),
            timestamp: Some("2024-05-01T14:05:09".to_string()),
            excel_document_id: doc.map(str::to_string),
            chat_turn: turn,
            is_predefined: None,
        }
    }

    fn render(history: &Loadable<Vec<HistoryEntry>>) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = HistoryViewState::default();
        terminal
            .draw(|f| {
                HistoryView::new(history, &mut state).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_entries_show_labels_and_text() {
        let text = render(&Loadable::Loaded(vec![
            entry("total sales?", "42", Some("d1"), Some(1)),
            entry("market trend?", "up", Some("d1"), Some(2)),
        ]));
        assert!(text.contains("Data doc d1 (data search)"));
        assert!(text.contains("Data doc d1 (internet search)"));
        assert!(text.contains("Q: total sales?"));
        assert!(text.contains("A: 42"));
        assert!(text.contains("01 May 2024"));
    }

    #[test]
    fn test_empty_history() {
        assert!(render(&Loadable::Loaded(vec![])).contains("No chat history yet."));
    }

    #[test]
    fn test_wrapped_lines_hang_under_prefix() {
        let lines = wrapped_lines("Q: ", "one two three four", 10, Style::default());
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["Q: one two", "   three", "   four"]);
    }
}
