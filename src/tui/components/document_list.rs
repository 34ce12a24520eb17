//! # Document List Component
//!
//! The Documents panel: one entry per uploaded document with its upload
//! date and row count. Enter (or `c`) chats with the highlighted document,
//! `d` (or Delete) asks to delete it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `DocumentListState` lives in `TuiState` (the chat sidebar reuses it)
//! - `DocumentList` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};

use crate::api::Document;
use crate::core::chat::DocumentRef;
use crate::core::state::Loadable;
use crate::tui::component::Component;
use crate::tui::components::helpers::{format_server_date, truncate_str};
use crate::tui::event::TuiEvent;

/// Cursor over a document slice that survives list refreshes.
#[derive(Default)]
pub struct DocumentListState {
    pub selected: usize,
    pub list_state: ListState,
}

impl DocumentListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cursor in range after the list changed underneath it.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn move_up(&mut self, len: usize) {
        self.selected = self.selected.saturating_sub(1);
        self.clamp(len);
    }

    pub fn move_down(&mut self, len: usize) {
        self.selected = self.selected.saturating_add(1);
        self.clamp(len);
    }

    pub fn current<'d>(&self, docs: &'d [Document]) -> Option<&'d Document> {
        docs.get(self.selected)
    }

    pub fn handle_event(&mut self, event: &TuiEvent, docs: &[Document]) -> Option<DocumentEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.move_up(docs.len());
                None
            }
            TuiEvent::CursorDown => {
                self.move_down(docs.len());
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar('c') => self
                .current(docs)
                .map(|doc| DocumentEvent::Chat(DocumentRef::from(doc))),
            TuiEvent::InputChar('d') | TuiEvent::Delete => self
                .current(docs)
                .map(|doc| DocumentEvent::Delete(DocumentRef::from(doc))),
            _ => None,
        }
    }
}

/// Events emitted by the document list.
#[derive(Debug, PartialEq)]
pub enum DocumentEvent {
    Chat(DocumentRef),
    Delete(DocumentRef),
}

pub fn row_count_label(doc: &Document) -> String {
    match doc.row_count {
        Some(rows) => format!("{rows} rows"),
        None => "N/A rows".to_string(),
    }
}

/// Transient render wrapper for the Documents panel.
pub struct DocumentList<'a> {
    documents: &'a Loadable<Vec<Document>>,
    /// Id of the document the chat is bound to, marked in the list
    active_id: Option<&'a str>,
    state: &'a mut DocumentListState,
}

impl<'a> DocumentList<'a> {
    pub fn new(
        documents: &'a Loadable<Vec<Document>>,
        active_id: Option<&'a str>,
        state: &'a mut DocumentListState,
    ) -> Self {
        Self {
            documents,
            active_id,
            state,
        }
    }
}

impl Component for DocumentList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Structured documents ")
            .title_bottom(Line::from(" Enter Chat  d Delete  Ctrl+R Refresh ").centered())
            .padding(Padding::horizontal(1));

        let docs = match self.documents {
            Loadable::Loaded(docs) if !docs.is_empty() => docs,
            other => {
                let (text, style) = match other {
                    Loadable::Failed(message) => {
                        (message.as_str(), Style::default().fg(Color::Red))
                    }
                    Loadable::NotLoaded => {
                        ("Loading documents...", Style::default().fg(Color::DarkGray))
                    }
                    Loadable::Loaded(_) => (
                        "No structured documents uploaded yet.",
                        Style::default().fg(Color::DarkGray),
                    ),
                };
                let empty = Paragraph::new(text)
                    .style(style)
                    .alignment(Alignment::Center)
                    .block(block);
                frame.render_widget(empty, area);
                return;
            }
        };

        self.state.clamp(docs.len());
        let name_width = area.width.saturating_sub(20) as usize;

        let items: Vec<ListItem> = docs
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let is_selected = i == self.state.selected;
                let name_style = if is_selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                };

                let mut title = vec![Span::styled(truncate_str(&doc.filename, name_width), name_style)];
                if self.active_id == Some(doc.id.as_str()) {
                    title.push(Span::styled("  ● chatting", Style::default().fg(Color::Green)));
                }
                let meta = Line::from(Span::styled(
                    format!(
                        "  Uploaded {} · {}",
                        format_server_date(doc.upload_date.as_deref()),
                        row_count_label(doc)
                    ),
                    Style::default().fg(Color::Gray),
                ));
                ListItem::new(vec![Line::from(title), meta])
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::doc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(documents: &Loadable<Vec<Document>>, active: Option<&str>) -> String {
        let backend = TestBackend::new(70, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = DocumentListState::new();
        terminal
            .draw(|f| {
                DocumentList::new(documents, active, &mut state).render(f, f.area());
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
    fn test_renders_documents_with_meta() {
        let mut second = doc("b");
        second.row_count = None;
        second.upload_date = Some("2024-05-01T14:05:09".to_string());
        let text = render(&Loadable::Loaded(vec![doc("a"), second]), Some("a"));
        assert!(text.contains("a.csv"));
        assert!(text.contains("10 rows"));
        assert!(text.contains("N/A rows"));
        assert!(text.contains("01 May 2024"));
        assert!(text.contains("chatting"));
    }

    #[test]
    fn test_empty_and_failed_states() {
        assert!(render(&Loadable::Loaded(vec![]), None).contains("No structured documents"));
        assert!(
            render(&Loadable::Failed("Failed to load structured documents.".into()), None)
                .contains("Failed to load")
        );
    }

    #[test]
    fn test_events_map_to_highlighted_document() {
        let docs = vec![doc("a"), doc("b")];
        let mut state = DocumentListState::new();
        assert_eq!(state.handle_event(&TuiEvent::CursorDown, &docs), None);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &docs),
            Some(DocumentEvent::Chat(DocumentRef::new("b", "b.csv")))
        );
        state.handle_event(&TuiEvent::CursorDown, &docs);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('d'), &docs),
            Some(DocumentEvent::Delete(DocumentRef::new("b", "b.csv")))
        );
    }

    #[test]
    fn test_no_event_on_empty_list() {
        let mut state = DocumentListState::new();
        assert_eq!(state.handle_event(&TuiEvent::Submit, &[]), None);
        assert_eq!(state.handle_event(&TuiEvent::Delete, &[]), None);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut state = DocumentListState::new();
        state.selected = 4;
        state.clamp(2);
        assert_eq!(state.selected, 1);
        state.clamp(0);
        assert_eq!(state.list_state.selected(), None);
    }
}
