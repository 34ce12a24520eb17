//! # Chat View
//!
//! Document sidebar on the left; on the right the transcript for the
//! selected document and the question input. The transcript is a
//! `ScrollView` of bordered message blocks whose heights come from
//! `Paragraph::line_count`, and follows the newest message until the
//! user scrolls up.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::Document;
use crate::core::chat::{ChatMessage, ChatSession, Sender};
use crate::core::state::Loadable;
use crate::tui::component::Component;
use crate::tui::components::document_list::DocumentListState;
use crate::tui::components::helpers::{format_time, truncate_str};
use crate::tui::components::input_box::{INPUT_HEIGHT, InputBox};
use crate::tui::event::TuiEvent;

const SIDEBAR_WIDTH: u16 = 28;

/// Scroll position of the transcript.
pub struct ChatViewState {
    pub scroll_state: ScrollViewState,
    /// Jump to the newest message whenever one arrives
    pub follow: bool,
    rendered_len: usize,
}

impl Default for ChatViewState {
    fn default() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            follow: true,
            rendered_len: 0,
        }
    }
}

impl ChatViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_scroll(&mut self, event: &TuiEvent) {
        match event {
            TuiEvent::ScrollUp => {
                self.follow = false;
                self.scroll_state.scroll_up();
            }
            TuiEvent::ScrollPageUp => {
                self.follow = false;
                self.scroll_state.scroll_page_up();
            }
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => {}
        }
    }

    /// Back to following the newest message.
    pub fn reset(&mut self) {
        self.follow = true;
        self.rendered_len = 0;
        self.scroll_state.scroll_to_top();
    }
}

struct RenderedMessage<'a> {
    paragraph: Paragraph<'a>,
    height: u16,
}

impl<'a> RenderedMessage<'a> {
    fn new(title: String, content: &'a str, style: Style, width: u16) -> Self {
        let border_style = style.add_modifier(Modifier::DIM);
        let paragraph = Paragraph::new(content.trim())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title)
                    .border_style(border_style)
                    .title_style(border_style),
            )
            .style(style)
            .wrap(Wrap { trim: true });
        let height = paragraph.line_count(width) as u16;
        Self { paragraph, height }
    }

    fn from_message(message: &'a ChatMessage, width: u16) -> Self {
        let (who, style) = sender_label(message.sender);
        let title = format!(" {who} · {} ", format_time(&message.timestamp));
        Self::new(title, &message.content, style, width)
    }
}

fn sender_label(sender: Sender) -> (&'static str, Style) {
    match sender {
        Sender::User => ("you", Style::default().fg(Color::Cyan)),
        Sender::Assistant => ("assistant", Style::default().fg(Color::Green)),
    }
}

/// Transient render wrapper for the Chat panel.
pub struct ChatView<'a> {
    chat: &'a ChatSession,
    documents: &'a Loadable<Vec<Document>>,
    sidebar: &'a mut DocumentListState,
    input: &'a mut InputBox,
    state: &'a mut ChatViewState,
}

impl<'a> ChatView<'a> {
    pub fn new(
        chat: &'a ChatSession,
        documents: &'a Loadable<Vec<Document>>,
        sidebar: &'a mut DocumentListState,
        input: &'a mut InputBox,
        state: &'a mut ChatViewState,
    ) -> Self {
        Self {
            chat,
            documents,
            sidebar,
            input,
            state,
        }
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Documents ")
            .title_bottom(Line::from(" Ctrl+O open ").centered());

        let docs: &[Document] = match self.documents {
            Loadable::Loaded(docs) => docs,
            Loadable::NotLoaded => {
                frame.render_widget(
                    Paragraph::new("Loading...")
                        .style(Style::default().fg(Color::DarkGray))
                        .block(block),
                    area,
                );
                return;
            }
            Loadable::Failed(_) => {
                frame.render_widget(
                    Paragraph::new("Failed to load documents.")
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true })
                        .block(block),
                    area,
                );
                return;
            }
        };
        if docs.is_empty() {
            frame.render_widget(
                Paragraph::new("No documents yet. Upload one first.")
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true })
                    .block(block),
                area,
            );
            return;
        }

        self.sidebar.clamp(docs.len());
        let width = area.width.saturating_sub(5) as usize;
        let items: Vec<ListItem> = docs
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let active = self.chat.is_selected(&doc.id);
                let marker = if active { "● " } else { "  " };
                let mut style = if active {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if i == self.sidebar.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                ListItem::new(Line::from(Span::styled(
                    format!("{marker}{}", truncate_str(&doc.filename, width)),
                    style,
                )))
            })
            .collect();
        frame.render_stateful_widget(
            List::new(items).block(block),
            area,
            &mut self.sidebar.list_state,
        );
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1);
        let mut messages: Vec<RenderedMessage> = self
            .chat
            .transcript()
            .iter()
            .map(|m| RenderedMessage::from_message(m, content_width))
            .collect();
        if self.chat.is_awaiting() {
            messages.push(RenderedMessage::new(
                " assistant ".to_string(),
                "Thinking...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                content_width,
            ));
        }

        if messages.is_empty() {
            let hint = if self.chat.selected().is_some() {
                "Ask a question about this data."
            } else {
                "Select a document from the list to start chatting."
            };
            frame.render_widget(
                Paragraph::new(hint)
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                area,
            );
            return;
        }

        let total_height: u16 = messages.iter().map(|m| m.height).sum();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for message in &messages {
            let rect = Rect::new(0, y_offset, content_width, message.height);
            scroll_view.render_widget(message.paragraph.clone(), rect);
            y_offset += message.height;
        }

        if messages.len() != self.state.rendered_len {
            self.state.rendered_len = messages.len();
            if self.state.follow {
                self.state.scroll_state.scroll_to_bottom();
            }
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // Scrolling back to the bottom resumes following
        let max_offset = total_height.saturating_sub(area.height);
        if self.state.scroll_state.offset().y >= max_offset {
            self.state.follow = true;
        }
    }
}

impl Component for ChatView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(area);
        let [header_area, transcript_area, input_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .areas(main_area);

        self.render_sidebar(frame, sidebar_area);

        let header = match self.chat.selected() {
            Some(doc) => Line::from(vec![
                Span::styled(" Chatting with ", Style::default().fg(Color::Gray)),
                Span::styled(
                    doc.filename.clone(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  Ctrl+N new chat", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                " No document selected",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(header, header_area);

        self.render_transcript(frame, transcript_area);

        self.input.disabled = self.chat.is_awaiting();
        self.input.title = if self.chat.is_awaiting() {
            " Waiting for the answer... ".to_string()
        } else {
            " Question ".to_string()
        };
        self.input.placeholder = if self.chat.selected().is_some() {
            "Type your question and press Enter".to_string()
        } else {
            "Select a document first".to_string()
        };
        self.input.render(frame, input_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChatReply};
    use crate::core::chat::{DocumentRef, SubmitOutcome};
    use crate::test_support::doc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(chat: &ChatSession, documents: &Loadable<Vec<Document>>) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut sidebar = DocumentListState::new();
        let mut input = InputBox::new(" Question ");
        let mut state = ChatViewState::new();
        terminal
            .draw(|f| {
                ChatView::new(chat, documents, &mut sidebar, &mut input, &mut state)
                    .render(f, f.area());
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
    fn test_unselected_chat_shows_hint() {
        let text = render(&ChatSession::new(), &Loadable::Loaded(vec![doc("a")]));
        assert!(text.contains("No document selected"));
        assert!(text.contains("Select a document from the list"));
        assert!(text.contains("a.csv"));
    }

    #[test]
    fn test_transcript_and_pending_reply() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let SubmitOutcome::Sent { epoch, .. } = chat.submit("how many rows?") else {
            panic!("expected send");
        };
        let text = render(&chat, &Loadable::Loaded(vec![doc("a")]));
        assert!(text.contains("how many rows?"));
        assert!(text.contains("Thinking..."));
        assert!(text.contains("Waiting for the answer"));

        chat.receive(
            epoch,
            Ok(ChatReply {
                response: "There are 120 rows.".into(),
                next_action: None,
                source_document_name: None,
            }),
        );
        let text = render(&chat, &Loadable::Loaded(vec![doc("a")]));
        assert!(text.contains("There are 120 rows."));
        assert!(text.contains("Chatting with a.csv"));
        assert!(!text.contains("Thinking..."));
    }

    #[test]
    fn test_failed_reply_renders_synthetic_message() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let SubmitOutcome::Sent { epoch, .. } = chat.submit("q") else {
            panic!("expected send");
        };
        chat.receive(epoch, Err(ApiError::new("boom")));
        let text = render(&chat, &Loadable::Loaded(vec![doc("a")]));
        assert!(text.contains("internal error occurred"));
    }

    #[test]
    fn test_scroll_up_stops_following() {
        let mut state = ChatViewState::new();
        state.handle_scroll(&TuiEvent::ScrollUp);
        assert!(!state.follow);
        state.reset();
        assert!(state.follow);
    }
}
