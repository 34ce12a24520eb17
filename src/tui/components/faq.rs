//! # FAQ Panel
//!
//! Static accordion: Up/Down move between questions, Enter or Space
//! expands or collapses the highlighted answer. No network activity.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const FAQ_ENTRIES: [(&str, &str); 5] = [
    (
        "Which files can I upload?",
        "Excel workbooks (.xlsx, .xls) and CSV files up to the configured size limit, 10MB by default. The first sheet is read as a table with a header row.",
    ),
    (
        "How do I start chatting with my data?",
        "Upload a file and accept the offer to chat, or pick a document in the Documents panel or the chat sidebar. Every question is answered against the selected document.",
    ),
    (
        "Why did the assistant switch to an internet search?",
        "The first question about a document is answered from the data itself. Follow-up questions may be answered with a broader internet search; a notice tells you when that happens.",
    ),
    (
        "What happens when I delete a document?",
        "The document and its related chat history are removed from the server. If you were chatting with it, the chat is reset.",
    ),
    (
        "Is my conversation saved?",
        "The server keeps every question and answer; open the History panel to review them. The transcript on the Chat panel only lives until you switch documents.",
    ),
];

#[derive(Default)]
pub struct FaqState {
    pub selected: usize,
    pub expanded: HashSet<usize>,
    pub list_state: ListState,
}

impl FaqState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            ..Default::default()
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }
}

impl EventHandler for FaqState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::CursorUp => self.selected = self.selected.saturating_sub(1),
            TuiEvent::CursorDown => {
                self.selected = (self.selected + 1).min(FAQ_ENTRIES.len() - 1)
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => self.toggle(self.selected),
            _ => return None,
        }
        self.list_state.select(Some(self.selected));
        Some(())
    }
}

pub struct Faq<'a> {
    state: &'a mut FaqState,
}

impl<'a> Faq<'a> {
    pub fn new(state: &'a mut FaqState) -> Self {
        Self { state }
    }
}

impl Component for Faq<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Frequently asked questions ")
            .padding(Padding::horizontal(1));
        let answer_width = block.inner(area).width.saturating_sub(4) as usize;

        let items: Vec<ListItem> = FAQ_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, (question, answer))| {
                let open = self.state.expanded.contains(&i);
                let marker = if open { "▾ " } else { "▸ " };
                let mut style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
                if i == self.state.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let mut lines = vec![Line::from(Span::styled(format!("{marker}{question}"), style))];
                if open {
                    lines.extend(
                        textwrap::wrap(answer, answer_width.max(10))
                            .into_iter()
                            .map(|l| {
                                Line::from(Span::styled(
                                    format!("    {l}"),
                                    Style::default().fg(Color::Gray),
                                ))
                            }),
                    );
                }
                ListItem::new(lines)
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}
