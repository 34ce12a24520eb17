//! # Chat Session
//!
//! ```text
//!                     select(doc)                    submit(text)
//!  NoDocumentSelected ───────────► DocumentSelected ─────────────► AwaitingResponse
//!          ▲                          ▲      │ select(other)              │
//!          │ reset()                  │      └───── clears transcript     │
//!          │                          └──────── receive(reply | error) ◄──┘
//! ```
//!
//! The transcript is append-only. Every change of target bumps `epoch`, and
//! replies carry the epoch they were sent under, so a late reply for a
//! session that no longer exists is dropped instead of appended.

use chrono::{DateTime, Local};
use log::debug;

use crate::api::{ApiError, ChatReply, ChatRequest};

pub const INTERNAL_ERROR_REPLY: &str =
    "Sorry, an internal error occurred while processing your question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn now(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp: Local::now(),
        }
    }
}

/// Identity of a document as far as chat is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub filename: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
        }
    }
}

impl From<&crate::api::Document> for DocumentRef {
    fn from(doc: &crate::api::Document) -> Self {
        Self::new(doc.id.clone(), doc.filename.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    NoDocumentSelected,
    DocumentSelected(DocumentRef),
    AwaitingResponse(DocumentRef),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    /// Already the active document; nothing changed.
    Unchanged,
    /// A new session was started for this document.
    Switched,
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    NoDocument,
    EmptyMessage,
    /// A request is already in flight.
    Busy,
    Sent { epoch: u64, request: ChatRequest },
}

#[derive(Debug, PartialEq)]
pub enum ReplyOutcome {
    /// The session moved on; reply discarded.
    Stale,
    Answered { broader_search_notice: bool },
    Failed { cause: String },
}

#[derive(Debug, Default)]
pub struct ChatSession {
    state: ChatState,
    transcript: Vec<ChatMessage>,
    epoch: u64,
    broader_search_noticed: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn selected(&self) -> Option<&DocumentRef> {
        match &self.state {
            ChatState::NoDocumentSelected => None,
            ChatState::DocumentSelected(doc) | ChatState::AwaitingResponse(doc) => Some(doc),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected().is_some_and(|doc| doc.id == id)
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, ChatState::AwaitingResponse(_))
    }

    /// Input accepts text only with a target and nothing in flight.
    pub fn input_enabled(&self) -> bool {
        matches!(self.state, ChatState::DocumentSelected(_))
    }

    pub fn select(&mut self, doc: DocumentRef) -> Selection {
        if self.is_selected(&doc.id) {
            debug!("Document {} already active", doc.id);
            return Selection::Unchanged;
        }
        self.start_session(ChatState::DocumentSelected(doc));
        Selection::Switched
    }

    pub fn reset(&mut self) {
        self.start_session(ChatState::NoDocumentSelected);
    }

    fn start_session(&mut self, state: ChatState) {
        self.state = state;
        self.transcript.clear();
        self.epoch += 1;
        self.broader_search_noticed = false;
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let doc = match &self.state {
            ChatState::NoDocumentSelected => return SubmitOutcome::NoDocument,
            ChatState::AwaitingResponse(_) => return SubmitOutcome::Busy,
            ChatState::DocumentSelected(doc) => doc.clone(),
        };
        let message = text.trim();
        if message.is_empty() {
            return SubmitOutcome::EmptyMessage;
        }

        self.transcript.push(ChatMessage::now(message, Sender::User));
        let request = ChatRequest {
            message: message.to_string(),
            structured_document_id: doc.id.clone(),
        };
        self.state = ChatState::AwaitingResponse(doc);
        SubmitOutcome::Sent {
            epoch: self.epoch,
            request,
        }
    }

    pub fn receive(&mut self, epoch: u64, result: Result<ChatReply, ApiError>) -> ReplyOutcome {
        if epoch != self.epoch {
            debug!("Dropping reply for epoch {} (current {})", epoch, self.epoch);
            return ReplyOutcome::Stale;
        }
        let ChatState::AwaitingResponse(doc) = &self.state else {
            debug!("Dropping reply while not awaiting one");
            return ReplyOutcome::Stale;
        };
        self.state = ChatState::DocumentSelected(doc.clone());

        match result {
            Ok(reply) => {
                let notice = reply.wants_broader_search() && !self.broader_search_noticed;
                if notice {
                    self.broader_search_noticed = true;
                }
                self.transcript
                    .push(ChatMessage::now(reply.response, Sender::Assistant));
                ReplyOutcome::Answered {
                    broader_search_notice: notice,
                }
            }
            Err(e) => {
                self.transcript
                    .push(ChatMessage::now(INTERNAL_ERROR_REPLY, Sender::Assistant));
                ReplyOutcome::Failed { cause: e.message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NextAction;

    fn reply(text: &str, next: Option<NextAction>) -> ChatReply {
        ChatReply {
            response: text.to_string(),
            next_action: next,
            source_document_name: None,
        }
    }

    fn sent_epoch(outcome: SubmitOutcome) -> u64 {
        match outcome {
            SubmitOutcome::Sent { epoch, .. } => epoch,
            other => panic!("expected Sent, got {:?}", other),
        }
    }

    #[test]
    fn test_starts_without_selection() {
        let chat = ChatSession::new();
        assert_eq!(chat.state(), &ChatState::NoDocumentSelected);
        assert!(!chat.input_enabled());
    }

    #[test]
    fn test_selecting_same_document_is_idempotent() {
        let mut chat = ChatSession::new();
        assert_eq!(chat.select(DocumentRef::new("a", "a.csv")), Selection::Switched);
        let epoch = sent_epoch(chat.submit("hi"));
        chat.receive(epoch, Ok(reply("hello", None)));
        assert_eq!(chat.transcript().len(), 2);

        assert_eq!(chat.select(DocumentRef::new("a", "a.csv")), Selection::Unchanged);
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.epoch(), epoch);
    }

    #[test]
    fn test_selecting_other_document_clears_transcript() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let epoch = sent_epoch(chat.submit("hi"));
        chat.receive(epoch, Ok(reply("hello", None)));

        assert_eq!(chat.select(DocumentRef::new("b", "b.csv")), Selection::Switched);
        assert!(chat.transcript().is_empty());
        assert_eq!(
            chat.state(),
            &ChatState::DocumentSelected(DocumentRef::new("b", "b.csv"))
        );
    }

    #[test]
    fn test_submit_without_document() {
        let mut chat = ChatSession::new();
        assert_eq!(chat.submit("hello"), SubmitOutcome::NoDocument);
        assert!(chat.transcript().is_empty());
    }

    #[test]
    fn test_submit_whitespace_only() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        assert_eq!(chat.submit("   \n\t"), SubmitOutcome::EmptyMessage);
        assert!(chat.transcript().is_empty());
        assert!(chat.input_enabled());
    }

    #[test]
    fn test_submit_echoes_user_message_and_awaits() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        match chat.submit("  total rows?  ") {
            SubmitOutcome::Sent { request, .. } => {
                assert_eq!(request.message, "total rows?");
                assert_eq!(request.structured_document_id, "a");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(chat.is_awaiting());
        assert!(!chat.input_enabled());
        assert_eq!(chat.transcript()[0].sender, Sender::User);
        assert_eq!(chat.submit("again"), SubmitOutcome::Busy);
        assert_eq!(chat.transcript().len(), 1);
    }

    #[test]
    fn test_failed_reply_appends_single_synthetic_entry() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let epoch = sent_epoch(chat.submit("q"));
        let outcome = chat.receive(epoch, Err(ApiError::new("boom")));
        assert_eq!(
            outcome,
            ReplyOutcome::Failed {
                cause: "boom".to_string()
            }
        );
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.transcript()[1].content, INTERNAL_ERROR_REPLY);
        assert_eq!(chat.transcript()[1].sender, Sender::Assistant);
        assert!(chat.input_enabled());
    }

    #[test]
    fn test_broader_search_notice_shown_once_per_session() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let epoch = sent_epoch(chat.submit("q1"));
        assert_eq!(
            chat.receive(epoch, Ok(reply("r1", Some(NextAction::SearchInternet)))),
            ReplyOutcome::Answered {
                broader_search_notice: true
            }
        );
        let epoch = sent_epoch(chat.submit("q2"));
        assert_eq!(
            chat.receive(epoch, Ok(reply("r2", Some(NextAction::SearchInternet)))),
            ReplyOutcome::Answered {
                broader_search_notice: false
            }
        );
    }

    #[test]
    fn test_reply_after_switch_is_dropped() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        let epoch = sent_epoch(chat.submit("q"));
        chat.select(DocumentRef::new("b", "b.csv"));
        // Back to A: a fresh session, the old reply still must not land here.
        chat.select(DocumentRef::new("a", "a.csv"));

        assert_eq!(chat.receive(epoch, Ok(reply("late", None))), ReplyOutcome::Stale);
        assert!(chat.transcript().is_empty());
        assert!(chat.input_enabled());
    }

    #[test]
    fn test_reset_returns_to_unselected() {
        let mut chat = ChatSession::new();
        chat.select(DocumentRef::new("a", "a.csv"));
        chat.submit("q");
        chat.reset();
        assert_eq!(chat.state(), &ChatState::NoDocumentSelected);
        assert!(chat.transcript().is_empty());
    }
}
