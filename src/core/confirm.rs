//! Single-slot confirmation dialog.
//!
//! Instead of storing a callback, the slot holds a [`PendingAction`] value
//! that the reducer matches on once the user confirms.

use crate::api::UploadedDocument;
use crate::core::chat::DocumentRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    ChatWithDocument(DocumentRef),
    DeleteDocument(DocumentRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
}

impl Confirmation {
    pub fn chat_after_upload(doc: &UploadedDocument) -> Self {
        Self {
            title: "Upload complete".to_string(),
            message: format!(
                "Structured data document \"{}\" ({} rows) was uploaded. Do you want to chat with this data now?",
                doc.filename, doc.row_count
            ),
            action: PendingAction::ChatWithDocument(DocumentRef::new(
                doc.id.clone(),
                doc.filename.clone(),
            )),
        }
    }

    pub fn delete(doc: DocumentRef) -> Self {
        Self {
            title: "Delete document".to_string(),
            message: format!(
                "Are you sure you want to delete \"{}\"? Related chat history will be deleted too. This cannot be undone.",
                doc.filename
            ),
            action: PendingAction::DeleteDocument(doc),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfirmSlot {
    pending: Option<Confirmation>,
}

impl ConfirmSlot {
    /// Opening replaces whatever was pending.
    pub fn open(&mut self, confirmation: Confirmation) {
        if let Some(previous) = self.pending.replace(confirmation) {
            log::debug!("Replacing pending confirmation '{}'", previous.title);
        }
    }

    /// Close and hand back the action to run.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        self.pending.take().map(|c| c.action)
    }

    /// Close without running anything.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn current(&self) -> Option<&Confirmation> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}
