//! # Actions
//!
//! Everything that can happen in Tabula becomes an `Action`.
//! User picks a document? That's `Action::SelectDocument(doc)`.
//! The server answers? That's `Action::ChatReplied { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state and
//! returns the side effects the caller must perform. No I/O here; the
//! effects are executed by [`crate::effects`] and their results come back
//! as further actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```

use log::{debug, info};
use std::time::Duration;

use crate::api::{
    ApiError, ChatReply, ChatRequest, DeleteResponse, Document, HealthReport, HistoryEntry,
    UploadedDocument,
};
use crate::core::chat::{DocumentRef, ReplyOutcome, Selection, SubmitOutcome};
use crate::core::confirm::{Confirmation, PendingAction};
use crate::core::notify::Level;
use crate::core::state::{App, Loadable, Panel, ServerHealth};
use crate::core::upload::{CandidateFile, PendingFile};

/// Selection notices are short-lived.
const SELECTION_NOTICE: Duration = Duration::from_secs(3);

/// Which container a document fetch feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentsPurpose {
    Listing,
    ChatSidebar,
}

#[derive(Debug, PartialEq)]
pub enum Action {
    /// First action after launch: health probe and start panel.
    Start,
    Quit,

    Navigate(Panel),

    ChooseFile(CandidateFile),
    FileUnreadable { path: String, reason: String },
    ClearPendingFile,
    SubmitUpload,
    UploadFinished(Result<UploadedDocument, ApiError>),

    DocumentsLoaded {
        purpose: DocumentsPurpose,
        result: Result<Vec<Document>, ApiError>,
    },
    RequestDelete(DocumentRef),
    DocumentDeleted {
        document: DocumentRef,
        result: Result<DeleteResponse, ApiError>,
    },

    SelectDocument(DocumentRef),
    SubmitMessage(String),
    ChatReplied {
        epoch: u64,
        result: Result<ChatReply, ApiError>,
    },
    ResetChat,

    HistoryLoaded(Result<Vec<HistoryEntry>, ApiError>),

    Confirm,
    Cancel,

    HealthChecked(Result<HealthReport, ApiError>),
    Notify(Level, String),
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    CheckHealth,
    FetchDocuments(DocumentsPurpose),
    FetchHistory,
    Upload(PendingFile),
    DeleteDocument(DocumentRef),
    SendChat { epoch: u64, request: ChatRequest },
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Start => {
            info!("Starting session on {:?} panel", app.start_panel);
            let mut effects = vec![Effect::CheckHealth];
            effects.extend(navigate(app, app.start_panel));
            effects
        }
        Action::Quit => vec![Effect::Quit],

        Action::Navigate(panel) => navigate(app, panel),

        Action::ChooseFile(candidate) => {
            let path = candidate.path.display().to_string();
            match app.upload.choose(candidate) {
                Ok(file) => debug!("Pending upload: {} ({} bytes)", file.name, file.size),
                Err(rejection) => {
                    info!("Rejected upload candidate {}: {}", path, rejection);
                    app.notifications.error(rejection.to_string());
                }
            }
            Vec::new()
        }
        Action::FileUnreadable { path, reason } => {
            app.upload.clear();
            app.notifications
                .error(format!("Cannot read \"{path}\": {reason}"));
            Vec::new()
        }
        Action::ClearPendingFile => {
            app.upload.clear();
            Vec::new()
        }
        Action::SubmitUpload => submit_upload(app),
        Action::UploadFinished(result) => {
            app.upload.submitting = false;
            match result {
                Ok(doc) => {
                    info!("Uploaded {} as {} ({} rows)", doc.filename, doc.id, doc.row_count);
                    app.notifications.success(format!(
                        "Structured data document \"{}\" uploaded!",
                        doc.filename
                    ));
                    app.upload.clear();
                    app.confirmation.open(Confirmation::chat_after_upload(&doc));
                }
                Err(e) => {
                    app.notifications
                        .error(format!("Structured data upload error: {e}"));
                }
            }
            Vec::new()
        }

        Action::DocumentsLoaded { purpose, result } => {
            finish_busy(app);
            documents_loaded(app, purpose, result);
            Vec::new()
        }
        Action::RequestDelete(doc) => {
            app.confirmation.open(Confirmation::delete(doc));
            Vec::new()
        }
        Action::DocumentDeleted { document, result } => {
            finish_busy(app);
            match result {
                Ok(response) => {
                    let message = response.message.unwrap_or_else(|| {
                        format!("Document \"{}\" deleted.", document.filename)
                    });
                    app.notifications.success(message);
                    if app.chat.is_selected(&document.id) {
                        info!("Deleted document {} was the chat target, resetting chat", document.id);
                        app.chat.reset();
                    }
                    start_busy(app);
                    vec![Effect::FetchDocuments(DocumentsPurpose::Listing)]
                }
                Err(e) => {
                    app.notifications.error(format!(
                        "Failed to delete document \"{}\": {e}",
                        document.filename
                    ));
                    Vec::new()
                }
            }
        }

        Action::SelectDocument(doc) => select_document(app, doc),
        Action::SubmitMessage(text) => submit_message(app, &text),
        Action::ChatReplied { epoch, result } => {
            match app.chat.receive(epoch, result) {
                ReplyOutcome::Stale => {}
                ReplyOutcome::Answered {
                    broader_search_notice,
                } => {
                    if broader_search_notice {
                        app.notifications.info(
                            "The assistant will use an internet search for further questions about this data.",
                        );
                    }
                }
                ReplyOutcome::Failed { cause } => {
                    app.notifications.error(format!("Chat error: {cause}"));
                }
            }
            Vec::new()
        }
        Action::ResetChat => {
            app.chat.reset();
            Vec::new()
        }

        Action::HistoryLoaded(result) => {
            finish_busy(app);
            match result {
                Ok(entries) => app.history = Loadable::Loaded(entries),
                Err(e) => {
                    app.notifications
                        .error(format!("Failed to load chat history: {e}"));
                    app.history = Loadable::Failed("Failed to load chat history.".to_string());
                }
            }
            Vec::new()
        }

        Action::Confirm => match app.confirmation.confirm() {
            Some(PendingAction::ChatWithDocument(doc)) => select_document(app, doc),
            Some(PendingAction::DeleteDocument(doc)) => {
                info!("Deleting document {} ({})", doc.id, doc.filename);
                start_busy(app);
                vec![Effect::DeleteDocument(doc)]
            }
            None => Vec::new(),
        },
        Action::Cancel => {
            app.confirmation.cancel();
            Vec::new()
        }

        Action::HealthChecked(result) => {
            match result {
                Ok(report) if report.is_healthy() => app.health = ServerHealth::Healthy,
                Ok(report) => {
                    info!("Server reports degraded health: {:?}", report);
                    app.health = ServerHealth::Degraded(report.status);
                }
                Err(e) => {
                    app.health = ServerHealth::Unreachable;
                    app.notifications
                        .error(format!("Could not reach the server: {e}"));
                }
            }
            Vec::new()
        }
        Action::Notify(level, message) => {
            app.notifications.push(level, message);
            Vec::new()
        }
    }
}

fn start_busy(app: &mut App) {
    app.busy += 1;
}

fn finish_busy(app: &mut App) {
    app.busy = app.busy.saturating_sub(1);
}

/// Activate one panel and request its refresh.
fn navigate(app: &mut App, panel: Panel) -> Vec<Effect> {
    debug!("Navigate {:?} -> {:?}", app.panel, panel);
    app.panel = panel;
    let effect = match panel {
        Panel::Upload | Panel::Faq => return Vec::new(),
        Panel::Documents => Effect::FetchDocuments(DocumentsPurpose::Listing),
        Panel::Chat => Effect::FetchDocuments(DocumentsPurpose::ChatSidebar),
        Panel::History => Effect::FetchHistory,
    };
    start_busy(app);
    vec![effect]
}

fn documents_loaded(
    app: &mut App,
    purpose: DocumentsPurpose,
    result: Result<Vec<Document>, ApiError>,
) {
    match result {
        Ok(docs) => {
            debug!("Loaded {} documents for {:?}", docs.len(), purpose);
            if purpose == DocumentsPurpose::ChatSidebar
                && let Some(selected) = app.chat.selected()
                && !docs.iter().any(|d| d.id == selected.id)
            {
                info!("Selected document {} no longer exists, resetting chat", selected.id);
                app.chat.reset();
            }
            app.documents = Loadable::Loaded(docs);
        }
        Err(e) => {
            let what = match purpose {
                DocumentsPurpose::Listing => "structured documents",
                DocumentsPurpose::ChatSidebar => "structured documents for chat",
            };
            app.notifications.error(format!("Failed to load {what}: {e}"));
            app.documents = Loadable::Failed("Failed to load structured documents.".to_string());
        }
    }
}

fn select_document(app: &mut App, doc: DocumentRef) -> Vec<Effect> {
    let filename = doc.filename.clone();
    if app.chat.select(doc) == Selection::Switched {
        app.notifications.push_for(
            Level::Info,
            format!("Data \"{filename}\" selected. You can start chatting."),
            SELECTION_NOTICE,
        );
    }
    navigate(app, Panel::Chat)
}

fn submit_message(app: &mut App, text: &str) -> Vec<Effect> {
    match app.chat.submit(text) {
        SubmitOutcome::NoDocument => {
            app.notifications
                .error("Select a structured document first to start chatting.");
            Vec::new()
        }
        SubmitOutcome::EmptyMessage => {
            app.notifications.info("Type your question in the input box.");
            Vec::new()
        }
        SubmitOutcome::Busy => {
            debug!("Ignoring submit while a reply is pending");
            Vec::new()
        }
        SubmitOutcome::Sent { epoch, request } => {
            info!(
                "Sending chat message to document {} (epoch {})",
                request.structured_document_id, epoch
            );
            vec![Effect::SendChat { epoch, request }]
        }
    }
}

fn submit_upload(app: &mut App) -> Vec<Effect> {
    if app.upload.submitting {
        return Vec::new();
    }
    let Some(file) = app.upload.pending.clone() else {
        app.notifications
            .info("No structured data file selected for upload.");
        return Vec::new();
    };
    app.upload.submitting = true;
    info!("Uploading {} ({} bytes)", file.name, file.size);
    vec![Effect::Upload(file)]
}
