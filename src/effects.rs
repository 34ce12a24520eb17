//! # Effect Execution
//!
//! Runs one [`Effect`] against a [`DocumentService`] and turns the outcome
//! into the [`Action`] that reports it back to the reducer.
//!
//! Kept apart from the TUI so the full upload → list → chat flow can be
//! driven in tests without a terminal.

use log::{info, warn};

use crate::api::{ApiError, DocumentService, FileUpload};
use crate::core::action::{Action, Effect};
use crate::core::upload::PendingFile;

/// Multipart form field the upload endpoint expects.
pub const UPLOAD_FIELD: &str = "file";

/// Execute `effect`. Returns `None` for effects with nothing to report.
pub async fn execute(service: &dyn DocumentService, effect: Effect) -> Option<Action> {
    match effect {
        Effect::Quit => None,
        Effect::CheckHealth => Some(Action::HealthChecked(service.health().await)),
        Effect::FetchDocuments(purpose) => Some(Action::DocumentsLoaded {
            purpose,
            result: service.list_documents().await,
        }),
        Effect::FetchHistory => Some(Action::HistoryLoaded(service.history().await)),
        Effect::Upload(file) => Some(upload(service, file).await),
        Effect::DeleteDocument(document) => {
            let result = service.delete_document(&document.id).await;
            Some(Action::DocumentDeleted { document, result })
        }
        Effect::SendChat { epoch, request } => Some(Action::ChatReplied {
            epoch,
            result: service.chat(request).await,
        }),
    }
}

async fn upload(service: &dyn DocumentService, file: PendingFile) -> Action {
    let bytes = match tokio::fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read {}: {}", file.path.display(), e);
            return Action::UploadFinished(Err(ApiError::new(format!(
                "could not read \"{}\": {e}",
                file.name
            ))));
        }
    };
    info!("Read {} bytes from {}", bytes.len(), file.path.display());

    let upload = FileUpload {
        field: UPLOAD_FIELD.to_string(),
        file_name: file.name.clone(),
        mime: file.mime().to_string(),
        bytes,
    };
    Action::UploadFinished(service.upload(upload).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::update;
    use crate::core::chat::ChatState;
    use crate::core::state::Panel;
    use crate::core::upload::CandidateFile;
    use crate::test_support::{RecordingService, doc, doc_ref, test_app};

    /// Apply an action and run every resulting effect to completion.
    async fn drive(app: &mut crate::core::state::App, service: &RecordingService, action: Action) {
        let mut queue = vec![action];
        while let Some(action) = queue.pop() {
            for effect in update(app, action) {
                if let Some(next) = execute(service, effect).await {
                    queue.push(next);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let service = RecordingService::with_documents(vec![doc("a")]);
        let mut app = test_app();
        drive(&mut app, &service, Action::SelectDocument(doc_ref("a"))).await;
        drive(&mut app, &service, Action::SubmitMessage("rows?".into())).await;

        assert_eq!(service.calls(), vec!["list", "chat a"]);
        let transcript = app.chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].content, "echo: rows?");
        assert!(app.chat.input_enabled());
    }

    #[tokio::test]
    async fn test_no_chat_call_without_document() {
        let service = RecordingService::default();
        let mut app = test_app();
        drive(&mut app, &service, Action::SubmitMessage("rows?".into())).await;
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_reads_file_and_offers_chat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let service = RecordingService::with_documents(vec![doc("d1")]);
        let mut app = test_app();
        drive(&mut app, &service, Action::ChooseFile(CandidateFile::new(&path, 8))).await;
        drive(&mut app, &service, Action::SubmitUpload).await;
        assert_eq!(service.calls(), vec!["upload report.csv"]);
        assert!(app.confirmation.is_open());

        drive(&mut app, &service, Action::Confirm).await;
        assert_eq!(app.panel, Panel::Chat);
        assert!(app.chat.is_selected("d1"));
        assert_eq!(service.calls(), vec!["upload report.csv", "list"]);
    }

    #[tokio::test]
    async fn test_missing_file_reports_upload_error() {
        let service = RecordingService::default();
        let mut app = test_app();
        drive(
            &mut app,
            &service,
            Action::ChooseFile(CandidateFile::new("/definitely/not/here.csv", 8)),
        )
        .await;
        drive(&mut app, &service, Action::SubmitUpload).await;
        assert!(service.calls().is_empty());
        assert!(!app.upload.submitting);
        assert!(!app.confirmation.is_open());
    }

    #[tokio::test]
    async fn test_failed_listing_keeps_selection() {
        let service = RecordingService::failing();
        let mut app = test_app();
        drive(&mut app, &service, Action::SelectDocument(doc_ref("a"))).await;
        assert_eq!(app.chat.state(), &ChatState::DocumentSelected(doc_ref("a")));
        assert!(!app.is_busy());
    }
}
