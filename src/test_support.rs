//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, ChatReply, ChatRequest, DeleteResponse, Document, DocumentService, FileUpload,
    HealthReport, HistoryEntry, UploadedDocument,
};
use crate::core::chat::DocumentRef;
use crate::core::state::{App, AppOptions};

/// Creates a test App with default options.
pub fn test_app() -> App {
    App::new(AppOptions::default())
}

/// A listed document named `{id}.csv`.
pub fn doc(id: &str) -> Document {
    Document {
        id: id.to_string(),
        filename: format!("{id}.csv"),
        upload_date: None,
        row_count: Some(10),
    }
}

pub fn doc_ref(id: &str) -> DocumentRef {
    DocumentRef::new(id, format!("{id}.csv"))
}

/// A service double that records every call and answers from canned data.
#[derive(Default)]
pub struct RecordingService {
    pub calls: Mutex<Vec<String>>,
    pub documents: Vec<Document>,
    pub fail: bool,
}

impl RecordingService {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(ApiError::new("HTTP error 500"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentService for RecordingService {
    async fn upload(&self, file: FileUpload) -> Result<UploadedDocument, ApiError> {
        self.record(format!("upload {}", file.file_name))?;
        Ok(UploadedDocument {
            id: "d1".to_string(),
            filename: file.file_name,
            row_count: 120,
            upload_date: None,
            data_preview: None,
        })
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.record("list".to_string())?;
        Ok(self.documents.clone())
    }

    async fn delete_document(&self, id: &str) -> Result<DeleteResponse, ApiError> {
        self.record(format!("delete {id}"))?;
        Ok(DeleteResponse::default())
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ApiError> {
        self.record(format!("chat {}", request.structured_document_id))?;
        Ok(ChatReply {
            response: format!("echo: {}", request.message),
            next_action: None,
            source_document_name: None,
        })
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.record("history".to_string())?;
        Ok(Vec::new())
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        self.record("health".to_string())?;
        Ok(HealthReport {
            status: "healthy".to_string(),
            groq_api: None,
            database: None,
            model_info: None,
        })
    }
}
