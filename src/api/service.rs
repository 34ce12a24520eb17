use async_trait::async_trait;

use super::client::{ApiClient, ApiError, FileUpload, RequestOptions};
use super::types::{
    ChatReply, ChatRequest, DeleteResponse, Document, HealthReport, HistoryEntry,
    HistoryResponse, UploadedDocument,
};

pub const UPLOAD_ENDPOINT: &str = "/upload-structured-data";
pub const DOCUMENTS_ENDPOINT: &str = "/structured-documents";
pub const CHAT_ENDPOINT: &str = "/chat";
pub const HISTORY_ENDPOINT: &str = "/history";
pub const HEALTH_ENDPOINT: &str = "/health";

/// Everything the client needs from the remote service.
///
/// The TUI only talks to this trait, so tests can swap in a recording
/// double and assert which calls were (or were not) made.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn upload(&self, file: FileUpload) -> Result<UploadedDocument, ApiError>;

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    async fn delete_document(&self, id: &str) -> Result<DeleteResponse, ApiError>;

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ApiError>;

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;

    async fn health(&self) -> Result<HealthReport, ApiError>;
}

#[async_trait]
impl DocumentService for ApiClient {
    async fn upload(&self, file: FileUpload) -> Result<UploadedDocument, ApiError> {
        self.call_json(UPLOAD_ENDPOINT, RequestOptions::post_file(file))
            .await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.call_optional_json(DOCUMENTS_ENDPOINT, RequestOptions::get())
            .await
    }

    async fn delete_document(&self, id: &str) -> Result<DeleteResponse, ApiError> {
        let endpoint = format!("{DOCUMENTS_ENDPOINT}/{}", urlencoding::encode(id));
        self.call_optional_json(&endpoint, RequestOptions::delete())
            .await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ApiError> {
        self.call_json(CHAT_ENDPOINT, RequestOptions::post_json(&request)?)
            .await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let envelope: HistoryResponse = self
            .call_optional_json(HISTORY_ENDPOINT, RequestOptions::get())
            .await?;
        Ok(envelope.history)
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        self.call_json(HEALTH_ENDPOINT, RequestOptions::get()).await
    }
}
