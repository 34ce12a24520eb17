//! Wire types for the structured-data chat service.
//!
//! Field names mirror the service's JSON exactly. Optional fields are
//! tolerated when absent so older servers keep working.

use serde::{Deserialize, Deserializer, Serialize};

/// An uploaded spreadsheet or CSV as listed by `GET /structured-documents`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub row_count: Option<u64>,
}

/// Response body of `POST /upload-structured-data`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub id: String,
    pub filename: String,
    pub row_count: u64,
    #[serde(default)]
    pub upload_date: Option<String>,
    /// First rows of the parsed sheet. Only logged, never rendered.
    #[serde(default)]
    pub data_preview: Option<Vec<serde_json::Value>>,
}

impl From<UploadedDocument> for Document {
    fn from(doc: UploadedDocument) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            upload_date: doc.upload_date,
            row_count: Some(doc.row_count),
        }
    }
}

/// Response body of `DELETE /structured-documents/{id}`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body of `POST /chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub structured_document_id: String,
}

/// What the service suggests for the next turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    #[default]
    ContinueChat,
    AwaitSelection,
    /// Follow-up questions about this document will be answered with an internet search.
    SearchInternet,
    #[serde(other)]
    Unknown,
}

/// Response body of `POST /chat`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub next_action: Option<NextAction>,
    #[serde(default)]
    pub source_document_name: Option<String>,
}

impl ChatReply {
    pub fn wants_broader_search(&self) -> bool {
        self.next_action == Some(NextAction::SearchInternet)
    }
}

/// One stored question/answer pair from `GET /history`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub message: String,
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub excel_document_id: Option<String>,
    #[serde(default)]
    pub chat_turn: Option<u32>,
    /// Stored as an integer column server-side, so `0`/`1` arrive as often as booleans.
    #[serde(default, deserialize_with = "flag")]
    pub is_predefined: Option<bool>,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Bool(b)) => Some(b),
        Some(serde_json::Value::Number(n)) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        _ => None,
    })
}

/// Envelope of `GET /history`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Response body of `GET /health`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub groq_api: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub model_info: Option<serde_json::Value>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_tolerates_missing_optional_fields() {
        let doc: Document = serde_json::from_str(r#"{"id":"d1","filename":"a.csv"}"#).unwrap();
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.upload_date, None);
        assert_eq!(doc.row_count, None);
    }

    #[test]
    fn test_next_action_parses_known_and_unknown_values() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"ok","next_action":"search_internet"}"#).unwrap();
        assert!(reply.wants_broader_search());

        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"ok","next_action":"something_new"}"#).unwrap();
        assert_eq!(reply.next_action, Some(NextAction::Unknown));
        assert!(!reply.wants_broader_search());

        let reply: ChatReply = serde_json::from_str(r#"{"response":"ok"}"#).unwrap();
        assert_eq!(reply.next_action, None);
    }

    #[test]
    fn test_chat_request_field_names() {
        let req = ChatRequest {
            message: "sum of sales?".to_string(),
            structured_document_id: "d1".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["message"], "sum of sales?");
        assert_eq!(json["structured_document_id"], "d1");
    }

    #[test]
    fn test_uploaded_document_into_document() {
        let uploaded: UploadedDocument = serde_json::from_str(
            r#"{"id":"d1","filename":"report.csv","row_count":120,"data_preview":[{"a":1}]}"#,
        )
        .unwrap();
        let doc: Document = uploaded.into();
        assert_eq!(doc.row_count, Some(120));
        assert_eq!(doc.filename, "report.csv");
    }

    #[test]
    fn test_history_entry_defaults() {
        let history: HistoryResponse = serde_json::from_str(
            r#"{"history":[{"message":"q","response":"a","chat_turn":2,"excel_document_id":"d1"}]}"#,
        )
        .unwrap();
        assert_eq!(history.history.len(), 1);
        assert_eq!(history.history[0].chat_turn, Some(2));
        assert_eq!(history.history[0].timestamp, None);
    }
}
