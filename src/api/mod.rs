//! # Remote Service
//!
//! Client side of the structured-data chat HTTP API.
//!
//! - [`client`]: `ApiClient::call`, header defaults and error normalization
//! - [`service`]: the `DocumentService` trait with one method per endpoint
//! - [`types`]: serde models of request and response bodies

pub mod client;
pub mod service;
pub mod types;

pub use client::{ApiClient, ApiError, FileUpload, RequestBody, RequestOptions};
pub use service::DocumentService;
pub use types::{
    ChatReply, ChatRequest, DeleteResponse, Document, HealthReport, HistoryEntry, NextAction,
    UploadedDocument,
};
