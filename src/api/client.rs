//! Thin HTTP wrapper around the structured-data chat service.
//!
//! Every request goes through [`ApiClient::call`], which owns the header
//! defaults, the no-content convention and error normalization. Callers
//! only ever see one failure shape: [`ApiError`] with a readable message.

use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Message used when the transport fails without saying why.
const CONNECT_FALLBACK: &str = "Failed to connect to the server. Check your connection.";

/// The single failure kind surfaced by the client.
///
/// Timeouts, DNS failures, refused connections and 4xx/5xx responses all
/// collapse into this; the message is what the user gets to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: CONNECT_FALLBACK.to_string(),
            };
        }
        Self { message }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::new(e.to_string())
    }
}

/// A file sent as a multipart form field.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    File(FileUpload),
}

/// Per-request options, the equivalent of a fetch init object.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get()
        }
    }

    pub fn post_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::new(format!("could not encode request: {e}")))?;
        Ok(Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: RequestBody::Json(value),
        })
    }

    pub fn post_file(upload: FileUpload) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: RequestBody::File(upload),
        }
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Default headers first, caller headers on top.
    ///
    /// File uploads get no content type so the multipart boundary written
    /// by the transport survives.
    fn merged_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !matches!(self.body, RequestBody::File(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and return the parsed JSON body.
    ///
    /// Returns `Ok(None)` for a 204 or an empty success body.
    pub async fn call(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let result = self.send(endpoint, options).await;
        if let Err(e) = &result {
            warn!("API call error: {} (endpoint: {})", e, endpoint);
        }
        result
    }

    async fn send(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = options.merged_headers();
        debug!("{} {}", options.method, url);

        let mut request = self
            .http
            .request(options.method, &url)
            .headers(headers)
            .timeout(self.timeout);

        request = match options.body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| ApiError::new(format!("could not encode request: {e}")))?;
                request.body(bytes)
            }
            RequestBody::File(upload) => {
                let part = reqwest::multipart::Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.mime)?;
                request.multipart(reqwest::multipart::Form::new().part(upload.field, part))
            }
        };

        let response = request.send().await?;
        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ApiError::new(format!("invalid response from server: {e}")))
    }

    /// Call and decode a body that must be present.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        match self.call(endpoint, options).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::new(format!("unexpected response from {endpoint}: {e}"))),
            None => Err(ApiError::new(format!("empty response from {endpoint}"))),
        }
    }

    /// Call and decode a body that may legitimately be absent.
    pub async fn call_optional_json<T: DeserializeOwned + Default>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        match self.call(endpoint, options).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::new(format!("unexpected response from {endpoint}: {e}"))),
            None => Ok(T::default()),
        }
    }
}

/// A `detail` that carries no message: null, `false`, zero or an empty string.
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => true,
        serde_json::Value::String(text) => text.is_empty(),
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Build the user-facing message for a non-success response.
fn error_from_body(status: StatusCode, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(detail) if !is_falsy(detail) => match detail {
                serde_json::Value::String(text) => ApiError::new(text.clone()),
                other => ApiError::new(other.to_string()),
            },
            _ => ApiError::new(format!("HTTP error {}", status.as_u16())),
        },
        Err(_) => ApiError::new(format!(
            "Server error: {} {}.",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )),
    }
}
