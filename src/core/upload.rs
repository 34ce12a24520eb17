//! # Upload Selection
//!
//! One pending file at most. A candidate is checked for size first and
//! extension second; anything rejected clears the pending slot.

use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

const MIB: u64 = 1024 * 1024;

/// A file the user pointed at, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, size }
    }
}

/// A validated file waiting to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl PendingFile {
    pub fn size_mb(&self) -> String {
        format_mb(self.size)
    }

    pub fn mime(&self) -> &'static str {
        mime_for(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    TooLarge { name: String, size: u64, limit_mb: u64 },
    UnsupportedType { name: String },
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::TooLarge {
                name,
                size,
                limit_mb,
            } => write!(
                f,
                "Structured data file \"{name}\" ({}MB) exceeds the {limit_mb}MB limit.",
                format_mb(*size)
            ),
            UploadRejection::UnsupportedType { name } => write!(
                f,
                "File type of \"{name}\" is not supported. Only XLSX, XLS, CSV."
            ),
        }
    }
}

impl std::error::Error for UploadRejection {}

fn format_mb(size: u64) -> String {
    format!("{:.2}", size as f64 / MIB as f64)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Check size, then extension.
pub fn validate(candidate: CandidateFile, max_mb: u64) -> Result<PendingFile, UploadRejection> {
    if candidate.size > max_mb.saturating_mul(MIB) {
        return Err(UploadRejection::TooLarge {
            name: candidate.name,
            size: candidate.size,
            limit_mb: max_mb,
        });
    }

    let allowed = extension_of(&candidate.name)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(UploadRejection::UnsupportedType {
            name: candidate.name,
        });
    }

    Ok(PendingFile {
        path: candidate.path,
        name: candidate.name,
        size: candidate.size,
    })
}

pub fn mime_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

#[derive(Debug)]
pub struct UploadState {
    pub pending: Option<PendingFile>,
    pub submitting: bool,
    pub max_file_size_mb: u64,
}

impl UploadState {
    pub fn new(max_file_size_mb: u64) -> Self {
        Self {
            pending: None,
            submitting: false,
            max_file_size_mb,
        }
    }

    /// Replace the pending file with `candidate` if it passes validation.
    pub fn choose(&mut self, candidate: CandidateFile) -> Result<&PendingFile, UploadRejection> {
        self.pending = None;
        let file = validate(candidate, self.max_file_size_mb)?;
        Ok(self.pending.insert(file))
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The submit control is enabled iff a valid file is pending and idle.
    pub fn can_submit(&self) -> bool {
        self.pending.is_some() && !self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Uploading..."
        } else {
            "Upload data"
        }
    }
}
