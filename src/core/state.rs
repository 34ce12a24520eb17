//! # Application State
//!
//! The whole client session in one place. No TUI types live here;
//! presentation state (scroll offsets, list cursors) belongs to `tui`.
//!
//! ```text
//! App
//! ├── panel: Panel                      // exactly one active panel
//! ├── documents: Loadable<Vec<Document>> // listing + chat sidebar
//! ├── history: Loadable<Vec<HistoryEntry>>
//! ├── chat: ChatSession                 // selection + transcript
//! ├── upload: UploadState               // at most one pending file
//! ├── confirmation: ConfirmSlot         // at most one pending action
//! ├── notifications: Notifications      // transient toasts
//! ├── busy: u32                         // refreshes in flight
//! └── health: ServerHealth              // start-up health probe
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::{Document, HistoryEntry};
use crate::core::chat::ChatSession;
use crate::core::config::ResolvedConfig;
use crate::core::confirm::ConfirmSlot;
use crate::core::notify::Notifications;
use crate::core::upload::{DEFAULT_MAX_FILE_SIZE_MB, UploadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Upload,
    Documents,
    Chat,
    History,
    Faq,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Upload,
        Panel::Documents,
        Panel::Chat,
        Panel::History,
        Panel::Faq,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Upload => "Upload",
            Panel::Documents => "Documents",
            Panel::Chat => "Chat",
            Panel::History => "History",
            Panel::Faq => "FAQ",
        }
    }

    pub fn index(&self) -> usize {
        Panel::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Panel {
        Panel::ALL[(self.index() + 1) % Panel::ALL.len()]
    }

    pub fn prev(&self) -> Panel {
        Panel::ALL[(self.index() + Panel::ALL.len() - 1) % Panel::ALL.len()]
    }
}

/// Remote data as last seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    NotLoaded,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServerHealth {
    #[default]
    Unknown,
    Healthy,
    Degraded(String),
    Unreachable,
}

impl ServerHealth {
    pub fn label(&self) -> &str {
        match self {
            ServerHealth::Unknown => "checking",
            ServerHealth::Healthy => "healthy",
            ServerHealth::Degraded(_) => "degraded",
            ServerHealth::Unreachable => "unreachable",
        }
    }
}

/// Knobs the session needs from configuration.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub start_panel: Panel,
    pub max_file_size_mb: u64,
    pub notification_duration: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            start_panel: Panel::Upload,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            notification_duration: Duration::from_secs(5),
        }
    }
}

pub struct App {
    pub panel: Panel,
    pub start_panel: Panel,
    pub documents: Loadable<Vec<Document>>,
    pub history: Loadable<Vec<HistoryEntry>>,
    pub chat: ChatSession,
    pub upload: UploadState,
    pub confirmation: ConfirmSlot,
    pub notifications: Notifications,
    /// Number of panel refreshes or deletions in flight; busy indicator shows while > 0.
    pub busy: u32,
    pub health: ServerHealth,
    pub base_url: String,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self {
            panel: options.start_panel,
            start_panel: options.start_panel,
            documents: Loadable::NotLoaded,
            history: Loadable::NotLoaded,
            chat: ChatSession::new(),
            upload: UploadState::new(options.max_file_size_mb),
            confirmation: ConfirmSlot::default(),
            notifications: Notifications::new(options.notification_duration),
            busy: 0,
            health: ServerHealth::Unknown,
            base_url: String::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(AppOptions {
            start_panel: config.start_panel,
            max_file_size_mb: config.max_file_size_mb,
            notification_duration: config.notification_duration,
        });
        app.base_url = config.base_url.clone();
        app
    }

    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }

    pub fn document_list(&self) -> &[Document] {
        self.documents.loaded().map(Vec::as_slice).unwrap_or(&[])
    }
}
