//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: server address, health and busy spinner
//! - `NavBar`: one tab per panel
//! - `UploadPanel`, `Toasts`, `ConfirmModal`
//!
//! ### Stateful Components (Persistent State + Transient Wrapper)
//!
//! The state lives in `TuiState`; a wrapper borrowing it is built each frame:
//! - `DocumentListState` / `DocumentList` (also the chat sidebar cursor)
//! - `ChatViewState` / `ChatView`
//! - `HistoryViewState` / `HistoryView`
//! - `FaqState` / `Faq`
//! - `InputBox`: owns its own buffer
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! DocumentList::new(&app.documents, active_id, &mut tui.documents).render(frame, area);
//!
//! // Bad: hidden dependency on global state
//! DocumentList::render(frame, area); // reads from App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── helpers.rs        (truncation, centering, date formatting)
//! ├── title_bar.rs      (top status line)
//! ├── nav_bar.rs        (panel tabs)
//! ├── input_box/        (single-line text field)
//! ├── upload_panel.rs
//! ├── document_list.rs
//! ├── chat_view.rs
//! ├── history_view.rs
//! ├── faq.rs
//! ├── confirm_modal.rs  (yes/no overlay)
//! └── notifications.rs  (toasts)
//! ```

pub mod chat_view;
pub mod confirm_modal;
pub mod document_list;
pub mod faq;
pub mod helpers;
pub mod history_view;
pub mod input_box;
pub mod nav_bar;
pub mod notifications;
pub mod title_bar;
pub mod upload_panel;

pub use chat_view::{ChatView, ChatViewState};
pub use confirm_modal::ConfirmModal;
pub use document_list::{DocumentList, DocumentListState};
pub use faq::{Faq, FaqState};
pub use history_view::{HistoryView, HistoryViewState};
pub use input_box::{InputBox, InputEvent};
pub use nav_bar::NavBar;
pub use notifications::Toasts;
pub use title_bar::TitleBar;
pub use upload_panel::UploadPanel;
