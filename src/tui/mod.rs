//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (request in flight, toasts on screen): draws every ~80ms
//!   so the spinner turns and expired toasts disappear on time.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;

use crate::api::{ApiClient, DocumentService};
use crate::core::action::{Action, Effect, update};
use crate::core::chat::DocumentRef;
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Panel};
use crate::effects;
use crate::tui::component::EventHandler;
use crate::tui::components::confirm_modal::{ModalEvent, modal_event, modal_rect};
use crate::tui::components::document_list::DocumentEvent;
use crate::tui::components::upload_panel::resolve_candidate;
use crate::tui::components::{
    ChatViewState, DocumentListState, FaqState, HistoryViewState, InputBox, InputEvent, NavBar,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub upload_path: InputBox,
    pub chat_input: InputBox,
    pub documents: DocumentListState,
    pub sidebar: DocumentListState,
    pub chat_view: ChatViewState,
    pub history: HistoryViewState,
    pub faq: FaqState,
    /// Chat epoch the transcript scroll position belongs to
    chat_epoch: u64,
}

impl TuiState {
    pub fn new() -> Self {
        let mut upload_path = InputBox::new(" File path ");
        upload_path.placeholder = "Type the path of a .csv, .xlsx or .xls file and press Enter".to_string();
        Self {
            upload_path,
            chat_input: InputBox::new(" Question "),
            documents: DocumentListState::new(),
            sidebar: DocumentListState::new(),
            chat_view: ChatViewState::new(),
            history: HistoryViewState::default(),
            faq: FaqState::new(),
            chat_epoch: 0,
        }
    }

    /// Bring presentation state in line with `app` after an update.
    fn sync(&mut self, app: &App, effects: &[Effect]) {
        if app.chat.epoch() != self.chat_epoch {
            self.chat_epoch = app.chat.epoch();
            self.chat_view.reset();
        }
        if effects.iter().any(|e| matches!(e, Effect::SendChat { .. })) {
            self.chat_input.clear();
        }
        if app.upload.pending.is_some() && !self.upload_path.buffer.is_empty() {
            self.upload_path.clear();
        }
        let len = app.document_list().len();
        self.documents.clamp(len);
        self.sidebar.clamp(len);
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Translate one terminal event into at most one core action.
///
/// Presentation-only events (scrolling, list cursors, typing) are applied
/// to `tui` directly and yield `None`.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent, frame_area: Rect) -> Option<Action> {
    let layout = ui::screen_layout(frame_area);

    if matches!(event, TuiEvent::ForceQuit | TuiEvent::Quit) {
        return Some(Action::Quit);
    }

    // An open modal captures all input
    if let Some(confirmation) = app.confirmation.current() {
        return match modal_event(event, modal_rect(confirmation, layout.main))? {
            ModalEvent::Confirm => Some(Action::Confirm),
            ModalEvent::Cancel => Some(Action::Cancel),
        };
    }

    match event {
        TuiEvent::GoToPanel(panel) => return Some(Action::Navigate(*panel)),
        TuiEvent::NextPanel => return Some(Action::Navigate(app.panel.next())),
        TuiEvent::PrevPanel => return Some(Action::Navigate(app.panel.prev())),
        TuiEvent::Refresh => return Some(Action::Navigate(app.panel)),
        TuiEvent::MouseClick(x, y) if *y == layout.nav.y => {
            return NavBar::panel_at(layout.nav, *x).map(Action::Navigate);
        }
        TuiEvent::Resize | TuiEvent::MouseClick(..) => return None,
        _ => {}
    }

    match app.panel {
        Panel::Upload => match event {
            TuiEvent::UploadFile => Some(Action::SubmitUpload),
            TuiEvent::ClearFile => Some(Action::ClearPendingFile),
            TuiEvent::Escape => {
                tui.upload_path.clear();
                None
            }
            _ => match tui.upload_path.handle_event(event)? {
                InputEvent::Submit(text) if text.trim().is_empty() => None,
                InputEvent::Submit(text) => Some(match resolve_candidate(&text) {
                    Ok(candidate) => Action::ChooseFile(candidate),
                    Err(reason) => Action::FileUnreadable {
                        path: text.trim().to_string(),
                        reason,
                    },
                }),
                InputEvent::ContentChanged => None,
            },
        },
        Panel::Documents => {
            match tui.documents.handle_event(event, app.document_list())? {
                DocumentEvent::Chat(doc) => Some(Action::SelectDocument(doc)),
                DocumentEvent::Delete(doc) => Some(Action::RequestDelete(doc)),
            }
        }
        Panel::Chat => {
            let docs = app.document_list();
            match event {
                TuiEvent::CursorUp => {
                    tui.sidebar.move_up(docs.len());
                    None
                }
                TuiEvent::CursorDown => {
                    tui.sidebar.move_down(docs.len());
                    None
                }
                TuiEvent::OpenDocument => tui
                    .sidebar
                    .current(docs)
                    .map(|doc| Action::SelectDocument(DocumentRef::from(doc))),
                TuiEvent::NewChat => Some(Action::ResetChat),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.chat_view.handle_scroll(event);
                    None
                }
                _ => match tui.chat_input.handle_event(event)? {
                    InputEvent::Submit(text) => Some(Action::SubmitMessage(text)),
                    InputEvent::ContentChanged => None,
                },
            }
        }
        Panel::History => {
            tui.history.handle_scroll(event);
            None
        }
        Panel::Faq => {
            tui.faq.handle_event(event);
            None
        }
    }
}

/// Run `action` through the reducer and spawn whatever it asks for.
/// Returns `true` once the app should exit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    service: &Arc<dyn DocumentService>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let effects = update(app, action);
    tui.sync(app, &effects);

    let mut quit = false;
    for effect in effects {
        if effect == Effect::Quit {
            quit = true;
            continue;
        }
        debug!("Spawning effect: {:?}", effect);
        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(action) = effects::execute(service.as_ref(), effect).await
                && tx.send(action).is_err()
            {
                warn!("Failed to send effect result: receiver dropped");
            }
        });
    }
    quit
}

fn is_animating(app: &App) -> bool {
    app.is_busy()
        || app.upload.submitting
        || app.chat.is_awaiting()
        || !app.notifications.is_empty()
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service: Arc<dyn DocumentService> =
        Arc::new(ApiClient::new(config.base_url.clone(), config.timeout));
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut should_quit = dispatch(&mut app, &mut tui, Action::Start, &service, &tx);

    while !should_quit {
        if app.notifications.prune(Instant::now()) {
            needs_redraw = true;
        }
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let frame_area = terminal.get_frame().area();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, &event, frame_area) {
                debug!("Event {:?} -> {:?}", event, action);
                should_quit |= dispatch(&mut app, &mut tui, action, &service, &tx);
            }
            if should_quit {
                break;
            }
        }

        // Results of background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit |= dispatch(&mut app, &mut tui, action, &service, &tx);
        }
    }

    info!("Tabula shutting down");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Loadable;
    use crate::test_support::{doc, doc_ref, test_app};

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 30,
    };

    fn route(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
        route_event(app, tui, &event, AREA)
    }

    fn type_text(app: &App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            assert_eq!(route(app, tui, TuiEvent::InputChar(c)), None);
        }
    }

    #[test]
    fn test_global_navigation() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(
            route(&app, &mut tui, TuiEvent::GoToPanel(Panel::History)),
            Some(Action::Navigate(Panel::History))
        );
        assert_eq!(
            route(&app, &mut tui, TuiEvent::NextPanel),
            Some(Action::Navigate(Panel::Documents))
        );
        assert_eq!(
            route(&app, &mut tui, TuiEvent::PrevPanel),
            Some(Action::Navigate(Panel::Faq))
        );
        assert_eq!(
            route(&app, &mut tui, TuiEvent::Refresh),
            Some(Action::Navigate(Panel::Upload))
        );
        assert_eq!(route(&app, &mut tui, TuiEvent::Quit), Some(Action::Quit));
    }

    #[test]
    fn test_nav_bar_click_navigates() {
        let app = test_app();
        let mut tui = TuiState::new();
        // " F1 Upload " is 11 columns wide, so column 2 is on the first tab
        assert_eq!(
            route(&app, &mut tui, TuiEvent::MouseClick(2, 1)),
            Some(Action::Navigate(Panel::Upload))
        );
        assert_eq!(route(&app, &mut tui, TuiEvent::MouseClick(2, 10)), None);
    }

    #[test]
    fn test_modal_swallows_panel_keys() {
        let mut app = test_app();
        update(&mut app, Action::RequestDelete(doc_ref("a")));
        let mut tui = TuiState::new();

        assert_eq!(route(&app, &mut tui, TuiEvent::GoToPanel(Panel::Faq)), None);
        assert_eq!(route(&app, &mut tui, TuiEvent::InputChar('x')), None);
        assert!(tui.upload_path.buffer.is_empty());
        assert_eq!(route(&app, &mut tui, TuiEvent::Submit), Some(Action::Confirm));
        assert_eq!(route(&app, &mut tui, TuiEvent::Escape), Some(Action::Cancel));
        assert_eq!(route(&app, &mut tui, TuiEvent::ForceQuit), Some(Action::Quit));
    }

    #[test]
    fn test_upload_path_enter_resolves_file() {
        let app = test_app();
        let mut tui = TuiState::new();

        assert_eq!(route(&app, &mut tui, TuiEvent::Submit), None, "blank path ignored");

        type_text(&app, &mut tui, "/definitely/not/here.csv");
        match route(&app, &mut tui, TuiEvent::Submit) {
            Some(Action::FileUnreadable { path, .. }) => assert_eq!(path, "/definitely/not/here.csv"),
            other => panic!("expected FileUnreadable, got {other:?}"),
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        tui.upload_path.clear();
        type_text(&app, &mut tui, &path.display().to_string());
        match route(&app, &mut tui, TuiEvent::Submit) {
            Some(Action::ChooseFile(candidate)) => {
                assert_eq!(candidate.name, "report.csv");
                assert_eq!(candidate.size, 8);
            }
            other => panic!("expected ChooseFile, got {other:?}"),
        }
    }

    #[test]
    fn test_upload_panel_commands() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route(&app, &mut tui, TuiEvent::UploadFile), Some(Action::SubmitUpload));
        assert_eq!(route(&app, &mut tui, TuiEvent::ClearFile), Some(Action::ClearPendingFile));
    }

    #[test]
    fn test_documents_panel_chat_and_delete() {
        let mut app = test_app();
        app.panel = Panel::Documents;
        app.documents = Loadable::Loaded(vec![doc("a"), doc("b")]);
        let mut tui = TuiState::new();

        assert_eq!(route(&app, &mut tui, TuiEvent::CursorDown), None);
        assert_eq!(
            route(&app, &mut tui, TuiEvent::Submit),
            Some(Action::SelectDocument(doc_ref("b")))
        );
        assert_eq!(
            route(&app, &mut tui, TuiEvent::InputChar('d')),
            Some(Action::RequestDelete(doc_ref("b")))
        );
    }

    #[test]
    fn test_chat_panel_sidebar_and_submit() {
        let mut app = test_app();
        app.panel = Panel::Chat;
        app.documents = Loadable::Loaded(vec![doc("a"), doc("b")]);
        let mut tui = TuiState::new();

        route(&app, &mut tui, TuiEvent::CursorDown);
        assert_eq!(
            route(&app, &mut tui, TuiEvent::OpenDocument),
            Some(Action::SelectDocument(doc_ref("b")))
        );
        assert_eq!(route(&app, &mut tui, TuiEvent::NewChat), Some(Action::ResetChat));

        type_text(&app, &mut tui, "total?");
        assert_eq!(
            route(&app, &mut tui, TuiEvent::Submit),
            Some(Action::SubmitMessage("total?".to_string()))
        );
    }

    #[test]
    fn test_sync_clears_chat_input_only_when_sent() {
        let mut app = test_app();
        app.panel = Panel::Chat;
        let mut tui = TuiState::new();
        tui.chat_input.buffer = "hello".to_string();

        // No document selected: nothing is sent, the draft stays
        let effects = update(&mut app, Action::SubmitMessage("hello".to_string()));
        tui.sync(&app, &effects);
        assert_eq!(tui.chat_input.buffer, "hello");

        let effects = update(&mut app, Action::SelectDocument(doc_ref("a")));
        tui.sync(&app, &effects);
        let effects = update(&mut app, Action::SubmitMessage("hello".to_string()));
        tui.sync(&app, &effects);
        assert!(tui.chat_input.buffer.is_empty());
        assert!(app.chat.is_awaiting());
    }

    #[test]
    fn test_sync_resets_transcript_scroll_on_new_chat() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        tui.chat_view.follow = false;

        let effects = update(&mut app, Action::SelectDocument(doc_ref("a")));
        tui.sync(&app, &effects);
        assert!(tui.chat_view.follow);
    }
}
