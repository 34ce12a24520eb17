use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::state::{App, Panel};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ChatView, ConfirmModal, DocumentList, Faq, HistoryView, NavBar, TitleBar, Toasts, UploadPanel,
};

/// The four horizontal bands of the screen.
pub struct ScreenLayout {
    pub title: Rect,
    pub nav: Rect,
    pub main: Rect,
    pub help: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    use Constraint::{Length, Min};
    let [title, nav, main, help] = Layout::vertical([Length(1), Length(1), Min(0), Length(1)]).areas(area);
    ScreenLayout {
        title,
        nav,
        main,
        help,
    }
}

/// What the title bar spinner should say, if anything is in flight.
pub fn busy_label(app: &App) -> Option<&'static str> {
    if app.upload.submitting {
        Some("Uploading...")
    } else if app.chat.is_awaiting() {
        Some("Waiting for answer...")
    } else if app.is_busy() {
        Some("Loading...")
    } else {
        None
    }
}

fn help_text(panel: Panel) -> &'static str {
    match panel {
        Panel::Upload => " Enter select file  Ctrl+U upload  Ctrl+X remove  F1-F5/Tab panels  Ctrl+Q quit",
        Panel::Documents => " ↑↓ move  Enter chat  d delete  Ctrl+R refresh  F1-F5/Tab panels  Ctrl+Q quit",
        Panel::Chat => " Enter send  ↑↓ sidebar  Ctrl+O open  Ctrl+N new chat  PgUp/PgDn scroll  Ctrl+Q quit",
        Panel::History => " ↑↓/PgUp/PgDn scroll  Ctrl+R refresh  F1-F5/Tab panels  Ctrl+Q quit",
        Panel::Faq => " ↑↓ move  Enter expand  F1-F5/Tab panels  Ctrl+Q quit",
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let layout = screen_layout(frame.area());

    let mut title_bar = TitleBar::new(app.base_url.clone(), app.health.clone(), busy_label(app));
    title_bar.spinner_frame = spinner_frame;
    title_bar.render(frame, layout.title);

    NavBar::new(app.panel).render(frame, layout.nav);

    match app.panel {
        Panel::Upload => UploadPanel::new(&app.upload, &mut tui.upload_path).render(frame, layout.main),
        Panel::Documents => DocumentList::new(
            &app.documents,
            app.chat.selected().map(|d| d.id.as_str()),
            &mut tui.documents,
        )
        .render(frame, layout.main),
        Panel::Chat => ChatView::new(
            &app.chat,
            &app.documents,
            &mut tui.sidebar,
            &mut tui.chat_input,
            &mut tui.chat_view,
        )
        .render(frame, layout.main),
        Panel::History => HistoryView::new(&app.history, &mut tui.history).render(frame, layout.main),
        Panel::Faq => Faq::new(&mut tui.faq).render(frame, layout.main),
    }

    frame.render_widget(
        Line::from(Span::styled(help_text(app.panel), Style::default().fg(Color::DarkGray))),
        layout.help,
    );

    if let Some(confirmation) = app.confirmation.current() {
        ConfirmModal::new(confirmation).render(frame, layout.main);
    }

    Toasts::new(&app.notifications).render(frame, layout.main);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{doc_ref, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new();
        terminal
            .draw(|f| {
                draw_ui(f, app, &mut tui, 0);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_every_panel() {
        let mut app = test_app();
        for panel in Panel::ALL {
            app.panel = panel;
            let text = render(&app);
            assert!(text.contains("Tabula"));
            assert!(text.contains("Ctrl+Q quit"));
        }
    }

    #[test]
    fn test_modal_drawn_over_panel() {
        let mut app = test_app();
        update(&mut app, Action::RequestDelete(doc_ref("a")));
        let text = render(&app);
        assert!(text.contains("Delete document"));
        assert!(text.contains("a.csv"));
    }

    #[test]
    fn test_busy_label_priority() {
        let mut app = test_app();
        assert_eq!(busy_label(&app), None);
        app.busy = 1;
        assert_eq!(busy_label(&app), Some("Loading..."));
        app.upload.submitting = true;
        assert_eq!(busy_label(&app), Some("Uploading..."));
    }

    #[test]
    fn test_screen_layout_bands() {
        let layout = screen_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.title.y, 0);
        assert_eq!(layout.nav.y, 1);
        assert_eq!(layout.main.height, 21);
        assert_eq!(layout.help.y, 23);
    }
}
