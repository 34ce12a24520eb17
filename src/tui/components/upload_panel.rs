//! # Upload Panel
//!
//! Path entry, the pending file card and the submit control. The terminal
//! has no file picker, so the user types a path and presses Enter; the
//! panel turns it into a [`CandidateFile`] for the reducer to validate.

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::upload::{ALLOWED_EXTENSIONS, CandidateFile, UploadState};
use crate::tui::component::Component;
use crate::tui::components::input_box::{INPUT_HEIGHT, InputBox};

/// Turn typed text into a candidate by reading the file's metadata.
///
/// A leading `~/` expands to the home directory.
pub fn resolve_candidate(input: &str) -> Result<CandidateFile, String> {
    let trimmed = input.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return Err("no path given".to_string());
    }
    let path = match trimmed.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(trimmed)),
        None => PathBuf::from(trimmed),
    };
    let metadata = std::fs::metadata(&path).map_err(|e| e.to_string())?;
    if !metadata.is_file() {
        return Err("not a regular file".to_string());
    }
    Ok(CandidateFile::new(path, metadata.len()))
}

pub struct UploadPanel<'a> {
    upload: &'a UploadState,
    input: &'a mut InputBox,
}

impl<'a> UploadPanel<'a> {
    pub fn new(upload: &'a UploadState, input: &'a mut InputBox) -> Self {
        Self { upload, input }
    }

    fn pending_lines(&self) -> Vec<Line<'static>> {
        match &self.upload.pending {
            Some(file) => vec![
                Line::from(vec![
                    Span::raw("  📄 "),
                    Span::styled(
                        file.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  ({} MB)", file.size_mb()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    "  Ctrl+X removes the file",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            None => vec![Line::from(Span::styled(
                "  No file selected.",
                Style::default().fg(Color::DarkGray),
            ))],
        }
    }

    fn submit_line(&self) -> Line<'static> {
        let style = if self.upload.submitting {
            Style::default().fg(Color::Yellow)
        } else if self.upload.can_submit() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {} ", self.upload.submit_label()), style),
            Span::styled("  Ctrl+U", Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl Component for UploadPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Upload structured data ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [intro_area, input_area, pending_area, submit_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        let types = ALLOWED_EXTENSIONS
            .iter()
            .map(|e| e.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        let intro = Paragraph::new(format!(
            "Type the path of a {types} file (max {}MB) and press Enter to select it.",
            self.upload.max_file_size_mb
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(intro, intro_area);

        self.input.render(frame, input_area);
        frame.render_widget(Paragraph::new(self.pending_lines()), pending_area);
        frame.render_widget(self.submit_line(), submit_area);
    }
}
