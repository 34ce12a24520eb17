//! Cursor position and horizontal scrolling for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the number of display
//! columns hidden on the left. Navigation methods take `buffer: &str`
//! explicitly; the text is owned by `InputBox`.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;
/// Border (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Display columns scrolled out on the left
    pub scroll_cols: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_cols: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_cols = 0;
    }

    /// Display column of the cursor within the whole buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Scroll so the cursor stays inside `inner_width` columns.
    pub fn update_scroll(&mut self, buffer: &str, inner_width: usize) {
        if inner_width == 0 {
            self.scroll_cols = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll_cols {
            self.scroll_cols = col;
        } else if col >= self.scroll_cols + inner_width {
            self.scroll_cols = col + 1 - inner_width;
        }
    }

    /// The part of `buffer` that fits on screen, plus the columns actually skipped.
    ///
    /// A wide character straddling the left edge is skipped entirely, so the
    /// skipped width can exceed `scroll_cols` by one.
    pub fn visible<'a>(&self, buffer: &'a str, inner_width: usize) -> (&'a str, usize) {
        let mut skipped = 0;
        let mut start = buffer.len();
        for (i, c) in buffer.char_indices() {
            if skipped >= self.scroll_cols {
                start = i;
                break;
            }
            skipped += c.width().unwrap_or(0);
        }

        let rest = &buffer[start..];
        let mut used = 0;
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > inner_width {
                end = i;
                break;
            }
            used += w;
        }
        (&rest[..end], skipped)
    }

    /// Screen position of the cursor for the given render area.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let inner = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let (_, skipped) = self.visible(buffer, inner);
        let offset = self.column(buffer).saturating_sub(skipped).min(inner);
        (
            area.x + BORDER_OFFSET + offset as u16,
            area.y + BORDER_OFFSET,
        )
    }
}

/// Byte offset of the character boundary before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
