//! Single-line text input with a byte cursor kept on char boundaries.
//!
//! Shared by the wizard fields and the search box.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};

use crate::tui::theme;

#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and park the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map_or(self.content.len(), |(i, _)| self.cursor + i)
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    /// Apply an editing key. Returns `true` if the text or cursor changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.insert_char(c),
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (_, KeyCode::Left) => self.cursor = self.prev_boundary(),
            (_, KeyCode::Right) => self.cursor = self.next_boundary(),
            (_, KeyCode::Home) => self.cursor = 0,
            (_, KeyCode::End) => self.cursor = self.content.len(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.clear(),
            _ => return false,
        }
        true
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }

    /// Render with a block cursor when focused.
    pub fn line(&self, focused: bool) -> Line<'_> {
        if !focused {
            return Line::raw(self.content.as_str());
        }
        let (before, after) = self.content.split_at(self.cursor);
        let mut rest = after.chars();
        let under = rest.next().map_or_else(|| " ".to_string(), String::from);
        Line::from(vec![
            Span::raw(before),
            Span::styled(under, theme::highlight()),
            Span::raw(rest.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut buf = InputBuffer::new();
        for c in "edu".chars() {
            buf.handle_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(buf.text(), "edu");
        buf.handle_key(&key(KeyCode::Backspace));
        assert_eq!(buf.text(), "ed");
        assert_eq!(buf.cursor_column(), 2);
    }

    #[test]
    fn test_multibyte_cursor_movement() {
        let mut buf = InputBuffer::new();
        buf.set_text("café");
        buf.handle_key(&key(KeyCode::Left));
        assert_eq!(buf.cursor_column(), 3);
        buf.handle_key(&key(KeyCode::Delete));
        assert_eq!(buf.text(), "caf");
        buf.handle_key(&key(KeyCode::Home));
        buf.insert_char('¡');
        assert_eq!(buf.text(), "¡caf");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut buf = InputBuffer::new();
        buf.set_text("flood relief");
        assert!(buf.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert!(buf.is_blank());
    }

    #[test]
    fn test_unhandled_keys_report_false() {
        let mut buf = InputBuffer::new();
        assert!(!buf.handle_key(&key(KeyCode::Enter)));
        assert!(!buf.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
    }
}
