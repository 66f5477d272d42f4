use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Single-line text field with a cursor that moves by grapheme cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct InputLine {
    text: String,
    /// Byte offset, always on a grapheme boundary.
    cursor: usize,
}

impl InputLine {
    /// Field holding `text` with the cursor at the end.
    pub(super) fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub(super) fn text(&self) -> &str {
        &self.text
    }

    pub(super) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text before the cursor, the grapheme under it, and the rest.
    pub(super) fn split_at_cursor(&self) -> (&str, Option<&str>, &str) {
        let (before, rest) = self.text.split_at(self.cursor);
        match rest.graphemes(true).next() {
            Some(current) => (before, Some(current), &rest[current.len()..]),
            None => (before, None, rest),
        }
    }

    /// Apply an editing key. Returns `true` when the text changed.
    pub(super) fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                self.insert(ch);
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                false
            }
            _ => false,
        }
    }

    fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        // a combining mark may have merged into the previous cluster
        self.cursor = self.snap_to_boundary(self.cursor);
    }

    fn backspace(&mut self) -> bool {
        let Some(start) = self.prev_boundary() else {
            return false;
        };
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    fn delete(&mut self) -> bool {
        let Some(end) = self.next_boundary() else {
            return false;
        };
        self.text.replace_range(self.cursor..end, "");
        true
    }

    fn move_left(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.cursor = start;
        }
    }

    fn move_right(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.cursor = end;
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(idx, _)| idx)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.cursor + grapheme.len())
    }

    fn snap_to_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(idx, grapheme)| idx + grapheme.len())
            .find(|&end| end >= offset)
            .unwrap_or(self.text.len())
    }
}
