//! Multi-line text buffer with a cursor.
//!
//! Lines are stored as `Vec<char>` so cursor arithmetic works on
//! characters, never on byte offsets.

use unicode_width::UnicodeWidthChar;

/// Multi-line text buffer state.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Vec<char>>,
    /// Cursor row (line index).
    row: usize,
    /// Cursor column (character index within the line).
    col: usize,
    /// Column to return to when moving vertically through shorter lines.
    preferred_col: usize,
    /// First visible line.
    scroll: usize,
    /// Bumped on every content mutation.
    revision: u64,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            row: 0,
            col: 0,
            preferred_col: 0,
            scroll: 0,
            revision: 0,
        }
    }

    /// Create a buffer holding `text`, cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.lines = text.split('\n').map(|line| line.chars().collect()).collect();
        buffer.row = buffer.lines.len() - 1;
        buffer.col = buffer.lines[buffer.row].len();
        buffer.preferred_col = buffer.col;
        buffer
    }

    /// Full buffer content with `\n` line separators.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }

    /// Check if the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&[char]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    /// Cursor as `(row, col)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Display column of the cursor on its line.
    pub fn cursor_display_col(&self) -> usize {
        self.lines[self.row][..self.col]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.lines[self.row].insert(self.col, ch);
        self.col += 1;
        self.preferred_col = self.col;
        self.revision += 1;
    }

    /// Split the current line at the cursor.
    pub fn insert_newline(&mut self) {
        let rest = self.lines[self.row].split_off(self.col);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
        self.preferred_col = 0;
        self.revision += 1;
    }

    /// Delete the character before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            self.lines[self.row].remove(self.col);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].len();
            self.lines[self.row].extend(line);
        } else {
            return;
        }
        self.preferred_col = self.col;
        self.revision += 1;
    }

    /// Delete the character under the cursor, joining the next line at the end.
    pub fn delete(&mut self) {
        if self.col < self.lines[self.row].len() {
            self.lines[self.row].remove(self.col);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].extend(next);
        } else {
            return;
        }
        self.revision += 1;
    }

    /// Move cursor left, wrapping to the end of the previous line.
    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].len();
        }
        self.preferred_col = self.col;
    }

    /// Move cursor right, wrapping to the start of the next line.
    pub fn move_right(&mut self) {
        if self.col < self.lines[self.row].len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
        self.preferred_col = self.col;
    }

    pub fn move_up(&mut self) {
        self.move_rows_up(1);
    }

    pub fn move_down(&mut self) {
        self.move_rows_down(1);
    }

    /// Move cursor to start of line.
    pub fn move_home(&mut self) {
        self.col = 0;
        self.preferred_col = 0;
    }

    /// Move cursor to end of line.
    pub fn move_end(&mut self) {
        self.col = self.lines[self.row].len();
        self.preferred_col = self.col;
    }

    /// Move up by `rows` lines, keeping the preferred column where possible.
    pub fn move_rows_up(&mut self, rows: usize) {
        self.row = self.row.saturating_sub(rows);
        self.col = self.preferred_col.min(self.lines[self.row].len());
    }

    /// Move down by `rows` lines, keeping the preferred column where possible.
    pub fn move_rows_down(&mut self, rows: usize) {
        self.row = (self.row + rows).min(self.lines.len() - 1);
        self.col = self.preferred_col.min(self.lines[self.row].len());
    }

    /// Adjust the scroll offset so the cursor row is inside a viewport of
    /// `height` lines.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_text() {
        let mut buffer = TextBuffer::new();
        assert!(buffer.is_empty());

        for ch in "Hello".chars() {
            buffer.insert_char(ch);
        }
        assert_eq!(buffer.text(), "Hello");
        assert_eq!(buffer.cursor(), (0, 5));
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_newline_splits_line() {
        let mut buffer = TextBuffer::from_text("Hello world");
        for _ in 0..6 {
            buffer.move_left();
        }
        buffer.insert_newline();
        assert_eq!(buffer.text(), "Hello\n world");
        assert_eq!(buffer.cursor(), (1, 0));
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));

        let mut empty = TextBuffer::new();
        empty.backspace();
        assert!(empty.is_empty());
        assert_eq!(empty.revision(), 0);
    }

    #[test]
    fn test_delete_joins_next_line() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_up();
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_horizontal_movement_wraps_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_home();
        buffer.move_left();
        assert_eq!(buffer.cursor(), (0, 2));
        buffer.move_right();
        assert_eq!(buffer.cursor(), (1, 0));
    }

    #[test]
    fn test_vertical_movement_keeps_preferred_column() {
        let mut buffer = TextBuffer::from_text("long line\nab\nanother line");
        buffer.move_up();
        buffer.move_up();
        buffer.move_end();
        assert_eq!(buffer.cursor(), (0, 9));

        buffer.move_down();
        assert_eq!(buffer.cursor(), (1, 2));
        buffer.move_down();
        assert_eq!(buffer.cursor(), (2, 9));

        buffer.move_rows_down(10);
        assert_eq!(buffer.cursor().0, 2);
        buffer.move_rows_up(10);
        assert_eq!(buffer.cursor().0, 0);
    }

    #[test]
    fn test_revision_tracks_mutations_only() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('a');
        let after_insert = buffer.revision();
        buffer.move_left();
        buffer.move_right();
        assert_eq!(buffer.revision(), after_insert);
        buffer.backspace();
        assert!(buffer.revision() > after_insert);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let text = (1..=20).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let mut buffer = TextBuffer::from_text(&text);
        buffer.scroll_to_cursor(5);
        assert_eq!(buffer.scroll(), 15);

        buffer.move_rows_up(19);
        buffer.scroll_to_cursor(5);
        assert_eq!(buffer.scroll(), 0);
    }

    #[test]
    fn test_cursor_display_col_counts_wide_chars() {
        let buffer = TextBuffer::from_text("日本");
        assert_eq!(buffer.cursor(), (0, 2));
        assert_eq!(buffer.cursor_display_col(), 4);
    }
}
