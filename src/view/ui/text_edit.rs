//! Multiline text editing state for the request panel
//!
//! `TextEdit` keeps the text as lines plus a byte-offset cursor that always
//! sits on a char boundary. `value()` joins the lines with `\n`, so the text
//! comes back exactly as it was typed or pasted (carriage returns aside).

/// Multiline text editing state
#[derive(Debug, Clone)]
pub struct TextEdit {
    /// Lines of text
    pub lines: Vec<String>,
    /// Current cursor row (0-indexed)
    pub cursor_row: usize,
    /// Current cursor column (0-indexed, in bytes)
    pub cursor_col: usize,
}

impl Default for TextEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEdit {
    /// Create a new empty text edit
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    /// Create from initial text, with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        let mut edit = Self::new();
        edit.insert_str(text);
        edit
    }

    /// Get the full text value
    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether no text has been entered
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Get the current line
    pub fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor_row)
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Largest char boundary of the current line that is <= `col`
    fn clamp_col(&self, col: usize) -> usize {
        let line = self.current_line();
        let mut col = col.min(line.len());
        while col > 0 && !line.is_char_boundary(col) {
            col -= 1;
        }
        col
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    /// Move cursor left
    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col = self.clamp_col(self.cursor_col - 1);
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].len();
        }
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        let line = self.current_line();
        if self.cursor_col < line.len() {
            let mut new_col = self.cursor_col + 1;
            while new_col < line.len() && !line.is_char_boundary(new_col) {
                new_col += 1;
            }
            self.cursor_col = new_col;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    /// Move cursor up
    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.clamp_col(self.cursor_col);
        }
    }

    /// Move cursor down
    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.clamp_col(self.cursor_col);
        }
    }

    /// Move to start of line
    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    /// Move to end of line
    pub fn move_end(&mut self) {
        self.cursor_col = self.current_line().len();
    }

    // ========================================================================
    // Editing operations
    // ========================================================================

    /// Insert a character at cursor position
    pub fn insert_char(&mut self, c: char) {
        match c {
            '\r' => {}
            '\n' => {
                let tail = self.lines[self.cursor_row].split_off(self.cursor_col);
                self.lines.insert(self.cursor_row + 1, tail);
                self.cursor_row += 1;
                self.cursor_col = 0;
            }
            _ => {
                self.lines[self.cursor_row].insert(self.cursor_col, c);
                self.cursor_col += c.len_utf8();
            }
        }
    }

    /// Insert a string at cursor position
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let del_start = self.clamp_col(self.cursor_col - 1);
            self.lines[self.cursor_row].drain(del_start..self.cursor_col);
            self.cursor_col = del_start;
        } else if self.cursor_row > 0 {
            // Join with previous line
            let current_line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].len();
            self.lines[self.cursor_row].push_str(&current_line);
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete(&mut self) {
        let line = self.current_line();
        if self.cursor_col < line.len() {
            let mut del_end = self.cursor_col + 1;
            while del_end < line.len() && !line.is_char_boundary(del_end) {
                del_end += 1;
            }
            self.lines[self.cursor_row].drain(self.cursor_col..del_end);
        } else if self.cursor_row + 1 < self.lines.len() {
            // Join with next line
            let next_line = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next_line);
        }
    }

    /// Clear all text
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_basic() {
        let mut edit = TextEdit::new();
        edit.insert_str("hello\nworld");
        assert_eq!(edit.value(), "hello\nworld");
        assert_eq!(edit.line_count(), 2);
        assert_eq!(edit.cursor_row, 1);
        assert_eq!(edit.cursor_col, 5);
    }

    #[test]
    fn test_trailing_newline_is_kept() {
        let edit = TextEdit::with_text("first\n");
        assert_eq!(edit.value(), "first\n");
        assert_eq!(edit.line_count(), 2);
    }

    #[test]
    fn test_carriage_returns_are_dropped() {
        let edit = TextEdit::with_text("a\r\nb");
        assert_eq!(edit.value(), "a\nb");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut edit = TextEdit::with_text("ab\ncd");
        edit.move_home();
        edit.backspace();
        assert_eq!(edit.value(), "abcd");
        assert_eq!(edit.cursor_row, 0);
        assert_eq!(edit.cursor_col, 2);
    }

    #[test]
    fn test_delete_joins_lines() {
        let mut edit = TextEdit::with_text("ab\ncd");
        edit.move_up();
        edit.move_end();
        edit.delete();
        assert_eq!(edit.value(), "abcd");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut edit = TextEdit::with_text("héllo");
        edit.move_home();
        edit.move_right();
        edit.move_right();
        assert_eq!(edit.cursor_col, 3);
        edit.backspace();
        assert_eq!(edit.value(), "hllo");
        edit.insert_char('ü');
        assert_eq!(edit.value(), "hüllo");
    }

    #[test]
    fn test_vertical_move_lands_on_char_boundary() {
        let mut edit = TextEdit::with_text("ab\néé");
        edit.move_end();
        edit.move_up();
        assert_eq!(edit.cursor_col, 2);
        edit.move_down();
        assert_eq!(edit.cursor_col, 2);
        assert!(edit.current_line().is_char_boundary(edit.cursor_col));
    }

    #[test]
    fn test_left_right_cross_lines() {
        let mut edit = TextEdit::with_text("a\nb");
        edit.move_home();
        edit.move_left();
        assert_eq!((edit.cursor_row, edit.cursor_col), (0, 1));
        edit.move_right();
        assert_eq!((edit.cursor_row, edit.cursor_col), (1, 0));
    }

    #[test]
    fn test_clear() {
        let mut edit = TextEdit::with_text("x\ny");
        assert!(!edit.is_empty());
        edit.clear();
        assert!(edit.is_empty());
        assert_eq!(edit.value(), "");
    }
}
