use serde::Serialize;

pub const SAVED_NOTICE: &str = "[ Wrote lines to disk ]";
pub const SAVE_FAILED_NOTICE: &str = "[ Error writing file ]";

/// What the renderer needs while the editor is up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSnapshot {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub text: String,
    #[serde(rename = "transientMessage")]
    pub message: Option<String>,
}

/// Buffer for one file opened with `nano`. Lives only while the editor is
/// open; nothing reaches the filesystem until the terminal saves it.
pub struct EditorBuffer {
    file_name: String,
    target: Vec<String>,
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    saved: String,
    clipboard: Vec<String>,
    notice: Option<String>,
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

impl EditorBuffer {
    /// Open a buffer over `content`, cursor at the top
    pub fn new(file_name: &str, target: Vec<String>, content: &str) -> Self {
        EditorBuffer {
            file_name: file_name.to_string(),
            target,
            lines: split_lines(content),
            cursor_row: 0,
            cursor_col: 0,
            saved: content.to_string(),
            clipboard: Vec::new(),
            notice: None,
        }
    }

    /// The name as typed after `nano`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Resolved path the buffer saves to
    pub fn target(&self) -> &[String] {
        &self.target
    }

    /// Get full content as string
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the whole buffer, as a textarea would. The cursor is clamped.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
    }

    /// Check if the text differs from the last save
    pub fn is_dirty(&self) -> bool {
        self.text() != self.saved
    }

    /// Mark as saved
    pub fn mark_saved(&mut self, text: String) {
        self.saved = text;
    }

    /// Get the transient header notice
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Show a notice in the header
    pub fn set_notice(&mut self, msg: &str) {
        self.notice = Some(msg.to_string());
    }

    /// Drop the header notice
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Header status: the pending notice, else "Modified".
    pub fn status(&self) -> &str {
        self.notice.as_deref().unwrap_or("Modified")
    }

    /// Copy out what the renderer shows
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            file_name: self.file_name.clone(),
            text: self.text(),
            message: self.notice.clone(),
        }
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a specific line
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Get cursor (row, column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn byte_at(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    /// Move cursor up
    pub fn cursor_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
        }
    }

    /// Move cursor down
    pub fn cursor_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
        }
    }

    /// Move cursor left, wrapping to the previous line
    pub fn cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_len(self.cursor_row);
        }
    }

    /// Move cursor right, wrapping to the next line
    pub fn cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    /// Move cursor to start of line
    pub fn cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    /// Move cursor to end of line
    pub fn cursor_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_row);
    }

    /// Insert a character at cursor position
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_at(line, self.cursor_col);
        line.insert(at, c);
        self.cursor_col += 1;
    }

    /// Insert a string at cursor position
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    /// Insert newline at cursor
    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_at(line, self.cursor_col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_at(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_len(self.cursor_row);
            self.lines[self.cursor_row].push_str(&current);
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_row) {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_at(line, self.cursor_col);
            line.remove(at);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        }
    }

    /// ^K
    pub fn cut_line(&mut self) {
        if self.lines.len() > 1 {
            let cut = self.lines.remove(self.cursor_row);
            self.clipboard = vec![cut];
            self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        } else {
            self.clipboard = vec![std::mem::take(&mut self.lines[0])];
        }
        self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
    }

    /// ^U
    pub fn paste(&mut self) {
        for line in self.clipboard.clone() {
            self.insert_str(&line);
            self.insert_newline();
        }
    }
}
