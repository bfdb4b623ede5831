/// Cursor position in the editor (0-indexed; the column is a byte offset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Row index into the editor's lines
    pub row: usize,
    /// Byte offset into the line at `row`
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Move up one row
    pub fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Move down one row (caller should clamp to the line count)
    pub fn move_down(&mut self) {
        self.row = self.row.saturating_add(1);
    }

    /// Move left one byte
    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    /// Move right one byte (caller should clamp to the line length)
    pub fn move_right(&mut self) {
        self.col = self.col.saturating_add(1);
    }

    /// Set cursor to start of line
    pub fn move_to_line_start(&mut self) {
        self.col = 0;
    }

    /// Set cursor to a specific position
    pub fn set(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }
}
