use super::Error;

/// Capacity a line's byte store starts with on its first allocation.
pub const LINE_INIT_CAPACITY: usize = 1024;

/// A single row of text: a growable byte store with no embedded newline.
///
/// Columns are byte offsets. Every mutator clamps an out-of-range column
/// to the nearest valid bound instead of failing; the only error a line
/// can produce is an allocation failure while growing.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// Byte store; `len()` is the line length, `capacity()` is managed
    /// by `grow` (doubling from `LINE_INIT_CAPACITY`)
    chars: Vec<u8>,
}

impl Line {
    /// Create an empty line with no allocation
    pub fn new() -> Self {
        Self { chars: Vec::new() }
    }

    /// Number of bytes in the line
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Currently allocated byte capacity
    pub fn capacity(&self) -> usize {
        self.chars.capacity()
    }

    /// The line's content
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Get the byte at a column, if there is one
    pub fn char_at(&self, col: usize) -> Option<u8> {
        self.chars.get(col).copied()
    }

    /// Guarantee room for `n` more bytes beyond the current length.
    ///
    /// Doubles the capacity starting from `LINE_INIT_CAPACITY` until the
    /// request fits, and reserves only when the computed capacity actually
    /// changed, so a request that already fits never reallocates.
    fn grow(&mut self, n: usize) -> Result<(), Error> {
        let mut new_capacity = self.chars.capacity();

        while new_capacity - self.chars.len() < n {
            if new_capacity == 0 {
                new_capacity = LINE_INIT_CAPACITY;
            } else {
                new_capacity *= 2;
            }
        }

        if new_capacity != self.chars.capacity() {
            self.chars
                .try_reserve_exact(new_capacity - self.chars.len())?;
        }

        Ok(())
    }

    /// Insert `text` at byte offset `col` and return the advanced column.
    ///
    /// A column past the end is clamped to the end. The suffix at
    /// `[col, len)` is shifted right to open a gap before the copy, so the
    /// move is overlap-safe.
    pub fn insert_text(&mut self, text: &[u8], mut col: usize) -> Result<usize, Error> {
        if col > self.chars.len() {
            col = self.chars.len();
        }

        self.grow(text.len())?;

        let old_len = self.chars.len();
        self.chars.resize(old_len + text.len(), 0);
        self.chars.copy_within(col..old_len, col + text.len());
        self.chars[col..col + text.len()].copy_from_slice(text);

        Ok(col + text.len())
    }

    /// Insert `text` at the end of the line
    pub fn append_text(&mut self, text: &[u8]) -> Result<(), Error> {
        self.insert_text(text, self.chars.len())?;
        Ok(())
    }

    /// Delete the byte immediately before `col` and return the new column.
    ///
    /// No-op on an empty line or at column 0.
    pub fn backspace(&mut self, mut col: usize) -> usize {
        if col > self.chars.len() {
            col = self.chars.len();
        }

        if !self.chars.is_empty() && col > 0 {
            self.chars.remove(col - 1);
            col -= 1;
        }

        col
    }

    /// Delete the byte at `col` (forward delete) and return the clamped
    /// column. No-op at or past the end of the line.
    pub fn delete(&mut self, mut col: usize) -> usize {
        if col > self.chars.len() {
            col = self.chars.len();
        }

        if col < self.chars.len() {
            self.chars.remove(col);
        }

        col
    }
}
