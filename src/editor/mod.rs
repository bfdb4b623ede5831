mod cursor;
mod line;

pub use cursor::Cursor;
pub use line::{Line, LINE_INIT_CAPACITY};

use std::collections::TryReserveError;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Capacity the line sequence starts with on its first allocation.
pub const EDITOR_INIT_CAPACITY: usize = 128;

/// Chunk size used when streaming a file into the editor
const LOAD_CHUNK_SIZE: usize = 640 * 1024;

/// Errors the editor can produce. Out-of-range cursors are never errors;
/// they are clamped before use.
#[derive(Debug, Error)]
pub enum Error {
    #[error("out of memory while growing a buffer")]
    OutOfMemory(#[from] TryReserveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no file path set")]
    NoPath,
}

/// The whole in-memory document: an ordered, growable sequence of lines
/// plus a 2D cursor.
///
/// The cursor is public so the input layer can move it directly; every
/// mutating operation re-validates it lazily (clamping the row and
/// creating the first blank line on demand), so an out-of-range cursor
/// is never an error. After any mutating operation has run, the editor
/// holds at least one line.
#[derive(Debug, Default)]
pub struct Editor {
    /// Document lines, top to bottom
    lines: Vec<Line>,
    /// Current edit point
    pub cursor: Cursor,
    /// File path (None if unsaved new document)
    pub path: Option<PathBuf>,
    /// Whether the document has unsaved changes
    pub dirty: bool,
}

impl Editor {
    /// Create an empty editor with no lines and no allocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor from a file. A path that does not exist yet
    /// yields an empty editor bound to that path.
    pub fn from_file(path: PathBuf) -> Result<Self, Error> {
        let mut editor = Self::new();
        if path.exists() {
            editor.load_from_reader(File::open(&path)?)?;
        }
        editor.path = Some(path);
        Ok(editor)
    }

    /// Number of lines in the document
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a specific line (0-indexed)
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Length in bytes of a specific line (0 for a row past the end)
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(Line::len).unwrap_or(0)
    }

    /// All lines, in display order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The display name for the document
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    /// Guarantee room for `n` more line slots, doubling the capacity from
    /// `EDITOR_INIT_CAPACITY` and reserving only when the computed
    /// capacity actually changed.
    fn grow(&mut self, n: usize) -> Result<(), Error> {
        let mut new_capacity = self.lines.capacity();

        while new_capacity - self.lines.len() < n {
            if new_capacity == 0 {
                new_capacity = EDITOR_INIT_CAPACITY;
            } else {
                new_capacity *= 2;
            }
        }

        if new_capacity != self.lines.capacity() {
            self.lines
                .try_reserve_exact(new_capacity - self.lines.len())?;
        }

        Ok(())
    }

    /// Normalize state before a mutating cursor operation: snap the
    /// cursor row back onto the last line when it is past the end, or
    /// create the single initial blank line when the editor is empty.
    fn ensure_cursor_line(&mut self) -> Result<(), Error> {
        if self.cursor.row >= self.lines.len() {
            if !self.lines.is_empty() {
                self.cursor.row = self.lines.len() - 1;
            } else {
                self.grow(1)?;
                self.lines.push(Line::new());
            }
        }
        Ok(())
    }

    /// Insert a blank line directly after the cursor row and move the
    /// cursor onto it.
    ///
    /// A cursor row past the end is clamped to appending at the end.
    /// Text after the cursor stays on the current line; the new line is
    /// always blank.
    pub fn insert_newline(&mut self) -> Result<(), Error> {
        if self.cursor.row > self.lines.len() {
            self.cursor.row = self.lines.len();
        }

        self.grow(1)?;

        let at = (self.cursor.row + 1).min(self.lines.len());
        self.lines.insert(at, Line::new());
        self.cursor.row = at;
        self.cursor.col = 0;
        self.dirty = true;

        Ok(())
    }

    /// Insert text at the cursor; the cursor column advances past it
    pub fn insert_text(&mut self, text: &[u8]) -> Result<(), Error> {
        self.ensure_cursor_line()?;
        self.cursor.col = self.lines[self.cursor.row].insert_text(text, self.cursor.col)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete the byte before the cursor on the cursor line
    pub fn backspace(&mut self) -> Result<(), Error> {
        self.ensure_cursor_line()?;
        self.cursor.col = self.lines[self.cursor.row].backspace(self.cursor.col);
        self.dirty = true;
        Ok(())
    }

    /// Delete the byte under the cursor on the cursor line
    pub fn delete(&mut self) -> Result<(), Error> {
        self.ensure_cursor_line()?;
        self.cursor.col = self.lines[self.cursor.row].delete(self.cursor.col);
        self.dirty = true;
        Ok(())
    }

    /// The byte under the cursor, if the cursor addresses one
    pub fn char_under_cursor(&self) -> Option<u8> {
        self.lines.get(self.cursor.row)?.char_at(self.cursor.col)
    }

    /// Write each line's bytes followed by a newline, in line order
    pub fn save_to_writer<W: Write>(&self, mut w: W) -> Result<(), Error> {
        for line in &self.lines {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Save the document to a path and clear the dirty flag
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        self.save_to_writer(&mut w)?;
        w.flush()?;
        self.dirty = false;
        Ok(())
    }

    /// Save the document to its own path
    pub fn save(&mut self) -> Result<(), Error> {
        let path = self.path.clone().ok_or(Error::NoPath)?;
        self.save_to_file(path)
    }

    /// Stream a file into the editor, one in-memory line per `\n`-delimited
    /// segment. A trailing segment with no newline becomes the last line;
    /// an empty stream leaves a single empty line. The cursor is reset to
    /// row 0 afterwards.
    ///
    /// Precondition: the editor holds no lines yet.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<(), Error> {
        assert!(
            self.lines.is_empty(),
            "can only load into an empty editor"
        );

        self.ensure_cursor_line()?;

        let mut chunk = vec![0u8; LOAD_CHUNK_SIZE];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }

            // split the chunk on newlines; a partial tail carries over to
            // the next read by staying on the last line
            let mut rest = &chunk[..n];
            while !rest.is_empty() {
                let last = self.lines.len() - 1;
                match rest.iter().position(|&b| b == b'\n') {
                    Some(at) => {
                        self.lines[last].append_text(&rest[..at])?;
                        self.grow(1)?;
                        self.lines.push(Line::new());
                        rest = &rest[at + 1..];
                    }
                    None => {
                        self.lines[last].append_text(rest)?;
                        rest = &[];
                    }
                }
            }
        }

        self.cursor.row = 0;
        Ok(())
    }

    /// Load a file into an empty editor (see `load_from_reader`)
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.load_from_reader(File::open(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    /// A reader that hands out at most `step` bytes per read, to exercise
    /// newline handling across chunk boundaries.
    struct Chopped<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Chopped<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(self.data.len()).min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn contents(editor: &Editor) -> Vec<&[u8]> {
        editor.lines().iter().map(|l| l.as_bytes()).collect()
    }

    #[test]
    fn new_editor_is_empty() {
        let editor = Editor::new();
        assert_eq!(editor.line_count(), 0);
        assert_eq!(editor.cursor, Cursor::default());
        assert!(!editor.dirty);
    }

    #[test]
    fn first_mutation_creates_initial_line() {
        let mut editor = Editor::new();
        editor.backspace().unwrap();
        assert_eq!(editor.line_count(), 1);
        assert!(editor.line(0).unwrap().is_empty());
        assert_eq!(editor.cursor, Cursor::new(0, 0));
    }

    #[test]
    fn insert_advances_cursor_column() {
        let mut editor = Editor::new();
        editor.insert_text(b"hello").unwrap();
        assert_eq!(contents(&editor), [b"hello".as_slice()]);
        assert_eq!(editor.cursor, Cursor::new(0, 5));
        assert!(editor.dirty);
    }

    #[test]
    fn insert_newline_does_not_split_line() {
        // pressing enter mid-line opens a blank line below and leaves the
        // tail of the current line where it was
        let mut editor = Editor::new();
        editor.insert_text(b"hello").unwrap();
        editor.cursor.col = 2;

        editor.insert_newline().unwrap();

        assert_eq!(editor.line_count(), 2);
        assert_eq!(contents(&editor), [b"hello".as_slice(), b"".as_slice()]);
        assert_eq!(editor.cursor, Cursor::new(1, 0));
    }

    #[test]
    fn insert_newline_past_end_appends() {
        let mut editor = Editor::new();
        editor.insert_text(b"one").unwrap();
        editor.cursor.row = 99;

        editor.insert_newline().unwrap();

        assert_eq!(editor.line_count(), 2);
        assert_eq!(contents(&editor), [b"one".as_slice(), b"".as_slice()]);
        assert_eq!(editor.cursor.col, 0);
    }

    #[test]
    fn mutation_with_cursor_past_last_line_snaps_to_it() {
        let mut editor = Editor::new();
        editor.insert_text(b"abc").unwrap();
        editor.cursor.set(5, 0);

        editor.insert_text(b"x").unwrap();

        assert_eq!(editor.cursor.row, 0);
        assert_eq!(contents(&editor), [b"xabc".as_slice()]);
    }

    #[test]
    fn hello_world_scenario() {
        let mut editor = Editor::new();
        editor.insert_text(b"hello").unwrap();
        assert_eq!(editor.cursor, Cursor::new(0, 5));

        editor.insert_newline().unwrap();
        assert_eq!(editor.line_count(), 2);
        assert_eq!(editor.cursor, Cursor::new(1, 0));
        assert_eq!(editor.line(0).unwrap().as_bytes(), b"hello");
        assert!(editor.line(1).unwrap().is_empty());

        editor.insert_text(b"world").unwrap();
        assert_eq!(editor.line(1).unwrap().as_bytes(), b"world");

        let mut saved = Vec::new();
        editor.save_to_writer(&mut saved).unwrap();
        assert_eq!(saved, b"hello\nworld\n");

        let mut reloaded = Editor::new();
        reloaded.load_from_reader(IoCursor::new(saved)).unwrap();
        assert_eq!(
            contents(&reloaded),
            [b"hello".as_slice(), b"world".as_slice(), b"".as_slice()]
        );
    }

    #[test]
    fn delete_then_backspace_scenario() {
        let mut editor = Editor::new();
        editor.insert_text(b"abc").unwrap();
        editor.cursor.col = 1;

        editor.delete().unwrap();
        assert_eq!(contents(&editor), [b"ac".as_slice()]);
        assert_eq!(editor.cursor.col, 1);

        editor.backspace().unwrap();
        assert_eq!(contents(&editor), [b"c".as_slice()]);
        assert_eq!(editor.cursor.col, 0);
    }

    #[test]
    fn char_under_cursor_bounds() {
        let mut editor = Editor::new();
        editor.insert_text(b"ab").unwrap();

        editor.cursor.set(0, 0);
        assert_eq!(editor.char_under_cursor(), Some(b'a'));

        editor.cursor.set(0, 2);
        assert_eq!(editor.char_under_cursor(), None);

        editor.cursor.set(1, 0);
        assert_eq!(editor.char_under_cursor(), None);
    }

    #[test]
    fn load_empty_stream_leaves_single_empty_line() {
        let mut editor = Editor::new();
        editor.load_from_reader(IoCursor::new(Vec::new())).unwrap();
        assert_eq!(contents(&editor), [b"".as_slice()]);
        assert_eq!(editor.cursor.row, 0);
    }

    #[test]
    fn load_single_newline_gives_two_empty_lines() {
        let mut editor = Editor::new();
        editor.load_from_reader(IoCursor::new(b"\n".to_vec())).unwrap();
        assert_eq!(contents(&editor), [b"".as_slice(), b"".as_slice()]);
    }

    #[test]
    fn load_without_trailing_newline_keeps_last_segment() {
        let mut editor = Editor::new();
        editor
            .load_from_reader(IoCursor::new(b"one\ntwo".to_vec()))
            .unwrap();
        assert_eq!(contents(&editor), [b"one".as_slice(), b"two".as_slice()]);
    }

    #[test]
    fn load_handles_newline_at_chunk_boundary() {
        // every read returns a single byte, so each newline lands exactly
        // on a chunk boundary
        let mut editor = Editor::new();
        editor
            .load_from_reader(Chopped {
                data: b"ab\ncd\n",
                step: 1,
            })
            .unwrap();
        assert_eq!(
            contents(&editor),
            [b"ab".as_slice(), b"cd".as_slice(), b"".as_slice()]
        );
        assert_eq!(editor.cursor.row, 0);
    }

    #[test]
    fn load_reassembles_segments_split_across_chunks() {
        let mut editor = Editor::new();
        editor
            .load_from_reader(Chopped {
                data: b"hello\nworld",
                step: 4,
            })
            .unwrap();
        assert_eq!(contents(&editor), [b"hello".as_slice(), b"world".as_slice()]);
    }

    #[test]
    #[should_panic(expected = "empty editor")]
    fn load_into_non_empty_editor_panics() {
        let mut editor = Editor::new();
        editor.insert_text(b"x").unwrap();
        let _ = editor.load_from_reader(IoCursor::new(b"y".to_vec()));
    }

    #[test]
    fn save_load_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");

        let mut editor = Editor::new();
        editor.insert_text(b"alpha").unwrap();
        editor.insert_newline().unwrap();
        editor.insert_text(b"beta").unwrap();
        editor.insert_newline().unwrap();
        editor.insert_text(b"gamma").unwrap();

        editor.save_to_file(&path).unwrap();
        assert!(!editor.dirty);

        let reloaded = Editor::from_file(path).unwrap();
        assert_eq!(reloaded.line_count(), editor.line_count() + 1);
        for (row, line) in editor.lines().iter().enumerate() {
            assert_eq!(reloaded.line(row).unwrap().as_bytes(), line.as_bytes());
        }
        assert!(reloaded.line(editor.line_count()).unwrap().is_empty());
        assert_eq!(reloaded.cursor.row, 0);
        assert!(!reloaded.dirty);
    }

    #[test]
    fn from_file_with_missing_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let editor = Editor::from_file(dir.path().join("new.txt")).unwrap();
        assert_eq!(editor.line_count(), 0);
        assert_eq!(editor.display_name(), "new.txt");
    }

    #[test]
    fn save_without_path_fails() {
        let mut editor = Editor::new();
        editor.insert_text(b"x").unwrap();
        assert!(matches!(editor.save(), Err(Error::NoPath)));
    }

    #[test]
    fn line_sequence_growth_is_doubling() {
        let mut editor = Editor::new();
        editor.insert_text(b"first").unwrap();
        assert_eq!(editor.lines.capacity(), EDITOR_INIT_CAPACITY);

        for _ in 0..EDITOR_INIT_CAPACITY {
            editor.insert_newline().unwrap();
        }
        assert_eq!(editor.line_count(), EDITOR_INIT_CAPACITY + 1);
        assert_eq!(editor.lines.capacity(), EDITOR_INIT_CAPACITY * 2);
    }
}
