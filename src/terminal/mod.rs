use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Stdout, Write};

use crate::config::Settings;
use crate::editor::{Editor, Line};

/// Terminal handler responsible for rendering and input
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> anyhow::Result<Self> {
        let mut stdout = io::stdout();

        // Enter raw mode and alternate screen; the cursor is drawn as a
        // reverse-video cell, so the hardware cursor stays hidden
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(Self { stdout })
    }

    /// Get terminal size
    pub fn size() -> anyhow::Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Render the editor state to the terminal
    pub fn render(&mut self, editor: &Editor, settings: &Settings) -> anyhow::Result<()> {
        execute!(self.stdout, cursor::MoveTo(0, 0))?;

        let (term_width, term_height) = terminal::size()?;
        let width = term_width as usize;
        let status_rows = usize::from(settings.editor.status_line);
        let text_rows = (term_height as usize).saturating_sub(status_rows).max(1);

        // an empty editor still shows one (virtual) blank line so the
        // cursor cell has somewhere to sit
        let line_count = editor.line_count().max(1);
        let line_num_width = if settings.editor.line_numbers {
            line_count.to_string().len().max(3)
        } else {
            0
        };

        for row in 0..text_rows {
            if row < line_count {
                if settings.editor.line_numbers {
                    let is_cursor_row = row == editor.cursor.row.min(line_count - 1);
                    if is_cursor_row {
                        execute!(self.stdout, SetForegroundColor(Color::Yellow))?;
                    } else {
                        execute!(self.stdout, SetForegroundColor(Color::DarkGrey))?;
                    }
                    print!("{:>width$} ", row + 1, width = line_num_width);
                    execute!(self.stdout, ResetColor)?;
                }

                let effective_width = width.saturating_sub(line_num_width + 1);
                self.render_line(editor, row, effective_width)?;
            } else {
                // empty line indicator
                execute!(self.stdout, SetForegroundColor(Color::Blue))?;
                if settings.editor.line_numbers {
                    print!("{:>width$} ~", "", width = line_num_width);
                } else {
                    print!("~");
                }
                execute!(self.stdout, ResetColor)?;
            }

            execute!(self.stdout, terminal::Clear(ClearType::UntilNewLine))?;
            if row < text_rows - 1 {
                print!("\r\n");
            }
        }

        if settings.editor.status_line {
            self.render_status_line(editor, width)?;
        }

        self.stdout.flush()?;
        Ok(())
    }

    /// Render one line of content, overlaying the cursor cell in reverse
    /// video on the cursor row (with the character under the cursor, if
    /// there is one)
    fn render_line(&mut self, editor: &Editor, row: usize, width: usize) -> anyhow::Result<()> {
        let bytes = editor.line(row).map(Line::as_bytes).unwrap_or(b"");

        if row != editor.cursor.row {
            print!("{}", truncated(bytes, width));
            return Ok(());
        }

        let col = editor.cursor.col.min(bytes.len()).min(width.saturating_sub(1));
        print!("{}", truncated(&bytes[..col.min(bytes.len())], width));

        execute!(
            self.stdout,
            SetBackgroundColor(Color::White),
            SetForegroundColor(Color::Black)
        )?;
        match editor.char_under_cursor() {
            Some(c) => print!("{}", char::from(c)),
            None => print!(" "),
        }
        execute!(self.stdout, ResetColor)?;

        if col < bytes.len() {
            let rest = &bytes[col + 1..];
            print!("{}", truncated(rest, width.saturating_sub(col + 1)));
        }

        Ok(())
    }

    fn render_status_line(&mut self, editor: &Editor, width: usize) -> anyhow::Result<()> {
        print!("\r\n");

        let modified = if editor.dirty { " [+]" } else { "" };
        let left = format!(" {}{} ", editor.display_name(), modified);
        let right = format!(" {}:{} ", editor.cursor.row + 1, editor.cursor.col + 1);
        let padding = width.saturating_sub(left.len() + right.len());

        execute!(
            self.stdout,
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(Color::White)
        )?;
        print!("{}{:padding$}{}", left, "", right, padding = padding);
        execute!(self.stdout, ResetColor)?;

        Ok(())
    }

    /// Read a key event (blocking)
    pub fn read_key(&self) -> anyhow::Result<KeyEvent> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                return Ok(key_event);
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Lossy-decode at most `width` bytes of a line for display
fn truncated(bytes: &[u8], width: usize) -> String {
    String::from_utf8_lossy(&bytes[..bytes.len().min(width)]).into_owned()
}

/// Handle a key event and update editor state. Returns true when the
/// user asked to quit.
pub fn handle_key(
    editor: &mut Editor,
    key: KeyEvent,
    settings: &Settings,
) -> anyhow::Result<bool> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Ok(true),

        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            if editor.path.is_some() {
                editor.save()?;
            }
        }

        (KeyModifiers::NONE, KeyCode::Backspace) => {
            editor.backspace()?;
        }

        (KeyModifiers::NONE, KeyCode::Delete) => {
            editor.delete()?;
        }

        (KeyModifiers::NONE, KeyCode::Enter) => {
            editor.insert_newline()?;
        }

        (KeyModifiers::NONE, KeyCode::Tab) => {
            let spaces = " ".repeat(settings.editor.tab_width);
            editor.insert_text(spaces.as_bytes())?;
        }

        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let mut buf = [0u8; 4];
            editor.insert_text(c.encode_utf8(&mut buf).as_bytes())?;
        }

        // navigation clamps against the buffer here; the core only
        // re-validates the cursor on the next mutating call
        (_, KeyCode::Left) => {
            editor.cursor.move_left();
        }
        (_, KeyCode::Right) => {
            if editor.cursor.col < editor.line_len(editor.cursor.row) {
                editor.cursor.move_right();
            }
        }
        (_, KeyCode::Up) => {
            editor.cursor.move_up();
            clamp_col(editor);
        }
        (_, KeyCode::Down) => {
            if editor.cursor.row + 1 < editor.line_count() {
                editor.cursor.move_down();
                clamp_col(editor);
            }
        }
        (_, KeyCode::Home) => {
            editor.cursor.move_to_line_start();
        }
        (_, KeyCode::End) => {
            editor.cursor.col = editor.line_len(editor.cursor.row);
        }

        _ => {}
    }

    Ok(false)
}

/// Clamp the cursor column to the current line length
fn clamp_col(editor: &mut Editor) {
    let line_len = editor.line_len(editor.cursor.row);
    if editor.cursor.col > line_len {
        editor.cursor.col = line_len;
    }
}
