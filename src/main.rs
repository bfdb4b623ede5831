use std::env;
use std::path::PathBuf;

use ted::terminal::handle_key;
use ted::{load_config, Editor, Terminal};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = load_config();

    // Open file from command line argument if provided
    let mut editor = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => Editor::from_file(path)?,
        None => Editor::new(),
    };

    // Initialize terminal
    let mut terminal = Terminal::new()?;

    // Main event loop
    loop {
        terminal.render(&editor, &settings)?;

        let key = terminal.read_key()?;
        if handle_key(&mut editor, key, &settings)? {
            break;
        }
    }

    Ok(())
}
