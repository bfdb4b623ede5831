pub mod config;
pub mod editor;
pub mod terminal;

pub use config::{load_config, Settings};
pub use editor::{Cursor, Editor, Line};
pub use terminal::Terminal;
