//! LayoutVibe Application
//!
//! The application shell tying the interaction core, the renderer and
//! storage together, plus the command-line commands.

mod app;
pub mod cli;
mod shortcuts;

pub use app::{App, AppConfig, AppError, COORDS_PLACEHOLDER, Inspector};
pub use shortcuts::{Shortcut, ShortcutRegistry};
