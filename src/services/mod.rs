//! Services and external integrations
//!
//! Everything that talks to the world outside the tree model: the
//! filesystem, change notifications, the terminal, the clipboard and logging.

pub mod clipboard;
pub mod fs;
pub mod terminal_modes;
pub mod tracing_setup;
pub mod watcher;
