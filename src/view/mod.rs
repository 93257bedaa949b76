//! View and UI layer
//!
//! The file tree model with its navigation state, and the ratatui renderers.

pub mod file_tree;
pub mod ui;
