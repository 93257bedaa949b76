//! Terminal mode management
//!
//! Raw mode, the alternate screen and bracketed paste are switched on for the
//! interactive session. The screen is drawn on stderr so that stdout stays
//! free for the finished document. `TerminalModes` remembers which ones were enabled and
//! restores them on `undo()` or drop; `emergency_cleanup()` is for the panic
//! hook, where no instance is reachable.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{stderr, Write};

/// Tracks which terminal modes have been enabled and provides cleanup.
#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
    bracketed_paste: bool,
}

impl TerminalModes {
    /// Create a new TerminalModes with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable raw mode, the alternate screen and bracketed paste.
    ///
    /// On error, undoes any partially enabled modes.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::new();

        if let Err(e) = enable_raw_mode() {
            tracing::error!("Failed to enable raw mode: {}", e);
            return Err(e.into());
        }
        modes.raw_mode = true;
        tracing::debug!("Enabled raw mode");

        if let Err(e) = stderr().execute(EnterAlternateScreen) {
            tracing::error!("Failed to enter alternate screen: {}", e);
            modes.undo();
            return Err(e.into());
        }
        modes.alternate_screen = true;
        tracing::debug!("Entered alternate screen");

        // Non-fatal: pasting then arrives as individual key events
        if let Err(e) = stderr().execute(EnableBracketedPaste) {
            tracing::warn!("Failed to enable bracketed paste: {}", e);
        } else {
            modes.bracketed_paste = true;
            tracing::debug!("Enabled bracketed paste mode");
        }

        Ok(modes)
    }

    /// Restore the terminal by disabling every mode that was enabled.
    ///
    /// Safe to call multiple times.
    pub fn undo(&mut self) {
        if self.bracketed_paste {
            let _ = stderr().execute(DisableBracketedPaste);
            self.bracketed_paste = false;
            tracing::debug!("Disabled bracketed paste");
        }

        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
            tracing::debug!("Disabled raw mode");
        }

        // Leave alternate screen last
        if self.alternate_screen {
            let _ = stderr().execute(LeaveAlternateScreen);
            let _ = stderr().execute(Show);
            self.alternate_screen = false;
            tracing::debug!("Left alternate screen");
        }

        let _ = stderr().flush();
    }

    /// Returns true if raw mode is enabled.
    pub fn raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }

    /// Returns true if the alternate screen is active.
    pub fn alternate_screen_enabled(&self) -> bool {
        self.alternate_screen
    }

    /// Returns true if bracketed paste is enabled.
    pub fn bracketed_paste_enabled(&self) -> bool {
        self.bracketed_paste
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Unconditionally restore terminal state without tracking.
///
/// For panic hooks: disables every mode whether or not it was enabled.
pub fn emergency_cleanup() {
    let _ = stderr().execute(DisableBracketedPaste);
    let _ = disable_raw_mode();
    let _ = stderr().execute(LeaveAlternateScreen);
    let _ = stderr().execute(Show);
    let _ = stderr().flush();
}
