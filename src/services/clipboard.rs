//! System clipboard output
//!
//! Copies use two routes at once:
//! - OSC 52 escape sequences via crossterm (Kitty, Alacritty, WezTerm,
//!   iTerm2, tmux with `set-clipboard on`, remote SSH sessions)
//! - the arboard crate (X11/Wayland/macOS/Windows native clipboards)

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io::{stderr, Write};
use std::sync::Mutex;

/// Keeps the arboard handle alive for the process lifetime; on X11 the
/// clipboard owner has to exist to answer paste requests.
static SYSTEM_CLIPBOARD: Mutex<Option<arboard::Clipboard>> = Mutex::new(None);

/// How a copy went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// The OSC 52 sequence was written to the terminal
    pub osc52: bool,
    /// The native clipboard accepted the text
    pub native: bool,
}

impl CopyReport {
    /// Whether the text is known to be on a clipboard
    ///
    /// Only the native route reports success; OSC 52 is fire-and-forget.
    pub fn confirmed(&self) -> bool {
        self.native
    }
}

/// Copy `text` to the system clipboard.
///
/// Writing OSC 52 cannot be confirmed: the terminal may silently ignore it.
pub fn copy(text: &str) -> CopyReport {
    let osc52 = match execute!(stderr(), CopyToClipboard::to_clipboard_from(text)) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("OSC 52 clipboard copy failed: {}", e);
            false
        }
    };
    let _ = stderr().flush();

    let native = copy_native(text);
    tracing::debug!(
        "Copied {} bytes to clipboard (osc52: {}, native: {})",
        text.len(),
        osc52,
        native
    );

    CopyReport { osc52, native }
}

fn copy_native(text: &str) -> bool {
    let Ok(mut guard) = SYSTEM_CLIPBOARD.lock() else {
        return false;
    };

    if guard.is_none() {
        match arboard::Clipboard::new() {
            Ok(cb) => *guard = Some(cb),
            Err(e) => {
                tracing::debug!("arboard clipboard init failed: {}", e);
                return false;
            }
        }
    }

    let Some(clipboard) = guard.as_mut() else {
        return false;
    };
    if clipboard.set_text(text).is_ok() {
        return true;
    }

    // A stale connection can fail; retry once with a fresh handle
    tracing::debug!("arboard copy failed, recreating clipboard");
    match arboard::Clipboard::new() {
        Ok(mut cb) => {
            let ok = cb.set_text(text).is_ok();
            *guard = Some(cb);
            ok
        }
        Err(_) => false,
    }
}
