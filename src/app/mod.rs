//! Interactive session
//!
//! `Session` owns everything one run of the picker works on: the tree view,
//! the request editor, which panel has focus, the status line and the watch
//! registry. Each terminal or filesystem event goes through `handle()`, which
//! applies it and tells the caller whether to keep going.

pub mod change_router;

use crate::artifact::{render_artifact, Artifact};
use crate::config::Config;
use crate::services::fs::FsBackend;
use crate::services::watcher::{ChangeEvent, WatchMessage, WatchRegistry};
use crate::view::file_tree::{FileTree, FileTreeView};
use crate::view::ui::text_edit::TextEdit;
use change_router::{route_change, RouteOutcome};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::Path;
use std::sync::Arc;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    BrowsingTree,
    EditingRequest,
    ConfirmingSubmit,
}

impl Focus {
    /// The focus `Tab` moves to
    pub fn next(self) -> Self {
        match self {
            Focus::BrowsingTree => Focus::EditingRequest,
            Focus::EditingRequest => Focus::ConfirmingSubmit,
            Focus::ConfirmingSubmit => Focus::BrowsingTree,
        }
    }
}

/// Input to the session
#[derive(Debug)]
pub enum SessionEvent {
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    Resize(u16, u16),
    FsChange(ChangeEvent),
    WatchError(String),
}

impl From<WatchMessage> for SessionEvent {
    fn from(msg: WatchMessage) -> Self {
        match msg {
            WatchMessage::Change(change) => SessionEvent::FsChange(change),
            WatchMessage::Error(e) => SessionEvent::WatchError(e),
        }
    }
}

/// What the caller should do after an event
#[derive(Debug)]
pub enum Outcome {
    Continue,
    Quit,
    Submit(Artifact),
}

/// One interactive picking session
pub struct Session<W: WatchRegistry> {
    view: FileTreeView,
    request: TextEdit,
    focus: Focus,
    watcher: W,
    config: Config,
    status_message: Option<String>,
}

impl<W: WatchRegistry> std::fmt::Debug for Session<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("view", &self.view)
            .field("request", &self.request)
            .field("focus", &self.focus)
            .field("status_message", &self.status_message)
            .finish()
    }
}

impl<W: WatchRegistry> Session<W> {
    /// Start a session on `root_path`
    ///
    /// The root is registered with the watcher and listed right away. Either
    /// failing leaves the session usable; the problem is shown on the status
    /// line.
    pub fn new(
        root_path: impl AsRef<Path>,
        backend: Arc<dyn FsBackend>,
        mut watcher: W,
        config: Config,
    ) -> Self {
        let mut tree = FileTree::new(root_path, backend)
            .with_preserve_state_on_reload(config.file_tree.preserve_state_on_reload);
        let mut status_message = None;

        let root_path = tree.root_path().to_path_buf();
        if let Err(e) = watcher.watch(&root_path) {
            tracing::warn!("Cannot watch {:?}: {}", root_path, e);
            status_message = Some(format!("Not watching {}: {}", root_path.display(), e));
        }

        let root_id = tree.root_id();
        match tree.load(root_id, &mut watcher) {
            Ok(report) => tracing::info!("Opened {:?} ({} entries)", root_path, report.added),
            Err(e) => {
                tracing::error!("Cannot read {:?}: {}", root_path, e);
                status_message = Some(format!("Cannot read {}: {}", root_path.display(), e));
            }
        }

        let view = FileTreeView::new(tree).with_wrap_navigation(config.file_tree.wrap_navigation);

        Self {
            view,
            request: TextEdit::new(),
            focus: Focus::BrowsingTree,
            watcher,
            config,
            status_message,
        }
    }

    pub fn view(&self) -> &FileTreeView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut FileTreeView {
        &mut self.view
    }

    pub fn tree(&self) -> &FileTree {
        self.view.tree()
    }

    pub fn request(&self) -> &TextEdit {
        &self.request
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Apply one event
    pub fn handle(&mut self, event: SessionEvent) -> Outcome {
        match event {
            SessionEvent::Key(key) => self.handle_key(key),
            SessionEvent::Paste(text) => {
                if self.focus == Focus::EditingRequest {
                    self.request.insert_str(&text);
                }
                Outcome::Continue
            }
            SessionEvent::Resize(width, height) => {
                tracing::trace!("Resized to {}x{}", width, height);
                Outcome::Continue
            }
            SessionEvent::FsChange(change) => {
                self.handle_change(&change);
                Outcome::Continue
            }
            SessionEvent::WatchError(e) => {
                tracing::warn!("File watcher error: {}", e);
                self.set_status_message(format!("Watch error: {}", e));
                Outcome::Continue
            }
        }
    }

    fn handle_change(&mut self, change: &ChangeEvent) {
        match route_change(self.view.tree_mut(), change, &mut self.watcher) {
            RouteOutcome::Reloaded { .. } => self.view.refresh(),
            RouteOutcome::Failed { dir, error } => {
                let path = self
                    .view
                    .tree()
                    .get_node(dir)
                    .map(|n| n.entry.path.display().to_string())
                    .unwrap_or_default();
                self.set_status_message(format!("Cannot reload {}: {}", path, error));
            }
            RouteOutcome::Ignored(reason) => {
                tracing::trace!("Ignored {:?}: {:?}", change.path, reason);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if key.kind != KeyEventKind::Press {
            return Outcome::Continue;
        }
        self.status_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Outcome::Quit;
        }

        if key.code == KeyCode::Tab {
            self.focus = self.focus.next();
            return Outcome::Continue;
        }

        match self.focus {
            Focus::BrowsingTree => self.handle_tree_key(key),
            Focus::EditingRequest => {
                self.handle_request_key(key);
                Outcome::Continue
            }
            Focus::ConfirmingSubmit => match key.code {
                KeyCode::Enter => Outcome::Submit(render_artifact(
                    self.view.tree(),
                    &self.request.value(),
                )),
                KeyCode::Char('q') => Outcome::Quit,
                _ => Outcome::Continue,
            },
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Char('q') => return Outcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.view.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.view.select_next(),
            KeyCode::PageUp => self.view.select_page_up(),
            KeyCode::PageDown => self.view.select_page_down(),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            KeyCode::Enter => {
                if let Err(e) = self.view.toggle_expand_selected(&mut self.watcher) {
                    let name = self
                        .view
                        .cursor()
                        .and_then(|id| self.view.tree().get_node(id))
                        .map(|n| n.name().to_string())
                        .unwrap_or_default();
                    tracing::warn!("Cannot open {}: {}", name, e);
                    self.set_status_message(format!("Cannot open {}: {}", name, e));
                }
            }
            KeyCode::Char(' ') => self.view.toggle_select_selected(),
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_request_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.request.insert_char(c)
            }
            KeyCode::Enter => self.request.insert_char('\n'),
            KeyCode::Backspace => self.request.backspace(),
            KeyCode::Delete => self.request.delete(),
            KeyCode::Left => self.request.move_left(),
            KeyCode::Right => self.request.move_right(),
            KeyCode::Up => self.request.move_up(),
            KeyCode::Down => self.request.move_down(),
            KeyCode::Home => self.request.move_home(),
            KeyCode::End => self.request.move_end(),
            _ => {}
        }
    }
}
