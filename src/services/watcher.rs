//! Directory change notifications
//!
//! Wraps a `notify` watcher that runs on its own thread and forwards every
//! change into a channel. The interactive loop owns the receiving end and
//! drains it one message at a time, so the watcher never touches the tree.
//!
//! Directories are watched non-recursively, one registration per directory,
//! as the tree discovers them. Registrations accumulate for the lifetime of
//! the watcher and are released together when it is dropped.
//!
//! A directory that is deleted loses its kernel watch. Every `watch` call
//! re-arms the path, so a recreated directory is observed again as soon as
//! the tree reloads its parent.

use notify::event::{EventKind, ModifyKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

/// What happened to a changed path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    /// Content of an existing file was modified
    Write,
    Remove,
    Rename,
    /// Permissions or other metadata changed
    Chmod,
    Other,
}

impl ChangeKind {
    /// Whether this change can add, remove or rename directory entries.
    ///
    /// Only a pure content write leaves the listing of the parent unchanged.
    pub fn is_structural(self) -> bool {
        self != ChangeKind::Write
    }
}

/// A single path-level change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Message delivered from the watcher thread to the interactive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMessage {
    Change(ChangeEvent),
    /// The notification mechanism itself failed; listening continues
    Error(String),
}

/// Something that can be asked to observe a directory for changes
pub trait WatchRegistry {
    /// Start observing `path`. Registering the same path twice is harmless.
    fn watch(&mut self, path: &Path) -> io::Result<()>;
}

/// Translate a `notify` event into change events, one per affected path.
///
/// Access notifications (open, read, close) do not describe a change and
/// produce nothing.
pub fn convert_event(event: notify::Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Access(_) => return Vec::new(),
        EventKind::Create(_) => ChangeKind::Create,
        EventKind::Remove(_) => ChangeKind::Remove,
        EventKind::Modify(ModifyKind::Data(_)) => ChangeKind::Write,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Chmod,
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => ChangeKind::Other,
    };

    event
        .paths
        .into_iter()
        .map(|path| ChangeEvent::new(path, kind))
        .collect()
}

/// `notify`-backed watcher feeding a channel
pub struct FsWatcher {
    watcher: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl std::fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsWatcher")
            .field("watcher", &"<notify>")
            .field("watched", &self.watched.len())
            .finish()
    }
}

impl FsWatcher {
    /// Create the watcher and the receiving end of its message channel
    ///
    /// # Errors
    ///
    /// Fails when the platform notification mechanism cannot be initialized.
    pub fn new() -> notify::Result<(Self, Receiver<WatchMessage>)> {
        let (tx, rx) = mpsc::channel();

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for change in convert_event(event) {
                        // Receiver gone means the session is shutting down
                        if tx.send(WatchMessage::Change(change)).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchMessage::Error(e.to_string()));
                }
            },
            notify::Config::default(),
        )?;

        Ok((
            Self {
                watcher,
                watched: HashSet::new(),
            },
            rx,
        ))
    }

    /// Number of distinct directories registered this session
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }
}

impl WatchRegistry for FsWatcher {
    fn watch(&mut self, path: &Path) -> io::Result<()> {
        // Known paths are re-armed too; a recreated directory needs a new kernel watch
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| io::Error::other(format!("watch {}: {}", path.display(), e)))?;
        if self.watched.insert(path.to_path_buf()) {
            tracing::trace!("Watching {:?}", path);
        }
        Ok(())
    }
}

/// Registry that only records what it was asked to watch
///
/// Stands in for the real watcher wherever notifications are not wanted,
/// such as tests. Setting `fail` makes every registration return an error.
#[derive(Debug, Default, Clone)]
pub struct RecordingWatcher {
    pub watched: Vec<PathBuf>,
    pub fail: bool,
}

impl RecordingWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            watched: Vec::new(),
            fail: true,
        }
    }
}

impl WatchRegistry for RecordingWatcher {
    fn watch(&mut self, path: &Path) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::other("watch registration refused"));
        }
        self.watched.push(path.to_path_buf());
        Ok(())
    }
}
