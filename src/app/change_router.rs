//! Routing of directory change notifications onto the file tree
//!
//! A notification names a changed path. The directory that contains it is
//! looked up in the tree and, if the user can currently see its contents,
//! listed again from disk. Anything else is dropped: state nobody is viewing
//! is not tracked, and a pure content write never changes a listing.

use crate::services::watcher::ChangeEvent;
use crate::services::watcher::WatchRegistry;
use crate::view::file_tree::{FileTree, LoadReport, NodeId};
use std::io;

/// Why a notification did not trigger a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Content of an existing file changed; the listing is the same
    ContentWrite,
    /// The changed path has no parent directory
    NoParent,
    /// The containing directory is not materialized in the tree
    NotInTree,
    /// The containing directory is collapsed
    Collapsed,
}

/// Result of routing one notification
#[derive(Debug)]
pub enum RouteOutcome {
    Ignored(IgnoreReason),
    /// The containing directory was listed again
    Reloaded { dir: NodeId, report: LoadReport },
    /// The containing directory could not be read; the tree is unchanged
    Failed { dir: NodeId, error: io::Error },
}

impl RouteOutcome {
    /// Whether the flattened rows must be recomputed
    pub fn changed_tree(&self) -> bool {
        matches!(self, RouteOutcome::Reloaded { .. })
    }
}

/// Apply one change notification to the tree
pub fn route_change(
    tree: &mut FileTree,
    event: &ChangeEvent,
    watcher: &mut dyn WatchRegistry,
) -> RouteOutcome {
    if !event.kind.is_structural() {
        return RouteOutcome::Ignored(IgnoreReason::ContentWrite);
    }

    let Some(parent) = event.path.parent() else {
        return RouteOutcome::Ignored(IgnoreReason::NoParent);
    };

    let Some(dir) = tree.find_by_path(parent) else {
        tracing::trace!("Change outside materialized tree: {:?}", event.path);
        return RouteOutcome::Ignored(IgnoreReason::NotInTree);
    };

    if !tree.get_node(dir).is_some_and(|n| n.is_dir() && n.expanded) {
        return RouteOutcome::Ignored(IgnoreReason::Collapsed);
    }

    match tree.load(dir, watcher) {
        Ok(report) => {
            tracing::debug!("Reloaded {:?} after {:?}", parent, event.kind);
            RouteOutcome::Reloaded { dir, report }
        }
        Err(error) => {
            tracing::warn!("Failed to reload {:?}: {}", parent, error);
            RouteOutcome::Failed { dir, error }
        }
    }
}
