use crate::services::fs::FsEntry;
use std::fmt;

/// Unique identifier for a tree node
///
/// Identifiers are issued in increasing order and never reused, so a stale
/// id simply stops resolving once its node is dropped from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Represents a node in the file tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Filesystem entry information
    pub entry: FsEntry,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    /// Child node IDs, in listing order (directories only)
    pub children: Vec<NodeId>,
    /// Whether the children are part of the flattened view
    pub expanded: bool,
    /// Whether the entry is picked for the prompt
    pub selected: bool,
    /// Set once the directory has been listed; `children` is then authoritative
    pub children_loaded: bool,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(id: NodeId, entry: FsEntry, parent: Option<NodeId>) -> Self {
        Self {
            id,
            entry,
            parent,
            children: Vec::new(),
            expanded: false,
            selected: false,
            children_loaded: false,
        }
    }

    /// Check if this node is a directory
    pub fn is_dir(&self) -> bool {
        self.entry.is_dir()
    }

    /// Check if this node is a leaf (anything that is not a directory)
    pub fn is_leaf(&self) -> bool {
        !self.entry.is_dir()
    }

    /// Check if this node is expanded
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Name shown for the node: the final path component
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}
