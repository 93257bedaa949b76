use super::node::{NodeId, TreeNode};
use crate::services::fs::{FsBackend, FsEntry, FsEntryType};
use crate::services::watcher::WatchRegistry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a successful directory (re)load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Children created by this load
    pub added: usize,
    /// Children carried over from the previous listing
    pub kept: usize,
    /// Previous children that were dropped
    pub removed: usize,
    /// Subdirectories whose watch registration failed
    pub watch_failures: usize,
    /// Loaded subdirectories that could not be re-read
    pub reload_failures: usize,
}

impl LoadReport {
    fn absorb_failures(&mut self, nested: LoadReport) {
        self.watch_failures += nested.watch_failures;
        self.reload_failures += nested.reload_failures;
    }
}

/// File tree with lazy loading support
///
/// The tree starts with just the root node. Directories are only read when
/// they are expanded or when a change notification invalidates them. Nodes
/// live in an arena keyed by `NodeId`; child lists and parent links are ids,
/// never owning references.
pub struct FileTree {
    /// Root directory path (canonical when it could be resolved)
    root_path: PathBuf,
    /// All nodes indexed by ID
    nodes: HashMap<NodeId, TreeNode>,
    /// Root node ID
    root_id: NodeId,
    /// Next node ID to assign
    next_id: usize,
    /// Filesystem access
    backend: Arc<dyn FsBackend>,
    /// Carry surviving children (and their state) across reloads
    preserve_state_on_reload: bool,
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTree")
            .field("root_path", &self.root_path)
            .field("nodes", &self.nodes.len())
            .field("root_id", &self.root_id)
            .field("next_id", &self.next_id)
            .field("backend", &"<dyn FsBackend>")
            .field("preserve_state_on_reload", &self.preserve_state_on_reload)
            .finish()
    }
}

impl FileTree {
    /// Create a new file tree rooted at the given path
    ///
    /// The root is not read here; call `load(root_id)` to populate it. An
    /// unreadable or missing root still produces a tree, it just stays empty.
    pub fn new(root_path: impl AsRef<Path>, backend: Arc<dyn FsBackend>) -> Self {
        let requested = root_path.as_ref();
        let root_path = match backend.canonicalize(requested) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Cannot canonicalize {:?}: {}", requested, e);
                std::path::absolute(requested).unwrap_or_else(|_| requested.to_path_buf())
            }
        };

        let root_id = NodeId(0);
        let mut root_node = TreeNode::new(
            root_id,
            FsEntry::from_path(root_path.clone(), FsEntryType::Directory),
            None,
        );
        root_node.expanded = true;

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            root_path,
            nodes,
            root_id,
            next_id: 1,
            backend,
            preserve_state_on_reload: true,
        }
    }

    /// Choose whether reloads keep the state of entries that still exist
    pub fn with_preserve_state_on_reload(mut self, preserve: bool) -> Self {
        self.preserve_state_on_reload = preserve;
        self
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get the root path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Get the filesystem backend
    pub fn backend(&self) -> &Arc<dyn FsBackend> {
        &self.backend
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Child ids of a node, empty for files and unloaded directories
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Get number of nodes currently in memory (root included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the node for `path` by walking loaded directories depth-first
    ///
    /// Unloaded directories are never descended into, so paths below them
    /// resolve to `None`.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.find_recursive(self.root_id, path)
    }

    fn find_recursive(&self, id: NodeId, path: &Path) -> Option<NodeId> {
        let node = self.get_node(id)?;
        if node.entry.path == path {
            return Some(id);
        }
        if !node.children_loaded || !path.starts_with(&node.entry.path) {
            return None;
        }
        node.children
            .iter()
            .find_map(|&child| self.find_recursive(child, path))
    }

    /// Read a directory and replace its children with the current listing
    ///
    /// Every subdirectory in the listing is registered with `watcher`. A
    /// registration failure is logged and counted but does not fail the load.
    ///
    /// Surviving subdirectories that were already loaded are re-read the same
    /// way, so a directory deleted and recreated under the same name never
    /// keeps its old listing. Their read errors are counted in the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a directory or cannot be read. The
    /// node is left exactly as it was.
    pub fn load(&mut self, id: NodeId, watcher: &mut dyn WatchRegistry) -> io::Result<LoadReport> {
        let node = self
            .get_node(id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Node not found"))?;

        if !node.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot load children of a file node",
            ));
        }

        let path = node.entry.path.clone();
        let entries = self.backend.read_dir(&path)?;

        let old_children = self
            .get_node_mut(id)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();

        // Children that still exist with the same kind keep their node, and
        // with it their expanded/selected flags and loaded subtree.
        let mut reusable: HashMap<PathBuf, NodeId> = HashMap::new();
        if self.preserve_state_on_reload {
            for &child_id in &old_children {
                if let Some(child) = self.get_node(child_id) {
                    reusable.insert(child.entry.path.clone(), child_id);
                }
            }
        }

        let mut report = LoadReport::default();
        let mut new_children = Vec::with_capacity(entries.len());
        let mut loaded_survivors = Vec::new();
        for entry in entries {
            let survivor = reusable
                .get(&entry.path)
                .copied()
                .filter(|old| {
                    self.get_node(*old)
                        .is_some_and(|n| n.entry.entry_type == entry.entry_type)
                });

            if entry.is_dir() {
                register_watch(watcher, &entry.path, &mut report);
            }

            if let Some(old_id) = survivor {
                reusable.remove(&entry.path);
                new_children.push(old_id);
                report.kept += 1;
                if self.get_node(old_id).is_some_and(|n| n.children_loaded) {
                    loaded_survivors.push(old_id);
                }
                continue;
            }

            let child_id = self.add_node(entry, Some(id));
            new_children.push(child_id);
            report.added += 1;
        }

        let kept: HashSet<NodeId> = new_children.iter().copied().collect();
        for old_id in old_children {
            if !kept.contains(&old_id) {
                self.remove_node_recursive(old_id);
                report.removed += 1;
            }
        }

        if let Some(node) = self.get_node_mut(id) {
            node.children = new_children;
            node.children_loaded = true;
        }

        for child_id in loaded_survivors {
            match self.load(child_id, watcher) {
                Ok(nested) => report.absorb_failures(nested),
                Err(e) => {
                    tracing::warn!("Failed to reload child of {:?}: {}", path, e);
                    report.reload_failures += 1;
                }
            }
        }

        tracing::debug!(
            "Loaded {:?}: {} added, {} kept, {} removed",
            path,
            report.added,
            report.kept,
            report.removed
        );
        Ok(report)
    }

    /// Expand a directory, listing it first if it has never been loaded
    ///
    /// # Errors
    ///
    /// Returns the read error of the first load; the directory then stays
    /// collapsed.
    pub fn expand(&mut self, id: NodeId, watcher: &mut dyn WatchRegistry) -> io::Result<()> {
        let Some(node) = self.get_node(id) else {
            return Ok(());
        };
        if !node.is_dir() || node.expanded {
            return Ok(());
        }

        if !node.children_loaded {
            self.load(id, watcher)?;
        }

        if let Some(node) = self.get_node_mut(id) {
            node.expanded = true;
        }
        Ok(())
    }

    /// Collapse a directory. Its children stay loaded; the root never collapses.
    pub fn collapse(&mut self, id: NodeId) {
        if id == self.root_id {
            return;
        }
        if let Some(node) = self.get_node_mut(id) {
            if node.is_dir() {
                node.expanded = false;
            }
        }
    }

    /// Toggle node expansion (expand if collapsed, collapse if expanded)
    ///
    /// Returns whether the node is expanded afterwards.
    pub fn toggle_expanded(
        &mut self,
        id: NodeId,
        watcher: &mut dyn WatchRegistry,
    ) -> io::Result<bool> {
        let Some(node) = self.get_node(id) else {
            return Ok(false);
        };

        if !node.is_dir() {
            return Ok(false);
        }

        if node.expanded {
            self.collapse(id);
        } else {
            self.expand(id, watcher)?;
        }
        Ok(self.get_node(id).is_some_and(|n| n.expanded))
    }

    /// Set `selected = on` for a node and every loaded descendant
    ///
    /// Descendants are overwritten unconditionally; ancestors are untouched.
    /// The root is never selectable, so calling this on it does nothing.
    pub fn set_selected(&mut self, id: NodeId, on: bool) {
        if id == self.root_id {
            return;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node_mut(current) {
                node.selected = on;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Flip a node's selection and cascade the new value to its subtree
    pub fn toggle_selected(&mut self, id: NodeId) {
        if let Some(on) = self.get_node(id).map(|n| !n.selected) {
            self.set_selected(id, on);
        }
    }

    /// Whether the node is selected or has a selected loaded descendant
    pub fn has_selection(&self, id: NodeId) -> bool {
        let Some(node) = self.get_node(id) else {
            return false;
        };
        node.selected
            || node
                .children
                .iter()
                .any(|&child| self.has_selection(child))
    }

    /// Selected non-directory nodes in depth-first, listing order
    pub fn selected_files(&self) -> Vec<NodeId> {
        let mut files = Vec::new();
        self.collect_selected_files(self.root_id, &mut files);
        files
    }

    fn collect_selected_files(&self, id: NodeId, files: &mut Vec<NodeId>) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        if node.selected && !node.is_dir() {
            files.push(id);
        }
        for &child in &node.children {
            self.collect_selected_files(child, files);
        }
    }

    /// Project the expand state into display rows
    ///
    /// Pre-order walk over the root's children (the root itself is not a
    /// row). Children of an expanded directory follow it at `depth + 1`;
    /// a collapsed directory contributes only itself.
    pub fn flatten(&self) -> Vec<(NodeId, usize)> {
        let mut rows = Vec::new();
        for &child in self.children(self.root_id) {
            self.flatten_recursive(child, 0, &mut rows);
        }
        rows
    }

    fn flatten_recursive(&self, id: NodeId, depth: usize, rows: &mut Vec<(NodeId, usize)>) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        rows.push((id, depth));
        if node.expanded {
            for &child in &node.children {
                self.flatten_recursive(child, depth + 1, rows);
            }
        }
    }

    /// Get the parent chain for a node (from root to node)
    pub fn get_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            ancestors.push(node_id);
            current = self.get_node(node_id).and_then(|n| n.parent);
        }

        ancestors.reverse();
        ancestors
    }

    /// Depth of a node below the root (root = 0)
    pub fn depth(&self, id: NodeId) -> usize {
        self.get_ancestors(id).len().saturating_sub(1)
    }

    /// Add a new node to the tree
    fn add_node(&mut self, entry: FsEntry, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(id, TreeNode::new(id, entry, parent));
        id
    }

    /// Remove a node and all its descendants
    fn remove_node_recursive(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child_id in node.children {
                self.remove_node_recursive(child_id);
            }
        }
    }
}

fn register_watch(watcher: &mut dyn WatchRegistry, path: &Path, report: &mut LoadReport) {
    if let Err(e) = watcher.watch(path) {
        tracing::warn!("Failed to watch {:?}: {}", path, e);
        report.watch_failures += 1;
    }
}
