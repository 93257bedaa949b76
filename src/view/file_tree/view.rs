use super::node::NodeId;
use super::tree::FileTree;
use crate::services::watcher::WatchRegistry;
use std::io;

/// View state for file tree navigation
///
/// Holds the flattened rows produced by `FileTree::flatten`. Rows are only
/// recomputed by `refresh()`, after a structural change; selection flags are
/// read live from the tree when a row is drawn.
#[derive(Debug)]
pub struct FileTreeView {
    /// The underlying tree model
    tree: FileTree,
    /// Flattened (node, depth) rows
    rows: Vec<(NodeId, usize)>,
    /// Node under the cursor
    cursor: Option<NodeId>,
    /// Scroll offset (index into rows)
    scroll_offset: usize,
    /// Moving past either end jumps to the other end
    wrap_navigation: bool,
    /// Last known viewport height (for scrolling calculations)
    pub(crate) viewport_height: usize,
}

impl FileTreeView {
    /// Create a new file tree view
    pub fn new(tree: FileTree) -> Self {
        let mut view = Self {
            tree,
            rows: Vec::new(),
            cursor: None,
            scroll_offset: 0,
            wrap_navigation: true,
            viewport_height: 10, // Default, will be updated during rendering
        };
        view.refresh();
        view
    }

    pub fn with_wrap_navigation(mut self, wrap: bool) -> Self {
        self.wrap_navigation = wrap;
        self
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.ensure_cursor_visible();
    }

    /// Get the underlying tree
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Get mutable reference to the underlying tree
    ///
    /// Call `refresh()` after any change that adds, removes or reorders
    /// visible entries.
    pub fn tree_mut(&mut self) -> &mut FileTree {
        &mut self.tree
    }

    /// Currently displayed rows with their depth
    pub fn rows(&self) -> &[(NodeId, usize)] {
        &self.rows
    }

    /// Recompute the rows from the tree
    ///
    /// The cursor stays on the same node when it is still visible, otherwise
    /// it lands on the row that now occupies its old index.
    pub fn refresh(&mut self) {
        let old_index = self.cursor_index();
        self.rows = self.tree.flatten();

        let still_visible = self
            .cursor
            .is_some_and(|id| self.rows.iter().any(|&(row, _)| row == id));

        if !still_visible {
            self.cursor = if self.rows.is_empty() {
                None
            } else {
                let index = old_index.unwrap_or(0).min(self.rows.len() - 1);
                Some(self.rows[index].0)
            };
        }

        self.ensure_cursor_visible();
    }

    /// Get the node under the cursor
    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Index of the cursor within the rows
    pub fn cursor_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.rows.iter().position(|&(id, _)| id == cursor)
    }

    /// Put the cursor on a node, if it is visible
    pub fn set_cursor(&mut self, id: NodeId) {
        if self.rows.iter().any(|&(row, _)| row == id) {
            self.cursor = Some(id);
            self.ensure_cursor_visible();
        }
    }

    fn move_to(&mut self, index: usize) {
        if let Some(&(id, _)) = self.rows.get(index) {
            self.cursor = Some(id);
            self.ensure_cursor_visible();
        }
    }

    /// Select the next visible node
    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.cursor_index() {
            Some(pos) if pos + 1 < self.rows.len() => pos + 1,
            Some(_) if self.wrap_navigation => 0,
            Some(pos) => pos,
            None => 0,
        };
        self.move_to(next);
    }

    /// Select the previous visible node
    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = match self.cursor_index() {
            Some(pos) if pos > 0 => pos - 1,
            Some(_) if self.wrap_navigation => self.rows.len() - 1,
            Some(pos) => pos,
            None => 0,
        };
        self.move_to(prev);
    }

    /// Move selection up by a page (viewport height)
    pub fn select_page_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let pos = self.cursor_index().unwrap_or(0);
        self.move_to(pos.saturating_sub(self.viewport_height.max(1)));
    }

    /// Move selection down by a page (viewport height)
    pub fn select_page_down(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let pos = self.cursor_index().unwrap_or(0);
        self.move_to((pos + self.viewport_height.max(1)).min(self.rows.len() - 1));
    }

    /// Select the first visible node
    pub fn select_first(&mut self) {
        self.move_to(0);
    }

    /// Select the last visible node
    pub fn select_last(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.move_to(last);
        }
    }

    /// Expand or collapse the directory under the cursor
    ///
    /// Loads the directory on its first expansion and recomputes the rows.
    /// Files are ignored.
    pub fn toggle_expand_selected(&mut self, watcher: &mut dyn WatchRegistry) -> io::Result<()> {
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        let result = self.tree.toggle_expanded(cursor, watcher);
        self.refresh();
        result.map(|_| ())
    }

    /// Toggle selection of the node under the cursor, cascading to its subtree
    pub fn toggle_select_selected(&mut self) {
        if let Some(cursor) = self.cursor {
            self.tree.toggle_selected(cursor);
        }
    }

    /// Get the scroll offset
    pub fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keep the cursor inside the viewport, scrolling only when it leaves it
    fn ensure_cursor_visible(&mut self) {
        if self.viewport_height == 0 {
            return;
        }

        match self.cursor_index() {
            Some(pos) if pos < self.scroll_offset => self.scroll_offset = pos,
            Some(pos) if pos >= self.scroll_offset + self.viewport_height => {
                self.scroll_offset = pos + 1 - self.viewport_height;
            }
            _ => {}
        }

        // Clamp after the rows shrink
        let max_offset = self.rows.len().saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}
