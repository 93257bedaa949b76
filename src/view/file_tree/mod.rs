// File tree module for lazy-loaded directory hierarchy
//
// This module provides a tree structure for representing filesystem hierarchies
// with lazy loading (directories are only read when expanded), cascading
// selection, and the flattened projection used by the interactive list.

pub mod node;
pub mod tree;
pub mod view;

pub use node::{NodeId, TreeNode};
pub use tree::{FileTree, LoadReport};
pub use view::FileTreeView;
