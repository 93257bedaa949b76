//! Prompt document generation
//!
//! Turns the current selection into the single text document the tool
//! produces: a pruned tree diagram, the contents of every selected file, and
//! the user's request.
//!
//! ```text
//! <file_tree>
//! ├── a
//! │   └── x.txt
//! └── b.txt
//! </file_tree>
//! <file>
//! <file_path>/p/a/x.txt</file_path>
//! <file_content>
//! hi
//! </file_content>
//! </file>
//! ...
//! <user_request>
//! ...
//! </user_request>
//! ```

use crate::view::file_tree::{FileTree, NodeId};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Placeholder emitted for files that are unreadable or not text
pub const BINARY_PLACEHOLDER: &str = "[Binary file]";

/// Why a selected file's content was replaced by the placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    /// Content contains a NUL byte
    Binary,
}

/// A selected file whose content could not be included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// The rendered document plus what had to be left out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub document: String,
    pub skipped: Vec<SkippedFile>,
}

/// Render the prompt document for the tree's current selection
///
/// Reads selected files through the tree's backend but never modifies the
/// tree. A file that cannot be used never fails the render; it is replaced
/// by `BINARY_PLACEHOLDER` and listed in `Artifact::skipped`.
pub fn render_artifact(tree: &FileTree, request: &str) -> Artifact {
    let mut document = String::new();
    let mut skipped = Vec::new();

    document.push_str("<file_tree>\n");
    document.push_str(&render_tree_diagram(tree));
    document.push_str("</file_tree>\n");

    for id in tree.selected_files() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        let path = &node.entry.path;

        let content = match tree.backend().read_file(path) {
            Ok(bytes) if bytes.contains(&0) => {
                tracing::debug!("Skipping binary file {:?}", path);
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: SkipReason::Binary,
                });
                BINARY_PLACEHOLDER.to_string()
            }
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::debug!("Skipping unreadable file {:?}: {}", path, e);
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: SkipReason::Unreadable(e.to_string()),
                });
                BINARY_PLACEHOLDER.to_string()
            }
        };

        let _ = write!(
            document,
            "<file>\n<file_path>{}</file_path>\n<file_content>\n{}\n</file_content>\n</file>\n",
            path.display(),
            content
        );
    }

    document.push_str("<user_request>\n");
    document.push_str(request);
    document.push_str("\n</user_request>");

    Artifact { document, skipped }
}

/// Render the pruned tree diagram, one line per kept node
///
/// A node is kept when it is selected or has a selected loaded descendant.
/// The root itself is never drawn.
pub fn render_tree_diagram(tree: &FileTree) -> String {
    let mut out = String::new();
    let kept = kept_children(tree, tree.root_id());
    let count = kept.len();
    for (i, id) in kept.into_iter().enumerate() {
        render_branch(tree, id, "", i + 1 == count, &mut out);
    }
    out
}

fn kept_children(tree: &FileTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|&child| tree.has_selection(child))
        .collect()
}

fn render_branch(tree: &FileTree, id: NodeId, prefix: &str, is_last: bool, out: &mut String) {
    let Some(node) = tree.get_node(id) else {
        return;
    };

    let (connector, continuation) = if is_last {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    };
    let _ = writeln!(out, "{}{}{}", prefix, connector, node.name());

    let child_prefix = format!("{prefix}{continuation}");
    let kept = kept_children(tree, id);
    let count = kept.len();
    for (i, child) in kept.into_iter().enumerate() {
        render_branch(tree, child, &child_prefix, i + 1 == count, out);
    }
}
