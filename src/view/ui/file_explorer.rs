use crate::view::file_tree::{FileTreeView, NodeId};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Width taken by the checkbox column
const CHECKBOX_WIDTH: usize = 3;

pub struct FileExplorerRenderer;

impl FileExplorerRenderer {
    /// Render the tree rows in the given frame area
    pub fn render(view: &mut FileTreeView, frame: &mut Frame, area: Rect, is_focused: bool) {
        // Account for borders (top + bottom = 2)
        let viewport_height = area.height.saturating_sub(2) as usize;
        view.set_viewport_height(viewport_height);
        let view = &*view;

        let rows = view.rows();
        let scroll_offset = view.get_scroll_offset().min(rows.len());
        let cursor_index = view.cursor_index();

        // Only the visible slice is handed to the List so it never scrolls on its own
        let visible_end = (scroll_offset + viewport_height).min(rows.len());
        let content_width = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = rows[scroll_offset..visible_end]
            .iter()
            .enumerate()
            .map(|(viewport_idx, &(node_id, depth))| {
                let is_cursor = cursor_index == Some(scroll_offset + viewport_idx);
                Self::render_node(view, node_id, depth, is_cursor, content_width)
            })
            .collect();

        let border_style = if is_focused {
            Style::default().fg(Color::Indexed(205))
        } else {
            Style::default().fg(Color::Indexed(240))
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Files ")
                .border_style(border_style),
        );

        frame.render_widget(list, area);
    }

    /// Render a single tree node as a ListItem
    fn render_node(
        view: &FileTreeView,
        node_id: NodeId,
        depth: usize,
        is_cursor: bool,
        content_width: usize,
    ) -> ListItem<'static> {
        let Some(node) = view.tree().get_node(node_id) else {
            return ListItem::new("");
        };

        let label = format!(
            "{}{}",
            "  ".repeat(depth),
            node_label(node.is_dir(), node.expanded, node.name())
        );
        let checkbox = if node.selected { "[x]" } else { "[ ]" };

        // Pad or cut the label so the checkbox sits in the last column
        let label_width = content_width.saturating_sub(CHECKBOX_WIDTH);
        let label = fit_to_width(&label, label_width);

        let style = if is_cursor {
            Style::default()
                .fg(Color::Indexed(170))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        ListItem::new(Line::from(vec![
            Span::styled(label, style),
            Span::styled(checkbox, style),
        ]))
    }
}

/// Glyph and name for one row
pub fn node_label(is_dir: bool, expanded: bool, name: &str) -> String {
    let symbol = match (is_dir, expanded) {
        (true, true) => "📂",
        (true, false) => "📁",
        (false, _) => "📄",
    };
    format!("{} {}", symbol, name)
}

/// Truncate `text` to at most `width` display columns, then pad with spaces
fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
