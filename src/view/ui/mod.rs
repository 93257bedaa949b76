//! UI rendering modules
//!
//! Screen layout: the tree on the left, the request panel on the right and
//! one help/status line along the bottom.

pub mod file_explorer;
pub mod request_panel;
pub mod text_edit;

use crate::app::{Focus, Session};
use crate::services::watcher::WatchRegistry;
use file_explorer::FileExplorerRenderer;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use request_panel::RequestPanelRenderer;

/// Help text for each focus
pub fn help_text(focus: Focus) -> &'static str {
    match focus {
        Focus::BrowsingTree => {
            "↑/k ↓/j move · Enter open/close · Space select · Tab request · q quit"
        }
        Focus::EditingRequest => "Type your request · Tab to button · Ctrl+C quit",
        Focus::ConfirmingSubmit => "Enter copy · Tab back to files · q quit",
    }
}

/// Draw the whole screen for `session`
pub fn render<W: WatchRegistry>(frame: &mut Frame, session: &mut Session<W>) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let tree_percent = session.config().ui.tree_width_percent;
    let [tree_area, request_area] = Layout::horizontal([
        Constraint::Percentage(tree_percent),
        Constraint::Percentage(100 - tree_percent),
    ])
    .areas(main_area);

    let focus = session.focus();
    FileExplorerRenderer::render(
        session.view_mut(),
        frame,
        tree_area,
        focus == Focus::BrowsingTree,
    );
    RequestPanelRenderer::render(
        session.request(),
        frame,
        request_area,
        focus == Focus::EditingRequest,
        focus == Focus::ConfirmingSubmit,
    );

    let (text, style) = match session.status_message() {
        Some(message) => (message.to_string(), Style::default().fg(Color::Yellow)),
        None => (
            help_text(focus).to_string(),
            Style::default().fg(Color::Indexed(240)),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), status_area);
}
