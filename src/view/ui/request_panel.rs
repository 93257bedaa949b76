//! Request panel: the free-text editor and the submit button

use super::text_edit::TextEdit;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub const COPY_BUTTON: &str = "[ Copy ]";

pub struct RequestPanelRenderer;

impl RequestPanelRenderer {
    /// Render the editor above the button
    ///
    /// When `editing` is set the terminal cursor is placed at the edit point.
    pub fn render(
        edit: &TextEdit,
        frame: &mut Frame,
        area: Rect,
        editing: bool,
        button_focused: bool,
    ) {
        let [editor_area, button_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let border_style = if editing {
            Style::default().fg(Color::Indexed(205))
        } else {
            Style::default().fg(Color::Indexed(240))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" User Request: ")
            .border_style(border_style);
        let inner = block.inner(editor_area);

        // Keep the cursor row on screen
        let scroll = edit
            .cursor_row
            .saturating_sub(inner.height.saturating_sub(1) as usize);
        let lines: Vec<Line> = edit
            .lines
            .iter()
            .map(|l| Line::raw(l.as_str()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, editor_area);

        if editing && inner.width > 0 && inner.height > 0 {
            let line = edit.current_line();
            let before = &line[..edit.cursor_col.min(line.len())];
            let x = (before.width() as u16).min(inner.width - 1);
            let y = (edit.cursor_row - scroll) as u16;
            frame.set_cursor_position((inner.x + x, inner.y + y));
        }

        let button_style = if button_focused {
            Style::default()
                .fg(Color::Indexed(205))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Indexed(240))
        };
        frame.render_widget(
            Paragraph::new(COPY_BUTTON).style(button_style),
            button_area,
        );
    }
}
