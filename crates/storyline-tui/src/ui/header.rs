//! Page header
//!
//! Displays the live user's name and where the page sits in the pager.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use storyline_app::ViewFrame;

/// Render the header line.
pub fn render(frame: &mut Frame, view: &ViewFrame<'_>, area: Rect) {
    let (Some(user), Some(page)) = (view.user(), view.view) else {
        return;
    };

    let line = Line::from(vec![
        Span::raw(" ● "),
        Span::styled(user.display_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}/{}", page.page + 1, view.page_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
