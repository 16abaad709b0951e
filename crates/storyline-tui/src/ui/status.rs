//! Bottom row: what the session is doing and which keys drive it.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use storyline_app::ViewFrame;
use storyline_core::SessionState;

const HINTS: &str = " | ←/→ tap  ↓ close  n/p swipe  q quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &ViewFrame<'_>, area: Rect) {
    let name = |page: usize| {
        view.catalog.user(page).map_or_else(|| format!("#{page}"), |u| u.display_name.clone())
    };

    let state = match view.state {
        SessionState::Loading => Span::styled("loading", Style::default().fg(Color::Yellow)),
        SessionState::Playing { .. } => Span::styled(
            "playing",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        SessionState::Finished { next, .. } => {
            Span::styled(format!("next: {}", name(next)), Style::default().fg(Color::Cyan))
        },
        SessionState::Retreating { previous, .. } => {
            Span::styled(format!("back: {}", name(previous)), Style::default().fg(Color::Cyan))
        },
        SessionState::Closing => Span::styled("closing", Style::default().fg(Color::Red)),
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        state,
        Span::styled(HINTS, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
