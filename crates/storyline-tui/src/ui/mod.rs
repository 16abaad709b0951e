//! UI rendering
//!
//! Rendering functions that convert a [`ViewFrame`] into terminal output
//! using ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod header;
mod page;
mod progress;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};
use storyline_app::ViewFrame;

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &ViewFrame<'_>) {
    const PROGRESS_HEIGHT: u16 = 1;
    const HEADER_HEIGHT: u16 = 1;
    const PAGE_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PROGRESS_HEIGHT),
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(PAGE_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [progress_area, header_area, page_area, status_area] = chunks.as_ref() else {
        return;
    };

    match view.view {
        Some(page_view) => {
            progress::render(frame, &page_view, *progress_area);
            header::render(frame, view, *header_area);
            page::render(frame, view, &page_view, *page_area);
        },
        None => {
            let loading = Paragraph::new("loading…").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, *page_area);
        },
    }
    status::render(frame, view, *status_area);
}
