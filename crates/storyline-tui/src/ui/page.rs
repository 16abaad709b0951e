//! Story page
//!
//! Draws the current item inside a bordered card. While the user drags, the
//! card follows the finger down and shrinks with the rubber band.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use storyline_app::{PageView, ViewFrame};
use storyline_core::MediaKind;

use crate::input::CELL_HEIGHT_PX;

/// Render the live page.
pub fn render(frame: &mut Frame, view: &ViewFrame<'_>, page: &PageView, area: Rect) {
    let (Some(user), Some(item)) = (view.user(), view.item()) else {
        return;
    };

    let border = if page.elevated {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", user.display_name));

    let kind = match item.media_kind {
        MediaKind::Image => "[image]",
        MediaKind::Video => "[video]",
    };
    let body = vec![
        Line::from(""),
        Line::from(kind),
        Line::from(item.media_ref.as_str()),
        Line::from(format!("item {}/{}", page.item_index + 1, page.item_count))
            .style(Style::default().fg(Color::DarkGray)),
    ];

    let card = displaced(area, page);
    frame.render_widget(Clear, card);
    frame.render_widget(Paragraph::new(body).alignment(Alignment::Center).block(block), card);
}

/// Area of the card after the drag offset and scale are applied.
///
/// The card moves down by whole rows and shrinks around its horizontal
/// centre. It never leaves `area`.
pub fn displaced(area: Rect, page: &PageView) -> Rect {
    let rows = ((page.drag_offset.max(0.0) / CELL_HEIGHT_PX).round() as u16).min(area.height);
    let scale = page.drag_scale.clamp(0.0, 1.0);
    let width = ((f32::from(area.width) * scale).round() as u16).min(area.width);
    let height =
        ((f32::from(area.height) * scale).round() as u16).min(area.height.saturating_sub(rows));

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + rows,
        width,
        height,
    }
}
