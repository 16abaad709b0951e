//! Progress segments
//!
//! One segment per item of the live user: full before the current item,
//! partial on it, empty after it.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use storyline_app::PageView;

const GAP: u16 = 1;
const FILLED: &str = "━";
const EMPTY: &str = "─";

/// Render the progress bar.
pub fn render(frame: &mut Frame, view: &PageView, area: Rect) {
    frame.render_widget(Paragraph::new(progress_line(view, area.width)), area);
}

/// Cell widths of `count` segments sharing `width` columns with one column
/// between neighbours. Leftover columns go to the leading segments.
pub fn segment_widths(count: usize, width: u16) -> Vec<u16> {
    if count == 0 {
        return Vec::new();
    }

    let count = u16::try_from(count).unwrap_or(u16::MAX);
    let usable = width.saturating_sub(GAP.saturating_mul(count - 1));
    let base = usable / count;
    let extra = usable % count;
    (0..count).map(|i| base + u16::from(i < extra)).collect()
}

/// Progress bar for `view` in `width` columns.
pub fn progress_line(view: &PageView, width: u16) -> Line<'static> {
    let mut spans = Vec::new();
    for (segment, cells) in segment_widths(view.item_count, width).into_iter().enumerate() {
        if segment > 0 {
            spans.push(Span::raw(" "));
        }
        let filled = ((view.segment_fill(segment) * f32::from(cells)).round() as u16).min(cells);
        spans.push(Span::styled(FILLED.repeat(filled.into()), Style::default().fg(Color::White)));
        spans.push(Span::styled(
            EMPTY.repeat((cells - filled).into()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
