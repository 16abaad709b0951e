//! Keyboard and mouse mapping for the terminal viewer.
//!
//! The terminal has no touch screen, so this module turns keys into the
//! pointer tracks a finger would have made, and mouse reports into pointer
//! input in viewport pixels. It also plays the host pager: it knows which
//! page is on screen and answers page requests with visibility reports.

use storyline_app::{PointerInput, ViewerEvent};
use storyline_core::{Viewport, gesture::DEFAULT_COMMIT_DISTANCE_PX};

/// Width of one terminal cell in viewport pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Height of one terminal cell in viewport pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
}

/// Mouse button transitions that matter for pointer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseInput {
    /// Left button pressed.
    Press,
    /// Moved with the left button held.
    Drag,
    /// Left button released.
    Release,
}

/// Host-side input state.
#[derive(Debug, Clone)]
pub struct InputState {
    page_count: usize,
    /// Page the simulated pager shows
    visible_page: usize,
    viewport: Viewport,
}

impl InputState {
    /// Create input state for a pager showing `initial_page`.
    pub fn new(page_count: usize, initial_page: usize) -> Self {
        Self { page_count, visible_page: initial_page, viewport: Viewport::default() }
    }

    /// Current viewport in pixels.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Page currently shown by the pager.
    pub fn visible_page(&self) -> usize {
        self.visible_page
    }

    /// Terminal resized to `cols` x `rows` cells.
    pub fn resize(&mut self, cols: u16, rows: u16) -> ViewerEvent {
        self.viewport =
            Viewport::new(f32::from(cols) * CELL_WIDTH_PX, f32::from(rows) * CELL_HEIGHT_PX);
        ViewerEvent::Resize(self.viewport)
    }

    /// Handle a key press.
    ///
    /// - `→ l space enter`: tap the forward zone
    /// - `← h`: tap the back zone
    /// - `↓ j`: pull the page down past the commit distance
    /// - `↑ k`: short pull that snaps back
    /// - `n PgDn`, `p PgUp`: swipe the pager
    /// - `q Esc`: dismiss
    pub fn handle_key(&mut self, key: KeyInput) -> Vec<ViewerEvent> {
        let Viewport { width, height } = self.viewport;
        match key {
            KeyInput::Right | KeyInput::Enter | KeyInput::Char('l' | ' ') => {
                tap(width * 0.75, height / 2.0)
            },
            KeyInput::Left | KeyInput::Char('h') => tap(width * 0.1, height / 2.0),
            KeyInput::Down | KeyInput::Char('j') => {
                self.pull(DEFAULT_COMMIT_DISTANCE_PX * 1.5)
            },
            KeyInput::Up | KeyInput::Char('k') => self.pull(DEFAULT_COMMIT_DISTANCE_PX * 0.5),
            KeyInput::PageDown | KeyInput::Char('n') => self.swipe_by(1),
            KeyInput::PageUp | KeyInput::Char('p') => self.swipe_by(-1),
            KeyInput::Esc | KeyInput::Char('q') => vec![ViewerEvent::Dismiss],
            KeyInput::Char(_) => Vec::new(),
        }
    }

    /// Mouse report at cell (`column`, `row`).
    pub fn handle_mouse(&self, input: MouseInput, column: u16, row: u16) -> ViewerEvent {
        let x = (f32::from(column) + 0.5) * CELL_WIDTH_PX;
        let y = (f32::from(row) + 0.5) * CELL_HEIGHT_PX;
        let pointer = match input {
            MouseInput::Press => PointerInput::Down { x, y },
            MouseInput::Drag => PointerInput::Move { x, y },
            MouseInput::Release => PointerInput::Up { x, y },
        };
        ViewerEvent::Pointer(pointer)
    }

    /// Scroll the pager to `target` on the viewer's request.
    pub fn page_requested(&mut self, target: usize) -> Vec<ViewerEvent> {
        self.scroll_to(target)
    }

    /// Terminal regained focus: show the visible page again.
    pub fn refocus(&self) -> Vec<ViewerEvent> {
        vec![ViewerEvent::PageVisible(Some(self.visible_page)), ViewerEvent::PageSettled]
    }

    fn pull(&self, distance: f32) -> Vec<ViewerEvent> {
        let x = self.viewport.width / 2.0;
        let from = self.viewport.height / 4.0;
        let mut events = vec![ViewerEvent::Pointer(PointerInput::Down { x, y: from })];
        for step in 1..=4 {
            let y = from + distance * step as f32 / 4.0;
            events.push(ViewerEvent::Pointer(PointerInput::Move { x, y }));
        }
        events.push(ViewerEvent::Pointer(PointerInput::Up { x, y: from + distance }));
        events
    }

    fn swipe_by(&mut self, delta: isize) -> Vec<ViewerEvent> {
        let Some(target) = self.visible_page.checked_add_signed(delta) else {
            return Vec::new();
        };
        if target >= self.page_count {
            return Vec::new();
        }
        self.scroll_to(target)
    }

    fn scroll_to(&mut self, target: usize) -> Vec<ViewerEvent> {
        self.visible_page = target;
        vec![ViewerEvent::PageVisible(Some(target)), ViewerEvent::PageSettled]
    }
}

fn tap(x: f32, y: f32) -> Vec<ViewerEvent> {
    vec![
        ViewerEvent::Pointer(PointerInput::Down { x, y }),
        ViewerEvent::Pointer(PointerInput::Up { x, y }),
    ]
}
