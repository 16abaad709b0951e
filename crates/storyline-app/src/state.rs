//! Observable viewer state.
//!
//! [`PageView`] is the read model of the live page and [`ViewFrame`] bundles
//! it with the catalog entries a renderer needs. Neither exposes the timer or
//! gesture machinery behind them.

use storyline_core::{PlaybackPhase, SessionState, StoryCatalog, StoryItem, UserStories};

/// Read model of the live page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView {
    /// Page (user) index.
    pub page: usize,
    /// Item being shown.
    pub item_index: usize,
    /// Items of the user, one progress segment each.
    pub item_count: usize,
    /// Progress through the current item, `0.0..=1.0`.
    pub progress_ratio: f32,
    /// Downward drag offset in pixels.
    pub drag_offset: f32,
    /// Page scale from the drag rubber band.
    pub drag_scale: f32,
    /// Page drawn above its neighbours.
    pub elevated: bool,
    /// Playback phase.
    pub phase: PlaybackPhase,
}

impl PageView {
    /// Fill of progress segment `segment`: full before the current item,
    /// empty after it, partial on it.
    pub fn segment_fill(&self, segment: usize) -> f32 {
        match segment.cmp(&self.item_index) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => self.progress_ratio,
            std::cmp::Ordering::Greater => 0.0,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrame<'a> {
    /// Live page. `None` while loading.
    pub view: Option<PageView>,
    /// Catalog being played.
    pub catalog: &'a StoryCatalog,
    /// Session state.
    pub state: SessionState,
}

impl<'a> ViewFrame<'a> {
    /// User of the live page.
    pub fn user(&self) -> Option<&'a UserStories> {
        self.view.and_then(|view| self.catalog.user(view.page))
    }

    /// Item being shown.
    pub fn item(&self) -> Option<&'a StoryItem> {
        self.view.and_then(|view| self.catalog.item(view.page, view.item_index))
    }

    /// Number of pages in the pager.
    pub fn page_count(&self) -> usize {
        self.catalog.len()
    }
}
