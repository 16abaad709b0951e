//! Viewer side-effects.
//!
//! This module defines [`ViewerAction`], the instructions produced by the
//! [`crate::Viewer`] state machine for the host to execute.

/// Actions produced by the Viewer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    /// Redraw the viewer.
    Render,

    /// An item started playing from zero progress.
    ItemStarted {
        /// Page of the item.
        page: usize,
        /// Item index within the page.
        item: usize,
    },

    /// Scroll the host pager to a page.
    RequestPageChange {
        /// Page to show.
        target: usize,
    },

    /// Dismiss the viewer. Emitted exactly once.
    Close,
}
