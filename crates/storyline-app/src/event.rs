//! Viewer input events.
//!
//! This module defines [`ViewerEvent`], the full set of inputs that drive the
//! [`crate::Viewer`] state machine.
//!
//! Events come from two sources:
//! - The user: pointer tracks and the host's back/dismiss affordances.
//! - The host pager and frame loop: visibility reports, settle events, frame
//!   ticks, viewport changes and unmounting.

use storyline_core::Viewport;

use crate::PointerInput;

/// Events processed by the Viewer state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// Pointer input on the live page.
    Pointer(PointerInput),

    /// Page at least half visible this frame. `None` if no page is.
    PageVisible(Option<usize>),

    /// Pager stopped scrolling.
    PageSettled,

    /// Viewport size changed.
    Resize(Viewport),

    /// Frame tick.
    Frame,

    /// Viewer hidden or unmounted.
    Hidden,

    /// Host dismissed the viewer (back button, navigation away).
    Dismiss,
}
