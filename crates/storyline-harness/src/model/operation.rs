//! Operations for model-based testing.
//!
//! Operations represent everything a user or host can do to the viewer. They
//! are generated randomly by proptest (or decoded from fuzz input) and applied
//! to both the model and the real implementation.

use arbitrary::Arbitrary;

/// Operations that can be applied to a viewer.
///
/// Operations are small and composable so proptest can explore interesting
/// combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Tap on the forward side of the page.
    TapForward,

    /// Tap on the back side of the page.
    TapBack,

    /// Let frames pass.
    AdvanceFrames {
        /// Number of frames.
        frames: u8,
    },

    /// User swipes the pager and it settles on a page.
    Swipe {
        /// Target page, taken modulo the page count.
        target: u8,
    },

    /// Straight downward drag from the middle of the page.
    ///
    /// Up to 10 px is a tap, up to 100 px snaps back, beyond closes.
    Drag {
        /// Travel in pixels.
        distance: u8,
    },

    /// Viewer hidden (app backgrounded).
    Hide,

    /// Host dismisses the viewer.
    Dismiss,
}

impl Operation {
    /// Normalize page targets for a catalog of `page_count` pages.
    #[must_use]
    pub fn clamp_to(self, page_count: usize) -> Self {
        match self {
            Self::Swipe { target } => {
                let target = usize::from(target) % page_count.max(1);
                Self::Swipe { target: u8::try_from(target).unwrap_or(0) }
            },
            other => other,
        }
    }
}
