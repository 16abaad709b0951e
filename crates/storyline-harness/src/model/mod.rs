//! Model-based testing for the story viewer.
//!
//! [`ModelViewer`] is a reference implementation of playback written as
//! plainly as possible: integer milliseconds, a handful of fields, no timers
//! or gesture classification. [`RealViewer`] drives the real
//! [`storyline_app::Viewer`] through the same [`Operation`]s, with a host
//! that follows page requests on the next frame. Tests apply random operation
//! sequences to both and compare their [`ObservableState`].

mod operation;
mod real;
mod viewer;

use std::time::Duration;

pub use operation::Operation;
pub use real::RealViewer;
pub use viewer::ModelViewer;

/// Frame interval used by both implementations.
pub const MODEL_FRAME: Duration = Duration::from_millis(16);

/// Observable state for oracle comparison.
///
/// The subset of viewer state that both implementations expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Page whose cursor is held.
    pub page: Option<usize>,
    /// Item the cursor is on.
    pub item: Option<usize>,
    /// Whether an item is playing.
    pub playing: bool,
    /// Whether the viewer closed.
    pub closed: bool,
    /// Every item start so far, in order.
    pub started: Vec<(usize, usize)>,
    /// Number of `Close` actions.
    pub closes: usize,
}
