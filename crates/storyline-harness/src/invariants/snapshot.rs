//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the viewer at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use storyline_app::{PageView, Viewer};
use storyline_core::{SessionState, Timestamp};

/// Snapshot of one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSnapshot {
    /// Session state.
    pub state: SessionState,
    /// Whether the session's item timer runs.
    pub timer_running: bool,
    /// Page whose cursor the session holds.
    pub session_page: Option<usize>,
    /// Page the activation tracker considers live.
    pub tracker_page: Option<usize>,
    /// Read model of the live page.
    pub view: Option<PageView>,
    /// Pages in the catalog.
    pub page_count: usize,
    /// `Close` actions observed so far.
    pub close_count: usize,
}

impl ViewerSnapshot {
    /// Capture a viewer at `now`, given how many `Close` actions it has
    /// emitted.
    pub fn capture<I: Timestamp>(viewer: &Viewer<I>, now: I, close_count: usize) -> Self {
        let session = viewer.session();
        Self {
            state: session.state(),
            timer_running: session.timer_running(),
            session_page: session.active_page(),
            tracker_page: viewer.active_page(),
            view: viewer.page_view(now),
            page_count: viewer.catalog().len(),
            close_count,
        }
    }
}

/// Snapshot of the whole simulated system.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-viewer snapshots.
    pub viewers: Vec<ViewerSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no viewers).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single viewer.
    pub fn single(viewer: ViewerSnapshot) -> Self {
        Self { viewers: vec![viewer] }
    }
}
