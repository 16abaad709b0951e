//! Recorded host-visible actions.
//!
//! Traces are what the host would observe: items starting, page requests and
//! the close. They are serializable so tests can snapshot whole runs.

use serde::Serialize;

/// Host-visible action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceAction {
    /// An item started playing.
    ItemStarted {
        /// Page of the item.
        page: usize,
        /// Item within the page.
        item: usize,
    },
    /// The viewer asked the pager to scroll.
    PageRequested {
        /// Requested page.
        target: usize,
    },
    /// The viewer closed.
    Close,
}

/// One recorded action and when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Virtual milliseconds since the start of the run.
    pub at_ms: u64,
    /// What happened.
    pub action: TraceAction,
}

/// Queries over a recorded trace.
pub trait TraceExt {
    /// Number of entries with exactly this action.
    fn count(&self, action: TraceAction) -> usize;

    /// Time of the first entry with this action.
    fn first_at(&self, action: TraceAction) -> Option<u64>;

    /// Items started, in order.
    fn items_started(&self) -> Vec<(usize, usize)>;
}

impl TraceExt for [TraceEntry] {
    fn count(&self, action: TraceAction) -> usize {
        self.iter().filter(|entry| entry.action == action).count()
    }

    fn first_at(&self, action: TraceAction) -> Option<u64> {
        self.iter().find(|entry| entry.action == action).map(|entry| entry.at_ms)
    }

    fn items_started(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter_map(|entry| match entry.action {
                TraceAction::ItemStarted { page, item } => Some((page, item)),
                TraceAction::PageRequested { .. } | TraceAction::Close => None,
            })
            .collect()
    }
}
