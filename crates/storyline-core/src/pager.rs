//! Page activation from pager visibility signals.
//!
//! The host pager reports which page is at least half visible on every frame
//! while scrolling. Those reports only nominate a candidate; activation
//! happens when the pager settles (or, for hosts without a settle event, when
//! the candidate has been stable for a quiet period). Pages that flicker past
//! the threshold mid-scroll are never activated.

use std::time::Duration;

use tracing::{debug, warn};

use crate::env::Timestamp;

/// Activation change for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransition {
    /// Page became the live page.
    Activate(usize),
    /// Page stopped being the live page.
    Deactivate(usize),
}

/// Tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagerConfig {
    /// Settle automatically once the candidate is unchanged for this long.
    /// `None` waits for an explicit settle event.
    pub quiet_period: Option<Duration>,
}

/// Maps visibility reports onto activate/deactivate transitions.
///
/// At most one page is active. Every transition batch that activates a page
/// deactivates the previous one first.
#[derive(Debug, Clone)]
pub struct PageActivationTracker<I> {
    config: PagerConfig,
    page_count: usize,
    /// Live page
    active: Option<usize>,
    /// Most recent page reported as visible
    candidate: Option<usize>,
    /// When the current candidate was first reported
    candidate_since: Option<I>,
}

impl<I: Timestamp> PageActivationTracker<I> {
    /// Create a tracker for `page_count` pages with nothing active.
    pub fn new(page_count: usize, config: PagerConfig) -> Self {
        Self { config, page_count, active: None, candidate: None, candidate_since: None }
    }

    /// Live page. `None` before the first settle or after `hide`.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Page currently nominated by visibility reports.
    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    /// Activate `page` immediately, as when the viewer opens on it.
    pub fn open(&mut self, page: usize, now: I) -> Vec<PageTransition> {
        self.observe(Some(page), now);
        self.settle()
    }

    /// Record the page that is at least half visible this frame.
    ///
    /// `None` means no page crosses the threshold. Indices past the last
    /// page are ignored.
    pub fn observe(&mut self, visible: Option<usize>, now: I) {
        if let Some(page) = visible
            && page >= self.page_count
        {
            warn!(page, page_count = self.page_count, "ignoring visibility for unknown page");
            return;
        }

        if visible != self.candidate {
            self.candidate = visible;
            self.candidate_since = Some(now);
        }
    }

    /// Pager finished scrolling: commit the candidate.
    pub fn settle(&mut self) -> Vec<PageTransition> {
        let Some(page) = self.candidate else {
            return Vec::new();
        };
        if self.active == Some(page) {
            return Vec::new();
        }

        let mut transitions = Vec::with_capacity(2);
        if let Some(previous) = self.active.take() {
            transitions.push(PageTransition::Deactivate(previous));
        }
        self.active = Some(page);
        transitions.push(PageTransition::Activate(page));

        debug!(?transitions, "pager settled");
        transitions
    }

    /// Frame tick: settle on a stable candidate when a quiet period is set.
    pub fn tick(&mut self, now: I) -> Vec<PageTransition> {
        let (Some(quiet), Some(since)) = (self.config.quiet_period, self.candidate_since) else {
            return Vec::new();
        };
        if self.candidate == self.active || now - since < quiet {
            return Vec::new();
        }
        self.settle()
    }

    /// Viewer hidden or unmounted: deactivate the live page.
    ///
    /// Safe to call when nothing is active.
    pub fn hide(&mut self) -> Vec<PageTransition> {
        self.candidate = None;
        self.candidate_since = None;
        self.active.take().map(PageTransition::Deactivate).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn tracker(pages: usize) -> PageActivationTracker<Instant> {
        PageActivationTracker::new(pages, PagerConfig::default())
    }

    #[test]
    fn open_activates_initial_page() {
        let mut t = tracker(3);
        assert_eq!(t.open(1, Instant::now()), vec![PageTransition::Activate(1)]);
        assert_eq!(t.active(), Some(1));
    }

    #[test]
    fn settle_deactivates_before_activating() {
        let now = Instant::now();
        let mut t = tracker(3);
        let _ = t.open(0, now);

        t.observe(Some(1), now);
        assert_eq!(
            t.settle(),
            vec![PageTransition::Deactivate(0), PageTransition::Activate(1)]
        );
    }

    #[test]
    fn flicker_without_settle_emits_nothing() {
        let now = Instant::now();
        let mut t = tracker(5);
        let _ = t.open(0, now);

        for visible in [Some(1), Some(2), None, Some(3), Some(2), Some(1), Some(0)] {
            t.observe(visible, now);
        }
        // Scrolled back to where it started
        assert!(t.settle().is_empty());
        assert_eq!(t.active(), Some(0));
    }

    #[test]
    fn settle_twice_is_noop() {
        let now = Instant::now();
        let mut t = tracker(2);
        t.observe(Some(1), now);
        assert_eq!(t.settle(), vec![PageTransition::Activate(1)]);
        assert!(t.settle().is_empty());
    }

    #[test]
    fn out_of_range_visibility_is_ignored() {
        let now = Instant::now();
        let mut t = tracker(2);
        let _ = t.open(1, now);
        t.observe(Some(7), now);
        assert_eq!(t.candidate(), Some(1));
        assert!(t.settle().is_empty());
    }

    #[test]
    fn quiet_period_settles_stable_candidate() {
        let t0 = Instant::now();
        let mut t = PageActivationTracker::new(
            3,
            PagerConfig { quiet_period: Some(Duration::from_millis(100)) },
        );
        let _ = t.open(0, t0);

        t.observe(Some(1), t0);
        assert!(t.tick(t0 + Duration::from_millis(50)).is_empty());
        t.observe(Some(2), t0 + Duration::from_millis(60));
        assert!(t.tick(t0 + Duration::from_millis(120)).is_empty());
        assert_eq!(
            t.tick(t0 + Duration::from_millis(160)),
            vec![PageTransition::Deactivate(0), PageTransition::Activate(2)]
        );
    }

    #[test]
    fn hide_is_safe_when_idle() {
        let mut t = tracker(2);
        assert!(t.hide().is_empty());

        let _ = t.open(0, Instant::now());
        assert_eq!(t.hide(), vec![PageTransition::Deactivate(0)]);
        assert!(t.hide().is_empty());
    }
}
