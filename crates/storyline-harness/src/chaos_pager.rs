//! Seeded generator of messy pager behaviour.
//!
//! Real pagers report visibility on every frame while a finger drags them
//! around: pages flicker past the half-visible threshold, scrolls reverse
//! midway, and sometimes nothing is visible for a frame. `ChaosPager`
//! produces such sequences from a seed so failures can be replayed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded source of jittery scroll gestures.
#[derive(Debug, Clone)]
pub struct ChaosPager {
    rng: ChaCha8Rng,
    page_count: usize,
    /// Probability that a frame reports no visible page
    gap_rate: f64,
    /// Probability that a frame reports an index past the last page
    out_of_range_rate: f64,
}

impl ChaosPager {
    /// Create a pager over `page_count` pages.
    pub fn new(seed: u64, page_count: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            page_count: page_count.max(1),
            gap_rate: 0.1,
            out_of_range_rate: 0.0,
        }
    }

    /// Also report indices past the last page, as a buggy host might.
    #[must_use]
    pub fn with_out_of_range_rate(mut self, rate: f64) -> Self {
        self.out_of_range_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Pick a page to scroll to.
    pub fn target(&mut self) -> usize {
        self.rng.gen_range(0..self.page_count)
    }

    /// Whether the user lifts their finger early (scroll gets abandoned).
    pub fn abandons(&mut self) -> bool {
        self.rng.gen_bool(0.25)
    }

    /// Visibility reports for a scroll from `from` that ends on `to`.
    ///
    /// Walks page by page with random overshoot and reversals. The last
    /// report is always `Some(to)`.
    pub fn scroll(&mut self, from: usize, to: usize) -> Vec<Option<usize>> {
        let last = self.page_count - 1;
        let to = to.min(last);
        let mut at = from.min(last);
        let mut reports = Vec::new();

        for _ in 0..64 {
            if at == to {
                break;
            }
            let towards = if to > at { at + 1 } else { at - 1 };
            at = if self.rng.gen_bool(0.2) {
                // Finger wobbles back
                if to > at { at.saturating_sub(1) } else { (at + 1).min(last) }
            } else {
                towards
            };
            reports.push(self.jitter(at));
        }

        reports.push(Some(to));
        reports
    }

    fn jitter(&mut self, page: usize) -> Option<usize> {
        if self.rng.gen_bool(self.gap_rate) {
            None
        } else if self.out_of_range_rate > 0.0 && self.rng.gen_bool(self.out_of_range_rate) {
            Some(self.page_count + self.rng.gen_range(0..3))
        } else {
            Some(page)
        }
    }
}
