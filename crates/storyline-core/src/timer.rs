//! Item timer driving the progress indicator.
//!
//! The timer is polled, not scheduled: the owner calls [`TimerDriver::poll`]
//! on every frame and receives the completion token exactly once, on the first
//! poll at or after the deadline. Starting a new timer or cancelling discards
//! the live one, and a discarded timer can never complete.
//!
//! ```text
//! ┌──────┐  start   ┌─────────┐  poll >= deadline  ┌───────────┐
//! │ Idle │─────────>│ Running │───────────────────>│ Completed │
//! └──────┘          └─────────┘                    └───────────┘
//!    ↑                │  │ start (replaces)              │
//!    │     cancel     │  └──────────┐                    │ start
//!    └────────────────┘             ↓                    ↓
//!                              ┌─────────┐          ┌─────────┐
//!                              │ Running │          │ Running │
//!                              └─────────┘          └─────────┘
//! ```

use std::time::Duration;

use crate::env::Timestamp;

/// Identifies one `start` call.
///
/// Tokens increase with every start, so a completion can always be matched
/// against the start it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Generation number of the start this token belongs to.
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveTimer<I> {
    token: TimerToken,
    started_at: I,
    duration: Duration,
}

/// Ratio timer from 0 to 1 over a fixed duration.
///
/// Generic over the instant type so simulation can drive it with virtual
/// time.
#[derive(Debug, Clone)]
pub struct TimerDriver<I> {
    /// Generation of the most recent start
    generation: u64,
    /// Running timer. `None` when idle, completed or cancelled.
    live: Option<LiveTimer<I>>,
    /// Ratio reported while no timer is live
    rest_ratio: f32,
}

impl<I> Default for TimerDriver<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> TimerDriver<I> {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self { generation: 0, live: None, rest_ratio: 0.0 }
    }

    /// Whether a timer is live.
    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    /// Token of the live timer. `None` if idle.
    pub fn token(&self) -> Option<TimerToken> {
        self.live.as_ref().map(|live| live.token)
    }

    /// Discard the live timer without completing it.
    ///
    /// Idempotent: cancelling an idle, cancelled or completed timer is a
    /// no-op. Returns `true` if a live timer was discarded.
    pub fn cancel(&mut self) -> bool {
        let discarded = self.live.take().is_some();
        if discarded {
            self.rest_ratio = 0.0;
        }
        discarded
    }
}

impl<I: Timestamp> TimerDriver<I> {
    /// Start a timer over `duration`, replacing any live timer.
    ///
    /// The replaced timer never completes.
    pub fn start(&mut self, duration: Duration, now: I) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.live = Some(LiveTimer { token, started_at: now, duration });
        self.rest_ratio = 0.0;
        token
    }

    /// Progress of the live timer in `[0, 1]`.
    ///
    /// Non-decreasing while the timer runs, given a non-decreasing `now`.
    /// When no timer is live, reports 1.0 after a natural completion and 0.0
    /// otherwise.
    pub fn ratio(&self, now: I) -> f32 {
        match &self.live {
            Some(live) => progress(live.duration, now - live.started_at),
            None => self.rest_ratio,
        }
    }

    /// Check for natural completion.
    ///
    /// Returns the token of the live timer on the first poll at or after its
    /// deadline, then `None` until the next `start`.
    pub fn poll(&mut self, now: I) -> Option<TimerToken> {
        let live = self.live?;
        if now - live.started_at < live.duration {
            return None;
        }

        self.live = None;
        self.rest_ratio = 1.0;
        Some(live.token)
    }
}

fn progress(duration: Duration, elapsed: Duration) -> f32 {
    if duration.is_zero() || elapsed >= duration {
        return 1.0;
    }

    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}
