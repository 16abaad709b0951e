//! Environment abstraction for deterministic testing.
//!
//! Decouples playback logic from the wall clock. Production hosts use
//! `std::time::Instant` and a real frame sleep; the simulation harness uses a
//! virtual clock that only moves when the test says so.

use std::{ops::Sub, time::Duration};

/// A point in time the state machines can measure elapsed durations between.
///
/// Blanket-implemented for every type with the right shape, so both
/// `std::time::Instant` and virtual instants qualify.
pub trait Timestamp: Copy + Ord + Send + Sync + Sub<Output = Duration> {}

impl<T> Timestamp for T where T: Copy + Ord + Send + Sync + Sub<Output = Duration> {}

/// Abstract environment providing time and frame pacing.
///
/// # Invariants
///
/// Implementations MUST guarantee that `now()` never goes backwards within a
/// single execution context. Timer progress relies on it to stay monotonic.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Timestamp;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only the runtime uses this, to pace frames. State machines never sleep.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
