//! Virtual-time environment for deterministic simulation.
//!
//! `SimEnv` replaces the wall clock with a counter that only moves when the
//! simulation says so. Sleeping advances the clock instead of waiting, so a
//! minute of playback runs in microseconds and every run is identical.

use std::{
    ops::{Add, Sub},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use storyline_core::Environment;

/// Instant on the virtual clock: time since the simulation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Start of the simulation.
    pub const EPOCH: Self = Self(Duration::ZERO);

    /// Instant `offset` after the start of the simulation.
    pub const fn from_start(offset: Duration) -> Self {
        Self(offset)
    }

    /// Time since the start of the simulation.
    pub fn since_start(self) -> Duration {
        self.0
    }

    /// Whole milliseconds since the start of the simulation.
    pub fn as_millis(self) -> u64 {
        self.0.as_millis() as u64
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    /// Saturates at zero, like `std::time::Instant`.
    fn sub(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, offset: Duration) -> Self {
        Self(self.0 + offset)
    }
}

/// Environment backed by a shared virtual clock.
///
/// Clones share the clock, so a driver and a runtime holding separate copies
/// always agree on the time.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    /// Nanoseconds since the start of the simulation
    clock: Arc<AtomicU64>,
}

impl SimEnv {
    /// Create an environment at the start of the simulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.clock.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Time since the start of the simulation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.clock.load(Ordering::SeqCst))
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> Self::Instant {
        SimInstant(self.elapsed())
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }
}
