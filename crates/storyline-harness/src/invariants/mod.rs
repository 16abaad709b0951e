//! Invariant checking for deterministic simulation testing.
//!
//! Playback invariants hold after every event a viewer processes, whatever
//! the user and host did before. Scenario runs check them on every frame;
//! model-based tests and fuzzers check them after every operation.
//!
//! # Architecture
//!
//! A [`ViewerSnapshot`] captures what can be observed of one viewer at one
//! instant (session state, timer, tracker page, read model, closes seen by
//! the host). Each [`Invariant`] inspects snapshots and names itself with an
//! [`InvariantKind`] so failures are easy to triage.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::single(ViewerSnapshot::capture(&viewer, now, closes));
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{CloseOnce, CursorInBounds, PagerAgreement, ProgressInRange, SingleLiveTimer};
pub use snapshot::{SystemSnapshot, ViewerSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// See [`SingleLiveTimer`].
    SingleLiveTimer,
    /// See [`CursorInBounds`].
    CursorInBounds,
    /// See [`ProgressInRange`].
    ProgressInRange,
    /// See [`CloseOnce`].
    CloseOnce,
    /// See [`PagerAgreement`].
    PagerAgreement,
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

/// A playback property checked against snapshots.
pub trait Invariant: Send + Sync {
    /// Which invariant this is.
    fn kind(&self) -> InvariantKind;

    /// Inspect every viewer in `state`; the first offending viewer is
    /// reported.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Set of invariants run together.
///
/// [`InvariantRegistry::standard()`] holds everything a healthy viewer
/// satisfies. Tests that exercise deliberately broken hosts can build a
/// narrower set with [`InvariantRegistry::add`].
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvariantRegistry").field("invariants", &self.kinds()).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard playback invariants.
    ///
    /// Includes:
    /// - [`SingleLiveTimer`]: the timer runs only on the playing page
    /// - [`CursorInBounds`]: the cursor points at a real item
    /// - [`ProgressInRange`]: progress and drag feedback stay in range
    /// - [`CloseOnce`]: close is emitted exactly once when closed
    /// - [`PagerAgreement`]: the session plays the settled page
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(SingleLiveTimer);
        registry.add(CursorInBounds);
        registry.add(ProgressInRange);
        registry.add(CloseOnce);
        registry.add(PagerAgreement);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every invariant. All violations are collected, not just the
    /// first.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        for invariant in &self.invariants {
            if let Err(violation) = invariant.check(state) {
                violations.push(violation);
            }
        }

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every invariant and panic with all violations and `context`.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: String =
            violations.iter().map(|violation| format!("\n  - {violation}")).collect();
        panic!("playback invariants broken {context}:{report}");
    }

    /// Number of invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no invariant is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }

    /// Kinds of the registered invariants, in check order.
    pub fn kinds(&self) -> Vec<InvariantKind> {
        self.invariants.iter().map(|invariant| invariant.kind()).collect()
    }
}
