//! Deterministic simulation harness for Storyline playback testing.
//!
//! Virtual-clock implementations of the Environment and Driver traits for
//! deterministic, reproducible testing of timers, gestures and pager
//! handoffs.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and real implementation,
//! and their observable states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the playback
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chaos_pager;
pub mod invariants;
pub mod model;
pub mod scenario;
pub mod sim_driver;
pub mod sim_env;
pub mod trace;

pub use chaos_pager::ChaosPager;
pub use invariants::{
    CloseOnce, CursorInBounds, Invariant, InvariantKind, InvariantRegistry, InvariantResult,
    PagerAgreement, ProgressInRange, SingleLiveTimer, SystemSnapshot, ViewerSnapshot, Violation,
};
pub use model::{MODEL_FRAME, ModelViewer, ObservableState, Operation, RealViewer};
pub use scenario::{Scenario, ScenarioOutcome};
pub use sim_driver::SimDriver;
pub use sim_env::{SimEnv, SimInstant};
pub use trace::{TraceAction, TraceEntry, TraceExt};
