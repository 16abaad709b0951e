//! Core state machines for Storyline story playback.
//!
//! Everything in this crate is sans-IO: methods take the current time as a
//! parameter and return what happened, so the same code runs under a real
//! frame loop and under a virtual clock in simulation.
//!
//! # Components
//!
//! - [`TimerDriver`]: per-item progress ratio with cancel-replaces semantics
//! - [`ItemCursor`]: bounded pointer into one user's items
//! - [`GestureInterpreter`]: classifies a pointer track into taps and drags
//! - [`PageActivationTracker`]: turns pager visibility into page activation
//! - [`Session`]: orchestrates the above into the playback state machine

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod catalog;
pub mod cursor;
pub mod env;
pub mod error;
pub mod gesture;
pub mod pager;
pub mod session;
pub mod timer;

pub use catalog::{MediaKind, StoryCatalog, StoryItem, UserStories};
pub use cursor::{CursorMove, ItemCursor};
pub use env::{Environment, Timestamp};
pub use error::{CatalogError, SessionError};
pub use gesture::{DragState, GestureConfig, GestureEvent, GestureInterpreter, Point, Viewport};
pub use pager::{PageActivationTracker, PageTransition, PagerConfig};
pub use session::{
    DragVisual, PlaybackCursor, PlaybackPhase, Session, SessionAction, SessionConfig,
    SessionEvent, SessionState,
};
pub use timer::{TimerDriver, TimerToken};
