//! Application layer for Storyline
//!
//! Host-facing composition of the core state machines plus a generic runtime,
//! enabling deterministic simulation testing with the same code that runs in
//! a real host.
//!
//! # Components
//!
//! - [`Viewer`]: viewer state machine (pager signals, pointer input, frames)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic frame loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
mod input;
mod runtime;
mod state;
mod viewer;

pub use action::ViewerAction;
pub use driver::Driver;
pub use event::ViewerEvent;
pub use input::PointerInput;
pub use runtime::{DEFAULT_FRAME_INTERVAL, Runtime, RuntimeConfig};
pub use state::{PageView, ViewFrame};
pub use viewer::{Viewer, ViewerConfig};
