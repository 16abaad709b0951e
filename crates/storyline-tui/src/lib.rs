//! Terminal UI for Storyline
//!
//! A thin shell over [`storyline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic
//! [`storyline_app::Runtime`].
//!
//! This crate only handles input mapping, catalog loading and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod catalog;
pub mod input;
pub mod system_env;
pub mod terminal;
pub mod ui;

pub use catalog::{CatalogSourceError, DemoCatalog, load_catalog};
pub use input::{InputState, KeyInput, MouseInput};
pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, TerminalError};
