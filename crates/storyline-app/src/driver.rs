//! Driver trait for abstracting host I/O.
//!
//! The [`Driver`] trait decouples the viewer runtime from a specific host.
//! Each frontend implements the trait to deliver input and draw frames, while
//! the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use storyline_core::Timestamp;

use crate::{ViewFrame, ViewerEvent};

/// Abstracts host I/O for the viewer runtime.
///
/// Implementations provide platform-specific input and drawing while the
/// generic [`Runtime`](crate::Runtime) handles orchestration logic. This
/// ensures the same orchestration code runs in the terminal demo and in
/// simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for input, ratatui for drawing
/// - **Simulation**: scripted events on a virtual clock, recorded actions
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Timestamp;

    /// Poll for the next input event.
    ///
    /// Returns the next ready event or `None` if no events are ready. Must
    /// not wait for input.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<ViewerEvent>, Self::Error>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Draw a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    fn render(&mut self, frame: &ViewFrame<'_>) -> Result<(), Self::Error>;

    /// Ask the host pager to scroll to `target`.
    ///
    /// The host answers later through `PageVisible` and `PageSettled` events.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered.
    fn request_page_change(&mut self, target: usize) -> Result<(), Self::Error>;

    /// An item started playing. Hosts use this to start media.
    fn item_started(&mut self, page: usize, item: usize) {
        let _ = (page, item);
    }

    /// Dismiss the viewer and release host resources.
    fn close(&mut self);
}
