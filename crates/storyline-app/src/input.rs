//! Host-agnostic pointer input.

/// One step of a touch or mouse track, in viewport coordinates.
///
/// Decouples the viewer from platform input APIs (touch events, terminal
/// mouse reports) so the same track can be replayed in simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Pointer pressed.
    Down {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Pointer moved while pressed.
    Move {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Pointer released.
    Up {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Track interrupted by the system.
    Cancel,
}
