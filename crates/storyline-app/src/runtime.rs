//! Generic runtime for viewer orchestration.
//!
//! The Runtime drives the frame loop, coordinating between:
//! - [`Viewer`]: story playback state machine
//! - [`Driver`]: platform-specific I/O
//! - [`Environment`]: frame pacing

use std::time::Duration;

use storyline_core::Environment;
use tracing::{debug, trace};

use crate::{Driver, Viewer, ViewerAction, ViewerEvent};

/// Interval between frame ticks (about 60 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Time slept between frames
    pub frame_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { frame_interval: DEFAULT_FRAME_INTERVAL }
    }
}

/// Generic runtime that orchestrates Viewer and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for frame pacing
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    viewer: Viewer<E::Instant>,
    config: RuntimeConfig,
    closed: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime around a viewer that has not been opened yet.
    pub fn new(driver: D, env: E, viewer: Viewer<E::Instant>, config: RuntimeConfig) -> Self {
        Self { driver, env, viewer, config, closed: false }
    }

    /// Run the frame loop until the viewer closes.
    ///
    /// Each frame:
    /// 1. Drains ready input events from the driver into the viewer
    /// 2. Ticks the viewer (timers, pager quiet period, snap-back)
    /// 3. Executes the resulting actions through the driver
    /// 4. Sleeps for the frame interval
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.open()?;

        while !self.step().await? {
            self.env.sleep(self.config.frame_interval).await;
        }

        Ok(())
    }

    /// Open the viewer on its initial page. Only the first call has an
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub fn open(&mut self) -> Result<bool, D::Error> {
        let now = self.driver.now();
        let actions = self.viewer.open(now);
        self.process_actions(actions)
    }

    /// Run one frame without sleeping.
    ///
    /// Returns `true` once the viewer has closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        if self.closed {
            return Ok(true);
        }

        while let Some(event) = self.driver.poll_event().await? {
            trace!(?event, "input");
            let now = self.driver.now();
            let actions = self.viewer.handle(event, now);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let actions = self.viewer.handle(ViewerEvent::Frame, now);
        self.process_actions(actions)
    }

    /// Execute actions returned by the viewer.
    ///
    /// Returns `true` if the viewer closed.
    fn process_actions(&mut self, actions: Vec<ViewerAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                ViewerAction::Render => {
                    let now = self.driver.now();
                    let frame = self.viewer.frame(now);
                    self.driver.render(&frame)?;
                },
                ViewerAction::ItemStarted { page, item } => {
                    self.driver.item_started(page, item);
                },
                ViewerAction::RequestPageChange { target } => {
                    debug!(target, "requesting page change");
                    self.driver.request_page_change(target)?;
                },
                ViewerAction::Close => {
                    debug!("viewer closed");
                    self.closed = true;
                    self.driver.close();
                    return Ok(true);
                },
            }
        }
        Ok(self.closed)
    }

    /// Get a reference to the Viewer
    pub fn viewer(&self) -> &Viewer<E::Instant> {
        &self.viewer
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Environment pacing the frame loop.
    pub fn env(&self) -> &E {
        &self.env
    }
}
