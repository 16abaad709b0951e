//! Scripted end-to-end runs through the real runtime.
//!
//! A [`Scenario`] wires a [`Viewer`] to a [`SimDriver`] and a [`SimEnv`]
//! inside the production [`Runtime`], lets the test script input on the
//! virtual clock, then runs frame by frame while checking invariants after
//! every frame.

use std::{convert::Infallible, sync::Arc, time::Duration};

use storyline_app::{PageView, Runtime, RuntimeConfig, Viewer, ViewerConfig};
use storyline_core::{Environment, SessionError, SessionState, StoryCatalog};
use tracing::debug;

use crate::{
    invariants::{InvariantRegistry, SystemSnapshot, ViewerSnapshot, Violation},
    sim_driver::SimDriver,
    sim_env::{SimEnv, SimInstant},
    trace::{TraceAction, TraceEntry, TraceExt},
};

/// Upper bound on simulated time for a run that never closes.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(120);

/// Result of a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Host-visible actions.
    pub trace: Vec<TraceEntry>,
    /// Whether the viewer closed.
    pub closed: bool,
    /// Simulated time at the end of the run.
    pub elapsed: Duration,
    /// Frames drawn.
    pub renders: usize,
    /// Last drawn read model.
    pub last_view: Option<PageView>,
    /// Session state at the end of the run.
    pub final_state: SessionState,
    /// Invariant violations, with the time they were seen.
    pub violations: Vec<(u64, Violation)>,
}

/// Scripted run of one viewer.
pub struct Scenario {
    env: SimEnv,
    driver: SimDriver,
    viewer: Viewer<SimInstant>,
    runtime_config: RuntimeConfig,
    max_duration: Duration,
    invariants: InvariantRegistry,
}

impl Scenario {
    /// Scenario opening on the first page with default configuration.
    ///
    /// # Errors
    ///
    /// Never for a validated catalog; see [`Scenario::opening_on`].
    pub fn new(catalog: Arc<StoryCatalog>) -> Result<Self, SessionError> {
        Self::opening_on(catalog, 0, ViewerConfig::default())
    }

    /// Scenario opening on `page`.
    ///
    /// # Errors
    ///
    /// - `SessionError::InitialPageOutOfRange` if the catalog has no such page
    pub fn opening_on(
        catalog: Arc<StoryCatalog>,
        page: usize,
        config: ViewerConfig,
    ) -> Result<Self, SessionError> {
        let env = SimEnv::new();
        Ok(Self {
            driver: SimDriver::new(env.clone()),
            env,
            viewer: Viewer::new(catalog, page, config)?,
            runtime_config: RuntimeConfig::default(),
            max_duration: DEFAULT_MAX_DURATION,
            invariants: InvariantRegistry::standard(),
        })
    }

    /// Driver to script input on.
    pub fn driver(&self) -> &SimDriver {
        &self.driver
    }

    /// Replace the driver's page-follow behaviour.
    #[must_use]
    pub fn with_follow_delay(mut self, delay: Option<Duration>) -> Self {
        self.driver = self.driver.with_follow_delay(delay);
        self
    }

    /// Stop after this much simulated time even if the viewer is open.
    #[must_use]
    pub fn with_max_duration(mut self, max: Duration) -> Self {
        self.max_duration = max;
        self
    }

    /// Change the frame interval.
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.runtime_config.frame_interval = interval;
        self
    }

    /// Run until the viewer closes or the time limit passes.
    pub async fn run(self) -> ScenarioOutcome {
        let Self { env, driver, viewer, runtime_config, max_duration, invariants } = self;
        let mut runtime = Runtime::new(driver.clone(), env.clone(), viewer, runtime_config);
        let mut violations = Vec::new();

        let mut closed = never_fails(runtime.open());
        loop {
            check(&invariants, &runtime, &driver, &env, &mut violations);
            if closed || env.elapsed() >= max_duration {
                break;
            }
            env.sleep(runtime_config.frame_interval).await;
            closed = never_fails(runtime.step().await);
        }

        debug!(elapsed = ?env.elapsed(), closed, "scenario finished");
        ScenarioOutcome {
            trace: driver.trace(),
            closed,
            elapsed: env.elapsed(),
            renders: driver.renders(),
            last_view: driver.last_view(),
            final_state: runtime.viewer().session().state(),
            violations,
        }
    }
}

fn never_fails<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn check(
    invariants: &InvariantRegistry,
    runtime: &Runtime<SimDriver, SimEnv>,
    driver: &SimDriver,
    env: &SimEnv,
    violations: &mut Vec<(u64, Violation)>,
) {
    let closes = driver.trace().count(TraceAction::Close);
    let snapshot = ViewerSnapshot::capture(runtime.viewer(), env.now(), closes);
    if let Err(found) = invariants.check_all(&SystemSnapshot::single(snapshot)) {
        let at = env.now().as_millis();
        violations.extend(found.into_iter().map(|violation| (at, violation)));
    }
}
