//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`storyline_app::Runtime`] orchestration code runs in both the demo host
//! and simulation.
//!
//! Input is scripted ahead of time on the virtual clock. Page requests are
//! followed like a real pager would: after a short scroll latency the driver
//! reports the target page as visible and settles.

use std::{
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use storyline_app::{Driver, PageView, PointerInput, ViewFrame, ViewerEvent};
use storyline_core::{Environment, SessionState};

use crate::{
    sim_env::{SimEnv, SimInstant},
    trace::{TraceAction, TraceEntry},
};

/// Latency between a page request and the pager reporting the new page.
pub const DEFAULT_FOLLOW_DELAY: Duration = Duration::from_millis(1);

/// Shared state for event injection.
///
/// Lets tests script input and read results while the runtime owns the
/// driver.
#[derive(Debug, Default)]
struct SharedState {
    /// Pending input, ordered by due time
    scheduled: Vec<(SimInstant, ViewerEvent)>,
    /// Follow page requests like a real pager. `None` ignores them.
    follow_delay: Option<Duration>,
    trace: Vec<TraceEntry>,
    renders: usize,
    last_view: Option<PageView>,
    last_state: Option<SessionState>,
    closed: bool,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] so the same [`storyline_app::Runtime`]
/// orchestration code runs in both the terminal host and simulation tests.
/// Clones share state.
#[derive(Debug, Clone)]
pub struct SimDriver {
    env: SimEnv,
    state: Arc<Mutex<SharedState>>,
}

impl SimDriver {
    /// Create a driver on `env`'s clock that follows page requests.
    pub fn new(env: SimEnv) -> Self {
        let state = SharedState { follow_delay: Some(DEFAULT_FOLLOW_DELAY), ..Default::default() };
        Self { env, state: Arc::new(Mutex::new(state)) }
    }

    /// Change how page requests are followed. `None` ignores them, leaving
    /// the viewer waiting on its handoff.
    #[must_use]
    pub fn with_follow_delay(self, delay: Option<Duration>) -> Self {
        self.lock().follow_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `event` once the clock reaches `at` (time since start).
    pub fn schedule(&self, at: Duration, event: ViewerEvent) {
        self.lock().push(SimInstant::from_start(at), event);
    }

    /// Deliver `event` on the next poll.
    pub fn inject(&self, event: ViewerEvent) {
        let now = self.env.now();
        self.lock().push(now, event);
    }

    /// Schedule a tap released at `(x, y)`.
    pub fn schedule_tap(&self, at: Duration, x: f32, y: f32) {
        self.schedule(at, ViewerEvent::Pointer(PointerInput::Down { x, y }));
        self.schedule(at, ViewerEvent::Pointer(PointerInput::Up { x, y }));
    }

    /// Schedule a vertical drag from `from_y` to `to_y`, one move per step.
    pub fn schedule_drag(&self, at: Duration, x: f32, from_y: f32, to_y: f32, steps: usize) {
        self.schedule(at, ViewerEvent::Pointer(PointerInput::Down { x, y: from_y }));
        let steps = steps.max(1);
        for step in 1..=steps {
            let y = from_y + (to_y - from_y) * step as f32 / steps as f32;
            self.schedule(at, ViewerEvent::Pointer(PointerInput::Move { x, y }));
        }
        self.schedule(at, ViewerEvent::Pointer(PointerInput::Up { x, y: to_y }));
    }

    /// Schedule a user swipe that passes through `visible` before settling.
    pub fn schedule_swipe(&self, at: Duration, visible: &[Option<usize>]) {
        for &page in visible {
            self.schedule(at, ViewerEvent::PageVisible(page));
        }
        self.schedule(at, ViewerEvent::PageSettled);
    }

    /// Whether scripted input is still waiting.
    pub fn has_pending(&self) -> bool {
        !self.lock().scheduled.is_empty()
    }

    /// Recorded host-visible actions.
    pub fn trace(&self) -> Vec<TraceEntry> {
        self.lock().trace.clone()
    }

    /// Number of frames drawn.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// Read model of the last drawn frame.
    pub fn last_view(&self) -> Option<PageView> {
        self.lock().last_view
    }

    /// Session state of the last drawn frame.
    pub fn last_state(&self) -> Option<SessionState> {
        self.lock().last_state
    }

    /// Whether the viewer asked to close.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn record(&self, action: TraceAction) {
        let at_ms = self.env.now().as_millis();
        self.lock().trace.push(TraceEntry { at_ms, action });
    }
}

impl SharedState {
    /// Insert keeping due-time order; equal times keep insertion order.
    fn push(&mut self, at: SimInstant, event: ViewerEvent) {
        let index = self.scheduled.partition_point(|(due, _)| *due <= at);
        self.scheduled.insert(index, (at, event));
    }
}

impl Driver for SimDriver {
    type Error = Infallible;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<ViewerEvent>, Self::Error> {
        let now = self.env.now();
        let mut state = self.lock();

        match state.scheduled.first() {
            Some((due, _)) if *due <= now => Ok(Some(state.scheduled.remove(0).1)),
            _ => Ok(None),
        }
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, frame: &ViewFrame<'_>) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.renders += 1;
        state.last_view = frame.view;
        state.last_state = Some(frame.state);
        Ok(())
    }

    fn request_page_change(&mut self, target: usize) -> Result<(), Self::Error> {
        self.record(TraceAction::PageRequested { target });

        let now = self.env.now();
        let mut state = self.lock();
        if let Some(delay) = state.follow_delay {
            state.push(now + delay, ViewerEvent::PageVisible(Some(target)));
            state.push(now + delay, ViewerEvent::PageSettled);
        }
        Ok(())
    }

    fn item_started(&mut self, page: usize, item: usize) {
        self.record(TraceAction::ItemStarted { page, item });
    }

    fn close(&mut self) {
        self.record(TraceAction::Close);
        self.lock().closed = true;
    }
}
