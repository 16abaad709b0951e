//! Story session state machine.
//!
//! Orchestrates the item cursor and timer of the live page, reacts to page
//! transitions and classified gestures, and tells the host what to do through
//! [`SessionAction`]s. Like every state machine in this crate it is pure:
//! time comes in as a parameter, side effects go out as actions.
//!
//! # State Machine
//!
//! ```text
//!              Activate(p)
//! ┌─────────┐ ───────────> ┌───────────┐  advance/retreat within user
//! │ Loading │              │  Playing  │ <──────────────────────────┐
//! └─────────┘ <─────────── └───────────┘ ───────────────────────────┘
//!      ↑      Deactivate(p)  │    │    │
//!      │   last item done    │    │    │ first item, TapLeft
//!      │   (next page)       ↓    │    ↓  (previous page)
//!      │              ┌──────────┐│ ┌────────────┐
//!      └──────────────│ Finished ││ │ Retreating │
//!       Deactivate(p) └──────────┘│ └────────────┘
//!                                 │ CommitClose / Dismiss /
//!                                 ↓ last item of last page
//!                            ┌─────────┐
//!                            │ Closing │ (terminal)
//!                            └─────────┘
//! ```
//!
//! Exactly one timer exists per session and it only runs in `Playing`, so no
//! two pages can ever have a live timer at once.

use std::{sync::Arc, time::Duration};

use tracing::{debug, trace, warn};

use crate::{
    catalog::{StoryCatalog, StoryItem},
    cursor::{CursorMove, ItemCursor},
    env::Timestamp,
    gesture::GestureEvent,
    pager::PageTransition,
    timer::{TimerDriver, TimerToken},
};

/// Duration of the spring animation that returns an undone drag to rest.
pub const DEFAULT_SNAP_BACK: Duration = Duration::from_millis(300);

/// Angular frequency of the critically damped snap-back spring (rad/s).
pub const DEFAULT_SPRING_FREQUENCY: f32 = 20.0;

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// How long the snap-back animation runs before landing at rest
    pub snap_back: Duration,
    /// Spring angular frequency for the snap-back easing
    pub spring_frequency: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { snap_back: DEFAULT_SNAP_BACK, spring_frequency: DEFAULT_SPRING_FREQUENCY }
    }
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No page is live yet, or the live page was scrolled away.
    Loading,
    /// Page is live and its timer runs.
    Playing {
        /// Live page
        page: usize,
    },
    /// Last item played out; waiting for the host to show the next page.
    Finished {
        /// Page that finished
        page: usize,
        /// Page requested from the host
        next: usize,
    },
    /// Backed off the first item; waiting for the host to show the previous
    /// page.
    Retreating {
        /// Page that was retreated from
        page: usize,
        /// Page requested from the host
        previous: usize,
    },
    /// Viewer dismissed. Terminal.
    Closing,
}

/// Phase of the live page's playback cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Page shown but not playing (handoff pending).
    Idle,
    /// Timer running.
    Playing,
    /// Viewer closing.
    Closing,
}

/// Read model of the live page's playback position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    /// Page (user) index.
    pub user_index: usize,
    /// Item within the user.
    pub item_index: usize,
    /// Progress through the item, `0.0..=1.0`.
    pub progress_ratio: f32,
    /// Playback phase.
    pub phase: PlaybackPhase,
}

/// Visual drag feedback for the live page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragVisual {
    /// Downward offset in pixels.
    pub offset: f32,
    /// Page scale.
    pub scale: f32,
    /// Page drawn above its neighbours while dragged.
    pub elevated: bool,
}

impl Default for DragVisual {
    fn default() -> Self {
        Self { offset: 0.0, scale: 1.0, elevated: false }
    }
}

#[derive(Debug, Clone, Copy)]
struct Spring<I> {
    from: DragVisual,
    started_at: I,
}

/// Inputs to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Page activation change from the pager tracker.
    Page(PageTransition),
    /// Classified gesture.
    Gesture(GestureEvent),
    /// Host-initiated dismiss (back button, navigation away).
    Dismiss,
}

/// Instructions for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// An item started playing from zero.
    ItemStarted {
        /// Page of the item
        page: usize,
        /// Item index within the page
        item: usize,
    },
    /// Ask the host pager to scroll to a page.
    RequestPageChange {
        /// Page to show
        target: usize,
    },
    /// Dismiss the viewer. Emitted at most once per session.
    Close,
}

/// Story playback state machine.
///
/// Owns the single timer and the cursor of the live page. The catalog is
/// shared read-only.
#[derive(Debug, Clone)]
pub struct Session<I> {
    catalog: Arc<StoryCatalog>,
    config: SessionConfig,
    state: SessionState,
    /// Cursor of the live page. `None` while loading.
    cursor: Option<ItemCursor>,
    timer: TimerDriver<I>,
    drag: DragVisual,
    spring: Option<Spring<I>>,
    /// Progress shown after closing
    closing_progress: f32,
}

impl<I: Timestamp> Session<I> {
    /// Create a session in [`SessionState::Loading`].
    pub fn new(catalog: Arc<StoryCatalog>, config: SessionConfig) -> Self {
        Self {
            catalog,
            config,
            state: SessionState::Loading,
            cursor: None,
            timer: TimerDriver::new(),
            drag: DragVisual::default(),
            spring: None,
            closing_progress: 0.0,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Catalog being played.
    pub fn catalog(&self) -> &Arc<StoryCatalog> {
        &self.catalog
    }

    /// Whether the session has closed.
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closing
    }

    /// Page whose cursor is held. `None` while loading.
    pub fn active_page(&self) -> Option<usize> {
        self.cursor.map(|cursor| cursor.user_index())
    }

    /// Whether the item timer is running.
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Token of the running item timer.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// Drag feedback for the live page.
    pub fn drag(&self) -> DragVisual {
        self.drag
    }

    /// Playback position of the live page. `None` while loading.
    pub fn cursor(&self, now: I) -> Option<PlaybackCursor> {
        let cursor = self.cursor?;
        let (progress_ratio, phase) = match self.state {
            SessionState::Playing { .. } => (self.timer.ratio(now), PlaybackPhase::Playing),
            SessionState::Finished { .. } => (1.0, PlaybackPhase::Idle),
            SessionState::Retreating { .. } | SessionState::Loading => (0.0, PlaybackPhase::Idle),
            SessionState::Closing => (self.closing_progress, PlaybackPhase::Closing),
        };

        Some(PlaybackCursor {
            user_index: cursor.user_index(),
            item_index: cursor.item_index(),
            progress_ratio,
            phase,
        })
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent, now: I) -> Vec<SessionAction> {
        match event {
            SessionEvent::Page(PageTransition::Activate(page)) => self.activate(page, now),
            SessionEvent::Page(PageTransition::Deactivate(page)) => {
                self.deactivate(page);
                Vec::new()
            },
            SessionEvent::Gesture(GestureEvent::TapLeft) => self.retreat(now),
            SessionEvent::Gesture(GestureEvent::TapRight) => self.advance(now),
            SessionEvent::Gesture(GestureEvent::VerticalDrag { dy, scale }) => {
                self.drag_to(dy, scale);
                Vec::new()
            },
            SessionEvent::Gesture(GestureEvent::SnapBack) => {
                self.snap_back(now);
                Vec::new()
            },
            SessionEvent::Gesture(GestureEvent::CommitClose) | SessionEvent::Dismiss => {
                self.close(now)
            },
        }
    }

    /// Make `page` the live page and start its first item.
    ///
    /// Any other live page is deactivated first, so its timer is gone before
    /// the new one starts.
    pub fn activate(&mut self, page: usize, now: I) -> Vec<SessionAction> {
        if self.is_closed() {
            return Vec::new();
        }
        let Some(cursor) = ItemCursor::for_page(&self.catalog, page) else {
            warn!(page, pages = self.catalog.len(), "ignoring activation of unknown page");
            return Vec::new();
        };

        if let Some(previous) = self.active_page() {
            self.deactivate(previous);
        }

        self.cursor = Some(cursor);
        self.state = SessionState::Playing { page };
        self.timer.start(self.item_duration(page, 0), now);

        debug!(page, items = cursor.item_count(), "page activated");
        vec![SessionAction::ItemStarted { page, item: 0 }]
    }

    /// Page scrolled away: drop its cursor and timer.
    ///
    /// Progress is not kept; activating the page again restarts it. Safe to
    /// call for a page that is not live.
    pub fn deactivate(&mut self, page: usize) {
        if self.active_page() != Some(page) {
            trace!(page, "deactivate for page that is not live");
            return;
        }

        self.timer.cancel();
        self.cursor = None;
        self.drag = DragVisual::default();
        self.spring = None;
        if !self.is_closed() {
            self.state = SessionState::Loading;
        }

        debug!(page, "page deactivated");
    }

    /// Frame tick: animate the snap-back spring and play out the item timer.
    pub fn tick(&mut self, now: I) -> Vec<SessionAction> {
        self.animate_spring(now);

        if matches!(self.state, SessionState::Playing { .. })
            && let Some(token) = self.timer.poll(now)
        {
            trace!(generation = token.generation(), "item timer completed");
            return self.step_forward(now);
        }

        Vec::new()
    }

    /// Skip to the next item now (tap on the right side).
    pub fn advance(&mut self, now: I) -> Vec<SessionAction> {
        if !matches!(self.state, SessionState::Playing { .. }) {
            debug!(state = ?self.state, "ignoring advance while not playing");
            return Vec::new();
        }

        self.timer.cancel();
        self.step_forward(now)
    }

    /// Go back one item (tap on the left side).
    pub fn retreat(&mut self, now: I) -> Vec<SessionAction> {
        let (SessionState::Playing { page }, Some(mut cursor)) = (self.state, self.cursor) else {
            debug!(state = ?self.state, "ignoring retreat while not playing");
            return Vec::new();
        };

        match cursor.retreat() {
            CursorMove::Moved(item) => {
                self.cursor = Some(cursor);
                self.timer.start(self.item_duration(page, item), now);
                debug!(page, item, "retreated to item");
                vec![SessionAction::ItemStarted { page, item }]
            },
            CursorMove::ExhaustedBackward if page > 0 => {
                let previous = page - 1;
                self.timer.cancel();
                self.state = SessionState::Retreating { page, previous };
                debug!(page, previous, "first item, requesting previous page");
                vec![SessionAction::RequestPageChange { target: previous }]
            },
            CursorMove::ExhaustedBackward | CursorMove::ExhaustedForward => {
                trace!(page, "retreat at first item of first page");
                Vec::new()
            },
        }
    }

    /// Live vertical drag feedback. Purely visual; the timer keeps running.
    pub fn drag_to(&mut self, dy: f32, scale: f32) {
        if self.is_closed() {
            return;
        }
        self.spring = None;
        self.drag = DragVisual { offset: dy.max(0.0), scale, elevated: true };
    }

    /// Start animating an undone drag back to rest.
    pub fn snap_back(&mut self, now: I) {
        if self.is_closed() {
            return;
        }
        self.spring = Some(Spring { from: self.drag, started_at: now });
    }

    /// Close the viewer. Cancels the timer before anything else.
    ///
    /// Returns `Close` the first time only.
    pub fn close(&mut self, now: I) -> Vec<SessionAction> {
        if self.is_closed() {
            return Vec::new();
        }

        self.closing_progress = match self.state {
            SessionState::Playing { .. } => self.timer.ratio(now),
            SessionState::Finished { .. } => 1.0,
            SessionState::Loading | SessionState::Retreating { .. } | SessionState::Closing => 0.0,
        };
        self.timer.cancel();
        self.spring = None;
        self.state = SessionState::Closing;

        debug!(page = ?self.active_page(), "session closing");
        vec![SessionAction::Close]
    }

    /// Move past the current item: next item, next page or close.
    fn step_forward(&mut self, now: I) -> Vec<SessionAction> {
        let (SessionState::Playing { page }, Some(mut cursor)) = (self.state, self.cursor) else {
            return Vec::new();
        };

        match cursor.advance() {
            CursorMove::Moved(item) => {
                self.cursor = Some(cursor);
                self.timer.start(self.item_duration(page, item), now);
                debug!(page, item, "advanced to item");
                vec![SessionAction::ItemStarted { page, item }]
            },
            CursorMove::ExhaustedForward | CursorMove::ExhaustedBackward => {
                let next = page + 1;
                if self.catalog.has_page(next) {
                    self.timer.cancel();
                    self.state = SessionState::Finished { page, next };
                    debug!(page, next, "last item done, requesting next page");
                    vec![SessionAction::RequestPageChange { target: next }]
                } else {
                    debug!(page, "last item of last page done");
                    self.close(now)
                }
            },
        }
    }

    fn item_duration(&self, page: usize, item: usize) -> Duration {
        let duration = self.catalog.item(page, item).map(StoryItem::duration);
        debug_assert!(duration.is_some(), "cursor out of catalog bounds");
        duration.unwrap_or(Duration::ZERO)
    }

    fn animate_spring(&mut self, now: I) {
        let Some(spring) = self.spring else {
            return;
        };

        let elapsed = now - spring.started_at;
        if elapsed >= self.config.snap_back {
            self.drag = DragVisual::default();
            self.spring = None;
            return;
        }

        let decay = spring_decay(self.config.spring_frequency, elapsed.as_secs_f32());
        self.drag = DragVisual {
            offset: spring.from.offset * decay,
            scale: 1.0 - (1.0 - spring.from.scale) * decay,
            elevated: true,
        };
    }
}

/// Remaining displacement fraction of a critically damped spring released
/// from rest-velocity at `t` seconds.
fn spring_decay(frequency: f32, t: f32) -> f32 {
    let wt = frequency * t;
    ((1.0 + wt) * (-wt).exp()).clamp(0.0, 1.0)
}
