//! Story viewer state machine.
//!
//! This module defines the [`Viewer`], which composes the page activation
//! tracker, the gesture interpreter and the story session behind a single
//! event-in, action-out interface for hosts.
//!
//! This is a pure state machine: it consumes [`crate::ViewerEvent`] inputs and
//! produces [`crate::ViewerAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes pager visibility and settle events through the activation tracker
//!   and forwards the resulting transitions to the session.
//! - Runs pointer tracks through the gesture interpreter and forwards the
//!   classified gestures to the session.
//! - Ticks timers and animations on every frame.
//! - Builds the read model used for rendering.

use std::sync::Arc;

use storyline_core::{
    DragState, GestureConfig, GestureEvent, GestureInterpreter, PageActivationTracker,
    PageTransition, PagerConfig, Point, Session, SessionAction, SessionConfig, SessionError,
    SessionEvent, SessionState, StoryCatalog, Timestamp, Viewport,
};
use tracing::debug;

use crate::{PageView, PointerInput, ViewFrame, ViewerAction, ViewerEvent};

/// Viewer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerConfig {
    /// Gesture thresholds.
    pub gesture: GestureConfig,
    /// Page activation settings.
    pub pager: PagerConfig,
    /// Session animation settings.
    pub session: SessionConfig,
    /// Viewport at open.
    pub viewport: Viewport,
}

/// Story viewer state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct Viewer<I> {
    session: Session<I>,
    tracker: PageActivationTracker<I>,
    gestures: GestureInterpreter,
    initial_page: usize,
    opened: bool,
}

impl<I: Timestamp> Viewer<I> {
    /// Create a viewer that will open on `initial_page`.
    ///
    /// # Errors
    ///
    /// - `SessionError::InitialPageOutOfRange` if the catalog has no such page
    pub fn new(
        catalog: Arc<StoryCatalog>,
        initial_page: usize,
        config: ViewerConfig,
    ) -> Result<Self, SessionError> {
        let page_count = catalog.len();
        if initial_page >= page_count {
            return Err(SessionError::InitialPageOutOfRange { page: initial_page, page_count });
        }

        Ok(Self {
            session: Session::new(catalog, config.session),
            tracker: PageActivationTracker::new(page_count, config.pager),
            gestures: GestureInterpreter::new(config.gesture, config.viewport),
            initial_page,
            opened: false,
        })
    }

    /// Catalog being played.
    pub fn catalog(&self) -> &Arc<StoryCatalog> {
        self.session.catalog()
    }

    /// Page the viewer opens on.
    pub fn initial_page(&self) -> usize {
        self.initial_page
    }

    /// Underlying session.
    pub fn session(&self) -> &Session<I> {
        &self.session
    }

    /// Page the activation tracker considers live.
    pub fn active_page(&self) -> Option<usize> {
        self.tracker.active()
    }

    /// Gesture in progress, if any.
    pub fn drag_state(&self) -> Option<&DragState> {
        self.gestures.drag_state()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.gestures.viewport()
    }

    /// Whether the viewer has closed.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Show the initial page and start playing it.
    ///
    /// Only the first call has an effect.
    pub fn open(&mut self, now: I) -> Vec<ViewerAction> {
        if self.opened {
            return Vec::new();
        }
        self.opened = true;

        debug!(page = self.initial_page, pages = self.catalog().len(), "viewer opening");
        let transitions = self.tracker.open(self.initial_page, now);
        let mut actions = self.apply_transitions(transitions, now);
        actions.push(ViewerAction::Render);
        actions
    }

    /// Process an event and return actions.
    ///
    /// Every event is ignored once the viewer has closed.
    pub fn handle(&mut self, event: ViewerEvent, now: I) -> Vec<ViewerAction> {
        if self.is_closed() {
            return Vec::new();
        }

        let mut actions = match event {
            ViewerEvent::Pointer(input) => {
                let Some(gesture) = self.classify(input) else {
                    return Vec::new();
                };
                self.apply(SessionEvent::Gesture(gesture), now)
            },
            ViewerEvent::PageVisible(visible) => {
                self.tracker.observe(visible, now);
                return Vec::new();
            },
            ViewerEvent::PageSettled => {
                let transitions = self.tracker.settle();
                if transitions.is_empty() {
                    self.resume_stalled_handoff(now)
                } else {
                    self.apply_transitions(transitions, now)
                }
            },
            ViewerEvent::Resize(viewport) => {
                self.gestures.set_viewport(viewport);
                Vec::new()
            },
            ViewerEvent::Frame => {
                let transitions = self.tracker.tick(now);
                let mut actions = self.apply_transitions(transitions, now);
                actions.extend(self.session.tick(now).into_iter().map(ViewerAction::from));
                actions
            },
            ViewerEvent::Hidden => {
                let transitions = self.tracker.hide();
                self.apply_transitions(transitions, now)
            },
            ViewerEvent::Dismiss => self.apply(SessionEvent::Dismiss, now),
        };

        if !actions.contains(&ViewerAction::Close) {
            actions.push(ViewerAction::Render);
        }
        actions
    }

    /// Read model of the live page. `None` while loading.
    pub fn page_view(&self, now: I) -> Option<PageView> {
        let cursor = self.session.cursor(now)?;
        let drag = self.session.drag();
        let item_count = self.catalog().items(cursor.user_index).map_or(0, <[_]>::len);

        Some(PageView {
            page: cursor.user_index,
            item_index: cursor.item_index,
            item_count,
            progress_ratio: cursor.progress_ratio,
            drag_offset: drag.offset,
            drag_scale: drag.scale,
            elevated: drag.elevated,
            phase: cursor.phase,
        })
    }

    /// Everything needed to draw the current frame.
    pub fn frame(&self, now: I) -> ViewFrame<'_> {
        ViewFrame { view: self.page_view(now), catalog: self.catalog(), state: self.session.state() }
    }

    fn classify(&mut self, input: PointerInput) -> Option<GestureEvent> {
        match input {
            PointerInput::Down { x, y } => {
                self.gestures.begin(Point::new(x, y));
                None
            },
            PointerInput::Move { x, y } => self.gestures.moved(Point::new(x, y)),
            PointerInput::Up { x, y } => self.gestures.end(Point::new(x, y)),
            PointerInput::Cancel => self.gestures.cancel(),
        }
    }

    fn apply(&mut self, event: SessionEvent, now: I) -> Vec<ViewerAction> {
        self.session.handle(event, now).into_iter().map(ViewerAction::from).collect()
    }

    fn apply_transitions(
        &mut self,
        transitions: Vec<PageTransition>,
        now: I,
    ) -> Vec<ViewerAction> {
        let mut actions = Vec::new();
        for transition in transitions {
            actions.extend(self.apply(SessionEvent::Page(transition), now));
        }
        actions
    }

    /// The host settled back on the page that asked to be left, so no
    /// transition fires. Restart that page instead of waiting forever.
    fn resume_stalled_handoff(&mut self, now: I) -> Vec<ViewerAction> {
        let stalled = match self.session.state() {
            SessionState::Finished { page, .. } | SessionState::Retreating { page, .. } => page,
            SessionState::Loading | SessionState::Playing { .. } | SessionState::Closing => {
                return Vec::new();
            },
        };
        if self.tracker.active() != Some(stalled) {
            return Vec::new();
        }

        debug!(page = stalled, "page change not followed, restarting page");
        self.session.activate(stalled, now).into_iter().map(ViewerAction::from).collect()
    }
}

impl From<SessionAction> for ViewerAction {
    fn from(action: SessionAction) -> Self {
        match action {
            SessionAction::ItemStarted { page, item } => Self::ItemStarted { page, item },
            SessionAction::RequestPageChange { target } => Self::RequestPageChange { target },
            SessionAction::Close => Self::Close,
        }
    }
}
