//! Real viewer wrapped in the model's interface.

use std::{collections::VecDeque, sync::Arc};

use storyline_app::{PointerInput, Viewer, ViewerAction, ViewerConfig, ViewerEvent};
use storyline_core::{Environment, SessionError, SessionState, StoryCatalog};

use super::{MODEL_FRAME, ObservableState, Operation};
use crate::{
    invariants::{SystemSnapshot, ViewerSnapshot},
    sim_env::{SimEnv, SimInstant},
};

const PAGE_MIDDLE_Y: f32 = 400.0;
const FORWARD_X: f32 = 300.0;
const BACK_X: f32 = 30.0;
const DRAG_X: f32 = 200.0;

/// Real [`Viewer`] on a virtual clock, hosted by a pager that follows page
/// requests on the next frame.
#[derive(Debug, Clone)]
pub struct RealViewer {
    viewer: Viewer<SimInstant>,
    env: SimEnv,
    pending: VecDeque<usize>,
    started: Vec<(usize, usize)>,
    closes: usize,
}

impl RealViewer {
    /// Open a viewer on the first page of `catalog`.
    pub fn new(catalog: Arc<StoryCatalog>) -> Result<Self, SessionError> {
        let env = SimEnv::new();
        let viewer = Viewer::new(catalog, 0, ViewerConfig::default())?;

        let mut real =
            Self { viewer, env, pending: VecDeque::new(), started: Vec::new(), closes: 0 };
        let actions = real.viewer.open(real.env.now());
        real.record(actions);
        Ok(real)
    }

    /// The wrapped viewer.
    pub fn viewer(&self) -> &Viewer<SimInstant> {
        &self.viewer
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: Operation) {
        match op.clamp_to(self.viewer.catalog().len()) {
            Operation::TapForward => self.tap(FORWARD_X),
            Operation::TapBack => self.tap(BACK_X),
            Operation::AdvanceFrames { frames } => {
                for _ in 0..frames {
                    self.frame();
                }
            },
            Operation::Swipe { target } => self.settle_on(usize::from(target)),
            Operation::Drag { distance } => {
                let end = PAGE_MIDDLE_Y + f32::from(distance);
                self.pointer(PointerInput::Down { x: DRAG_X, y: PAGE_MIDDLE_Y });
                self.pointer(PointerInput::Move { x: DRAG_X, y: end });
                self.pointer(PointerInput::Up { x: DRAG_X, y: end });
            },
            Operation::Hide => self.send(ViewerEvent::Hidden),
            Operation::Dismiss => self.send(ViewerEvent::Dismiss),
        }
    }

    /// Observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let closed = self.viewer.is_closed();
        let view = if closed { None } else { self.viewer.page_view(self.env.now()) };

        ObservableState {
            page: view.map(|v| v.page),
            item: view.map(|v| v.item_index),
            playing: matches!(self.viewer.session().state(), SessionState::Playing { .. }),
            closed,
            started: self.started.clone(),
            closes: self.closes,
        }
    }

    /// Invariant snapshot of the wrapped viewer.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::single(ViewerSnapshot::capture(&self.viewer, self.env.now(), self.closes))
    }

    fn frame(&mut self) {
        self.env.advance(MODEL_FRAME);
        while let Some(page) = self.pending.pop_front() {
            self.settle_on(page);
        }
        self.send(ViewerEvent::Frame);
    }

    fn settle_on(&mut self, page: usize) {
        self.send(ViewerEvent::PageVisible(Some(page)));
        self.send(ViewerEvent::PageSettled);
    }

    fn tap(&mut self, x: f32) {
        self.pointer(PointerInput::Down { x, y: PAGE_MIDDLE_Y });
        self.pointer(PointerInput::Up { x, y: PAGE_MIDDLE_Y });
    }

    fn pointer(&mut self, input: PointerInput) {
        self.send(ViewerEvent::Pointer(input));
    }

    fn send(&mut self, event: ViewerEvent) {
        let actions = self.viewer.handle(event, self.env.now());
        self.record(actions);
    }

    fn record(&mut self, actions: Vec<ViewerAction>) {
        for action in actions {
            match action {
                ViewerAction::ItemStarted { page, item } => self.started.push((page, item)),
                ViewerAction::RequestPageChange { target } => self.pending.push_back(target),
                ViewerAction::Close => self.closes += 1,
                ViewerAction::Render => {},
            }
        }
    }
}
