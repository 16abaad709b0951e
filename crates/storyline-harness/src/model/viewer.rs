//! Reference model of story playback.

use std::collections::VecDeque;

use storyline_core::StoryCatalog;

use super::{MODEL_FRAME, ObservableState, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Playing { page: usize, item: usize, started_ms: u64 },
    /// Waiting for the host to show another page
    Handoff { page: usize, item: usize },
    Closed,
}

/// Reference model of a viewer and a host that follows page requests.
#[derive(Debug, Clone)]
pub struct ModelViewer {
    /// Item durations per page, in milliseconds
    durations: Vec<Vec<u64>>,
    now_ms: u64,
    phase: Phase,
    /// Page the pager settled on
    settled: Option<usize>,
    /// Page requests the host has not followed yet
    pending: VecDeque<usize>,
    started: Vec<(usize, usize)>,
    closes: usize,
}

impl ModelViewer {
    /// Open a model viewer on the first page of `catalog`.
    pub fn new(catalog: &StoryCatalog) -> Self {
        let durations = catalog
            .users()
            .iter()
            .map(|user| user.items.iter().map(|item| item.duration_ms).collect())
            .collect();

        let mut model = Self {
            durations,
            now_ms: 0,
            phase: Phase::Loading,
            settled: Some(0),
            pending: VecDeque::new(),
            started: Vec::new(),
            closes: 0,
        };
        model.activate(0);
        model
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.durations.len()
    }

    /// Virtual milliseconds since open.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: Operation) {
        if self.phase == Phase::Closed {
            if let Operation::AdvanceFrames { frames } = op {
                self.now_ms += MODEL_FRAME.as_millis() as u64 * u64::from(frames);
            }
            return;
        }

        match op.clamp_to(self.page_count()) {
            Operation::TapForward => self.forward(),
            Operation::TapBack => self.back(),
            Operation::AdvanceFrames { frames } => {
                for _ in 0..frames {
                    self.frame();
                }
            },
            Operation::Swipe { target } => self.settle(usize::from(target)),
            Operation::Drag { distance } => match distance {
                0..=10 => self.forward(),
                11..=100 => {},
                _ => self.close(),
            },
            Operation::Hide => {
                self.settled = None;
                self.phase = Phase::Loading;
            },
            Operation::Dismiss => self.close(),
        }
    }

    /// Observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let (page, item) = match self.phase {
            Phase::Playing { page, item, .. } | Phase::Handoff { page, item } => {
                (Some(page), Some(item))
            },
            Phase::Loading | Phase::Closed => (None, None),
        };

        ObservableState {
            page,
            item,
            playing: matches!(self.phase, Phase::Playing { .. }),
            closed: self.phase == Phase::Closed,
            started: self.started.clone(),
            closes: self.closes,
        }
    }

    fn frame(&mut self) {
        self.now_ms += MODEL_FRAME.as_millis() as u64;

        while let Some(page) = self.pending.pop_front() {
            self.settle(page);
        }

        if let Phase::Playing { page, item, started_ms } = self.phase
            && self.now_ms - started_ms >= self.durations[page][item]
        {
            self.forward();
        }
    }

    fn activate(&mut self, page: usize) {
        self.phase = Phase::Playing { page, item: 0, started_ms: self.now_ms };
        self.started.push((page, 0));
    }

    fn settle(&mut self, page: usize) {
        if self.phase == Phase::Closed {
            return;
        }

        if self.settled == Some(page) {
            if matches!(self.phase, Phase::Handoff { page: stalled, .. } if stalled == page) {
                self.activate(page);
            }
            return;
        }

        self.settled = Some(page);
        self.activate(page);
    }

    fn forward(&mut self) {
        let Phase::Playing { page, item, .. } = self.phase else {
            return;
        };

        if item + 1 < self.durations[page].len() {
            self.phase = Phase::Playing { page, item: item + 1, started_ms: self.now_ms };
            self.started.push((page, item + 1));
        } else if page + 1 < self.page_count() {
            self.phase = Phase::Handoff { page, item };
            self.pending.push_back(page + 1);
        } else {
            self.close();
        }
    }

    fn back(&mut self) {
        let Phase::Playing { page, item, .. } = self.phase else {
            return;
        };

        if item > 0 {
            self.phase = Phase::Playing { page, item: item - 1, started_ms: self.now_ms };
            self.started.push((page, item - 1));
        } else if page > 0 {
            self.phase = Phase::Handoff { page, item };
            self.pending.push_back(page - 1);
        }
    }

    fn close(&mut self) {
        if self.phase != Phase::Closed {
            self.phase = Phase::Closed;
            self.closes += 1;
        }
    }
}
