//! Tests for the session playback lifecycle.
//!
//! These tests verify critical invariants:
//! - The cursor never leaves the live user's items
//! - Progress stays within `[0, 1]` and never decreases while an item plays
//! - `Close` is emitted at most once and nothing starts after it
//! - Page requests always name a neighbouring page

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use proptest::prelude::*;
use storyline_core::{
    GestureEvent, PageTransition, PlaybackPhase, Session, SessionAction, SessionConfig,
    SessionEvent, SessionState, StoryCatalog, StoryItem, UserStories,
};

fn catalog(shape: &[Vec<u64>]) -> Arc<StoryCatalog> {
    let users = shape
        .iter()
        .enumerate()
        .map(|(u, durations)| {
            let items = durations
                .iter()
                .enumerate()
                .map(|(i, &ms)| StoryItem::image(format!("{u}-{i}"), "img://x", ms))
                .collect();
            UserStories::new(format!("user-{u}"), format!("User {u}"), "", items)
        })
        .collect();
    Arc::new(StoryCatalog::new(users).expect("valid catalog"))
}

#[derive(Debug, Clone, Copy)]
enum Input {
    TapLeft,
    TapRight,
    Wait(u64),
    Drag(f32),
    SnapBack,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        3 => Just(Input::TapLeft),
        4 => Just(Input::TapRight),
        4 => (1u64..3000).prop_map(Input::Wait),
        1 => (0.0f32..300.0).prop_map(Input::Drag),
        1 => Just(Input::SnapBack),
    ]
}

fn shape() -> impl Strategy<Value = Vec<Vec<u64>>> {
    prop::collection::vec(prop::collection::vec(1u64..2500, 1..5), 1..5)
}

/// Host that follows every page request at once.
struct Host {
    session: Session<Instant>,
    start: Instant,
    elapsed: Duration,
    closes: usize,
    started: Vec<(usize, usize)>,
}

impl Host {
    fn new(catalog: Arc<StoryCatalog>) -> Self {
        let start = Instant::now();
        let mut host = Self {
            session: Session::new(catalog, SessionConfig::default()),
            start,
            elapsed: Duration::ZERO,
            closes: 0,
            started: Vec::new(),
        };
        let actions = host.session.activate(0, start);
        host.run(actions);
        host
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn send(&mut self, event: SessionEvent) {
        let actions = self.session.handle(event, self.now());
        self.run(actions);
    }

    fn run(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::ItemStarted { page, item } => {
                    assert_eq!(self.closes, 0, "item started after close");
                    self.started.push((page, item));
                },
                SessionAction::RequestPageChange { target } => {
                    let from = self.session.state();
                    match from {
                        SessionState::Finished { page, next } => {
                            assert_eq!(next, target);
                            assert_eq!(target, page + 1);
                        },
                        SessionState::Retreating { page, previous } => {
                            assert_eq!(previous, target);
                            assert_eq!(target + 1, page);
                        },
                        other => panic!("page request from {other:?}"),
                    }
                    let now = self.now();
                    let mut follow = Vec::new();
                    if let Some(live) = self.session.active_page() {
                        follow.extend(self.session.handle(
                            SessionEvent::Page(PageTransition::Deactivate(live)),
                            now,
                        ));
                    }
                    follow.extend(
                        self.session.handle(SessionEvent::Page(PageTransition::Activate(target)), now),
                    );
                    self.run(follow);
                },
                SessionAction::Close => self.closes += 1,
            }
        }
    }

    fn wait(&mut self, ms: u64) {
        // Step in frames so every completion is seen
        let target = self.elapsed + Duration::from_millis(ms);
        while self.elapsed < target {
            self.elapsed = (self.elapsed + Duration::from_millis(16)).min(target);
            let actions = self.session.tick(self.now());
            self.run(actions);
        }
    }
}

proptest! {
    /// INVARIANT: cursor bounds, progress range and single close hold after
    /// every input.
    #[test]
    fn playback_invariants_hold(
        shape in shape(),
        inputs in prop::collection::vec(input(), 0..80)
    ) {
        let catalog = catalog(&shape);
        let mut host = Host::new(Arc::clone(&catalog));

        for input in inputs {
            let before = host.session.cursor(host.now());
            match input {
                Input::TapLeft => host.send(SessionEvent::Gesture(GestureEvent::TapLeft)),
                Input::TapRight => host.send(SessionEvent::Gesture(GestureEvent::TapRight)),
                Input::Wait(ms) => host.wait(ms),
                Input::Drag(dy) => host.send(SessionEvent::Gesture(GestureEvent::VerticalDrag {
                    dy,
                    scale: 1.0,
                })),
                Input::SnapBack => host.send(SessionEvent::Gesture(GestureEvent::SnapBack)),
            }

            prop_assert!(host.closes <= 1);
            if let Some(cursor) = host.session.cursor(host.now()) {
                let count = catalog.items(cursor.user_index).map_or(0, <[StoryItem]>::len);
                prop_assert!(cursor.item_index < count);
                prop_assert!((0.0..=1.0).contains(&cursor.progress_ratio));

                // Dragging never moves playback
                if let (Input::Drag(_) | Input::SnapBack, Some(before)) = (input, before) {
                    prop_assert_eq!(before.item_index, cursor.item_index);
                    prop_assert_eq!(before.user_index, cursor.user_index);
                }
            }
            prop_assert_eq!(host.session.timer_running(), matches!(host.session.state(), SessionState::Playing { .. }));
        }
    }

    /// INVARIANT: progress of one item never decreases while it plays.
    #[test]
    fn progress_is_monotonic(duration_ms in 100u64..5000, samples in prop::collection::vec(0u64..200, 1..40)) {
        let catalog = catalog(&[vec![duration_ms, duration_ms]]);
        let mut host = Host::new(catalog);
        let mut last = 0.0f32;

        for ms in samples {
            host.elapsed += Duration::from_millis(ms);
            let Some(cursor) = host.session.cursor(host.now()) else { break };
            if cursor.item_index != 0 || cursor.phase != PlaybackPhase::Playing {
                break;
            }
            prop_assert!(cursor.progress_ratio >= last);
            last = cursor.progress_ratio;
        }
    }
}

/// INVARIANT: natural playback starts every item of every user exactly once,
/// in order, then closes.
#[test]
fn natural_playback_visits_everything_once() {
    let catalog = catalog(&[vec![1000, 1500], vec![700], vec![400, 400, 400]]);
    let mut host = Host::new(catalog);

    host.wait(10_000);

    assert_eq!(host.started, vec![(0, 0), (0, 1), (1, 0), (2, 0), (2, 1), (2, 2)]);
    assert_eq!(host.closes, 1);
    assert!(host.session.is_closed());
}

/// INVARIANT: going back from the first item of a later user requests the
/// previous user, which then restarts at its first item.
#[test]
fn retreat_across_users_restarts_previous_user() {
    let catalog = catalog(&[vec![1000, 1000], vec![1000]]);
    let mut host = Host::new(catalog);

    host.send(SessionEvent::Gesture(GestureEvent::TapRight));
    host.send(SessionEvent::Gesture(GestureEvent::TapRight));
    assert_eq!(host.session.state(), SessionState::Playing { page: 1 });

    host.send(SessionEvent::Gesture(GestureEvent::TapLeft));

    assert_eq!(host.session.state(), SessionState::Playing { page: 0 });
    assert_eq!(host.started, vec![(0, 0), (0, 1), (1, 0), (0, 0)]);
}
