//! Playback properties checked across generated inputs.
//!
//! Each test pins one behavioral property of the state machines: single live
//! timer, exact advance counts, cancel semantics, tap and drag thresholds,
//! and the no-op back tap at the very start.

use std::{sync::Arc, time::Duration};

use proptest::prelude::*;
use storyline_core::{
    Environment, GestureConfig, GestureEvent, GestureInterpreter, PageTransition, Point, Session,
    SessionAction, SessionConfig, SessionEvent, StoryCatalog, StoryItem, TimerDriver,
    UserStories, Viewport,
};
use storyline_harness::{SimEnv, SimInstant};

fn catalog(items_per_user: &[usize], duration_ms: u64) -> Arc<StoryCatalog> {
    let users = items_per_user
        .iter()
        .enumerate()
        .map(|(u, &count)| {
            let items = (0..count)
                .map(|i| StoryItem::image(format!("{u}-{i}"), "img://x", duration_ms))
                .collect();
            UserStories::new(format!("user-{u}"), format!("User {u}"), "", items)
        })
        .collect();
    Arc::new(StoryCatalog::new(users).expect("valid catalog"))
}

fn at(ms: u64) -> SimInstant {
    SimInstant::from_start(Duration::from_millis(ms))
}

#[derive(Debug, Clone, Copy)]
enum PagerStep {
    Activate(usize),
    Deactivate(usize),
    Wait(u64),
}

fn pager_step() -> impl Strategy<Value = PagerStep> {
    prop_oneof![
        (0usize..4).prop_map(PagerStep::Activate),
        (0usize..4).prop_map(PagerStep::Deactivate),
        (0u64..300).prop_map(PagerStep::Wait),
    ]
}

proptest! {
    /// Rapid activate/deactivate never leaves a timer behind: starts only
    /// ever come from the page that is live at the time.
    #[test]
    fn single_live_timer_under_page_churn(
        steps in prop::collection::vec(pager_step(), 1..200)
    ) {
        let mut session = Session::new(catalog(&[2, 3, 1, 2], 100), SessionConfig::default());
        let mut now = 0;

        for step in steps {
            let actions = match step {
                PagerStep::Activate(page) => {
                    session.handle(SessionEvent::Page(PageTransition::Activate(page)), at(now))
                },
                PagerStep::Deactivate(page) => {
                    session.handle(SessionEvent::Page(PageTransition::Deactivate(page)), at(now))
                },
                PagerStep::Wait(ms) => {
                    now += ms;
                    session.tick(at(now))
                },
            };

            let live = session.active_page();
            for action in actions {
                if let SessionAction::ItemStarted { page, .. } = action {
                    prop_assert_eq!(Some(page), live);
                }
            }
            prop_assert!(!session.timer_running() || live.is_some());
        }
    }

    /// A user with N items gets exactly N-1 natural advances before asking
    /// for the next page.
    #[test]
    fn natural_advances_are_items_minus_one(items in 1usize..12, duration_ms in 1u64..5000) {
        let mut session = Session::new(catalog(&[items, 1], duration_ms), SessionConfig::default());
        let env = SimEnv::new();
        let _ = session.activate(0, env.now());

        let mut advances = 0;
        loop {
            env.advance(Duration::from_millis(duration_ms));
            let actions = session.tick(env.now());
            match actions.as_slice() {
                [SessionAction::ItemStarted { page: 0, .. }] => advances += 1,
                [SessionAction::RequestPageChange { target: 1 }] => break,
                other => prop_assert!(false, "unexpected actions {:?}", other),
            }
        }
        prop_assert_eq!(advances, items - 1);
    }

    /// Cancel is idempotent and nothing completes after cancel or after a
    /// completion.
    #[test]
    fn cancel_and_completion_are_final(
        duration_ms in 1u64..5000,
        cancel_at in 0u64..6000,
        cancels in 1usize..4,
    ) {
        let mut timer = TimerDriver::new();
        timer.start(Duration::from_millis(duration_ms), at(0));

        let completed = timer.poll(at(cancel_at)).is_some();
        prop_assert_eq!(completed, cancel_at >= duration_ms);

        prop_assert_eq!(timer.cancel(), !completed);
        for _ in 1..cancels {
            prop_assert!(!timer.cancel());
        }
        for later in [cancel_at, cancel_at + duration_ms, cancel_at + 100_000] {
            prop_assert_eq!(timer.poll(at(later)), None);
        }
    }

    /// A release on the tap split goes forward; a pixel either side lands on
    /// opposite sides.
    #[test]
    fn tap_split_is_exact(width in 50.0f32..2000.0) {
        let viewport = Viewport::new(width, 800.0);
        let split = (f64::from(width) * GestureConfig::default().tap_split_ratio) as f32;
        let mut gestures = GestureInterpreter::new(GestureConfig::default(), viewport);

        gestures.begin(Point::new(split, 300.0));
        prop_assert_eq!(gestures.end(Point::new(split, 300.0)), Some(GestureEvent::TapRight));
        gestures.begin(Point::new(split - 1.0, 300.0));
        prop_assert_eq!(gestures.end(Point::new(split - 1.0, 300.0)), Some(GestureEvent::TapLeft));
        gestures.begin(Point::new(split + 1.0, 300.0));
        prop_assert_eq!(gestures.end(Point::new(split + 1.0, 300.0)), Some(GestureEvent::TapRight));
    }

    /// Drag releases either side of the commit distance resolve differently,
    /// wherever the drag starts.
    #[test]
    fn commit_distance_is_exact(x in 0.0f32..390.0, y in 0.0f32..400.0) {
        let mut gestures = GestureInterpreter::new(GestureConfig::default(), Viewport::default());

        gestures.begin(Point::new(x, y));
        let _ = gestures.moved(Point::new(x, y + 50.0));
        prop_assert_eq!(gestures.end(Point::new(x, y + 99.0)), Some(GestureEvent::SnapBack));

        gestures.begin(Point::new(x, y));
        let _ = gestures.moved(Point::new(x, y + 50.0));
        prop_assert_eq!(gestures.end(Point::new(x, y + 101.0)), Some(GestureEvent::CommitClose));
    }

    /// Going back from the first item of the first user changes nothing.
    #[test]
    fn back_at_origin_is_noop(elapsed_ms in 0u64..1999) {
        let mut session = Session::new(catalog(&[3, 2], 2000), SessionConfig::default());
        let _ = session.activate(0, at(0));
        let before = session.cursor(at(elapsed_ms));
        let token = session.timer_token();

        let actions = session.handle(SessionEvent::Gesture(GestureEvent::TapLeft), at(elapsed_ms));

        prop_assert!(actions.is_empty());
        prop_assert_eq!(session.cursor(at(elapsed_ms)), before);
        prop_assert_eq!(session.timer_token(), token);
    }
}
