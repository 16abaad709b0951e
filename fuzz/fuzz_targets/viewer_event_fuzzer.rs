//! Fuzz target for the viewer state machine
//!
//! Drive a real viewer with arbitrary user and host operations (HIGH
//! priority)
//!
//! # Strategy
//!
//! - Catalog shape: 1-8 users with 1-6 items, durations from 1 ms up
//! - Operations: taps, drags, swipes, frames, hide and dismiss in any order
//! - Clock: virtual, advanced one frame at a time
//!
//! # Invariants
//!
//! - At most one live item timer, owned by the live page
//! - Cursor within the live user's items
//! - Progress within `[0, 1]`
//! - `Close` emitted at most once, nothing starts after it
//! - Model and real viewer agree on every observable state

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use storyline_core::{StoryCatalog, StoryItem, UserStories};
use storyline_harness::{InvariantRegistry, ModelViewer, Operation, RealViewer};

#[derive(Debug, Clone, Arbitrary)]
struct Input {
    /// Item durations per user, in tens of milliseconds
    shape: Vec<Vec<u8>>,
    ops: Vec<Operation>,
}

fn catalog(shape: &[Vec<u8>]) -> Option<Arc<StoryCatalog>> {
    let users = shape
        .iter()
        .take(8)
        .enumerate()
        .map(|(u, durations)| {
            let items = durations
                .iter()
                .take(6)
                .enumerate()
                .map(|(i, &tens)| {
                    let ms = u64::from(tens) * 10 + 1;
                    StoryItem::image(format!("{u}-{i}"), "img://fuzz", ms)
                })
                .collect();
            UserStories::new(format!("user-{u}"), format!("User {u}"), "", items)
        })
        .collect();
    StoryCatalog::new(users).ok().map(Arc::new)
}

fuzz_target!(|input: Input| {
    let Some(catalog) = catalog(&input.shape) else {
        return;
    };
    let registry = InvariantRegistry::standard();
    let mut model = ModelViewer::new(&catalog);
    let Ok(mut real) = RealViewer::new(catalog) else {
        return;
    };

    for op in input.ops {
        let started_before = real.observable_state().started.len();
        let was_closed = real.observable_state().closed;

        model.apply(op);
        real.apply(op);

        registry.assert_all(&real.snapshot(), &format!("after {op:?}"));

        let state = real.observable_state();
        assert_eq!(model.observable_state(), state, "model diverged after {op:?}");
        assert!(state.closes <= 1);
        if was_closed {
            assert_eq!(state.started.len(), started_before, "item started after close");
        }
    }
});
