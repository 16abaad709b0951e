//! Fuzz target for the gesture interpreter
//!
//! Classify arbitrary pointer tracks (HIGH priority)
//!
//! # Strategy
//!
//! - Tracks: begin/move/end/cancel in any order, including stray releases
//! - Positions: integer pixels across and beyond the viewport
//! - Viewports: tiny, zero-height and ordinary sizes, resized mid-track
//!
//! # Invariants
//!
//! - A track that pinned as a vertical drag never resolves to a tap
//! - A track that never pinned never resolves to CommitClose or SnapBack
//! - Release past the commit distance of a pinned drag is CommitClose
//! - Drag scale stays within `[min_drag_scale, 1.0]`
//! - `end` without `begin` returns None

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use storyline_core::{GestureConfig, GestureEvent, GestureInterpreter, Point, Viewport};

#[derive(Debug, Clone, Arbitrary)]
enum TrackOp {
    Begin { x: i16, y: i16 },
    Move { x: i16, y: i16 },
    End { x: i16, y: i16 },
    Cancel,
    Resize { width: u16, height: u16 },
}

fn point(x: i16, y: i16) -> Point {
    Point::new(f32::from(x), f32::from(y))
}

fuzz_target!(|ops: Vec<TrackOp>| {
    let config = GestureConfig::default();
    let mut gestures = GestureInterpreter::new(config, Viewport::default());
    let mut active = false;

    for op in ops {
        match op {
            TrackOp::Begin { x, y } => {
                gestures.begin(point(x, y));
                active = true;
            }
            TrackOp::Move { x, y } => {
                let event = gestures.moved(point(x, y));
                if !active {
                    assert_eq!(event, None, "move without a track produced {event:?}");
                }
                if let Some(GestureEvent::VerticalDrag { scale, .. }) = event {
                    assert!(
                        (config.min_drag_scale..=1.0).contains(&scale),
                        "scale {scale} out of range"
                    );
                }
            }
            TrackOp::End { x, y } => {
                let pinned = gestures.drag_state().is_some_and(|drag| drag.vertical_dominant);
                let origin_y = gestures.drag_state().map(|drag| drag.origin_y);
                let event = gestures.end(point(x, y));

                if !active {
                    assert_eq!(event, None, "release without a track produced {event:?}");
                    continue;
                }
                active = false;

                let Some(event) = event else {
                    panic!("release of an active track produced nothing");
                };
                // Pinning can also happen on the release itself
                let dy = origin_y.map_or(0.0, |origin| f32::from(y) - origin);
                match event {
                    GestureEvent::TapLeft | GestureEvent::TapRight => {
                        assert!(!pinned, "pinned drag resolved to {event:?}");
                    }
                    GestureEvent::CommitClose => assert!(dy > config.commit_distance),
                    GestureEvent::SnapBack => assert!(dy <= config.commit_distance),
                    GestureEvent::VerticalDrag { .. } => panic!("release produced a live drag"),
                }
            }
            TrackOp::Cancel => {
                let pinned = gestures.drag_state().is_some_and(|drag| drag.vertical_dominant);
                let event = gestures.cancel();
                assert_eq!(event, pinned.then_some(GestureEvent::SnapBack));
                active = false;
            }
            TrackOp::Resize { width, height } => {
                gestures.set_viewport(Viewport::new(f32::from(width), f32::from(height)));
            }
        }

        assert_eq!(gestures.drag_state().is_some(), active);
    }
});
