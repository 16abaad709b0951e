//! Pointer track classification.
//!
//! One [`GestureInterpreter`] follows one touch at a time. The first moment
//! the track becomes vertically dominant past the slop, the gesture is pinned
//! as a vertical drag; nothing after that can turn it back into a tap. Tracks
//! that never pin resolve to a tap on release, chosen by the release X.
//!
//! ```text
//!            dy > slop && dy > |dx|
//! ┌─────────┐ ─────────────────────> ┌──────────────┐
//! │ Pending │                        │ VerticalDrag │
//! └─────────┘                        └──────────────┘
//!      │ release                         │ release
//!      ↓                                 ↓
//!  TapLeft / TapRight            CommitClose / SnapBack
//! ```

use tracing::trace;

/// Fraction of the viewport width that counts as the "back" zone.
pub const DEFAULT_TAP_SPLIT_RATIO: f64 = 0.3;

/// Downward travel needed before a track can pin as a vertical drag.
pub const DEFAULT_VERTICAL_SLOP_PX: f32 = 10.0;

/// Downward travel past which releasing a drag dismisses the viewer.
pub const DEFAULT_COMMIT_DISTANCE_PX: f32 = 100.0;

/// Scale of the page when dragged a full viewport height.
pub const DEFAULT_MIN_DRAG_SCALE: f32 = 0.8;

/// Size of the area the story page is drawn in, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

/// Pointer position in viewport coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Releases left of `width * tap_split_ratio` go back
    pub tap_split_ratio: f64,
    /// Minimum downward travel to pin a vertical drag
    pub vertical_slop: f32,
    /// Releases past this travel commit the close
    pub commit_distance: f32,
    /// Page scale at a full-height drag
    pub min_drag_scale: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_split_ratio: DEFAULT_TAP_SPLIT_RATIO,
            vertical_slop: DEFAULT_VERTICAL_SLOP_PX,
            commit_distance: DEFAULT_COMMIT_DISTANCE_PX,
            min_drag_scale: DEFAULT_MIN_DRAG_SCALE,
        }
    }
}

/// Live state of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Y where the touch went down.
    pub origin_y: f32,
    /// Vertical travel so far (positive is downwards).
    pub current_dy: f32,
    /// Pinned as a vertical drag.
    pub vertical_dominant: bool,
}

/// Classified gesture output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Released in the back zone.
    TapLeft,
    /// Released in the forward zone.
    TapRight,
    /// Vertical drag in progress.
    VerticalDrag {
        /// Current vertical travel.
        dy: f32,
        /// Rubber-band scale for the page.
        scale: f32,
    },
    /// Drag released past the commit distance.
    CommitClose,
    /// Drag released short of the commit distance.
    SnapBack,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    origin_x: f32,
    drag: DragState,
}

/// Classifies one continuous touch at a time.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GestureConfig,
    viewport: Viewport,
    track: Option<Track>,
}

impl GestureInterpreter {
    /// Create an interpreter for the given viewport.
    pub fn new(config: GestureConfig, viewport: Viewport) -> Self {
        Self { config, viewport, track: None }
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport (rotation, resize).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// State of the gesture in progress. `None` between gestures.
    pub fn drag_state(&self) -> Option<&DragState> {
        self.track.as_ref().map(|track| &track.drag)
    }

    /// Touch went down. Replaces any track that never saw its release.
    pub fn begin(&mut self, at: Point) {
        self.track = Some(Track {
            origin_x: at.x,
            drag: DragState { origin_y: at.y, current_dy: 0.0, vertical_dominant: false },
        });
    }

    /// Touch moved. Returns live drag feedback once the gesture is vertical.
    pub fn moved(&mut self, at: Point) -> Option<GestureEvent> {
        let config = self.config;
        let track = self.track.as_mut()?;
        update(track, at, config);

        if track.drag.vertical_dominant {
            let dy = track.drag.current_dy;
            Some(GestureEvent::VerticalDrag { dy, scale: self.scale_for(dy) })
        } else {
            None
        }
    }

    /// Touch released. `None` only if no touch was in progress.
    pub fn end(&mut self, at: Point) -> Option<GestureEvent> {
        let config = self.config;
        let mut track = self.track.take()?;
        update(&mut track, at, config);

        let event = if track.drag.vertical_dominant {
            if track.drag.current_dy > config.commit_distance {
                GestureEvent::CommitClose
            } else {
                GestureEvent::SnapBack
            }
        } else {
            self.classify_tap(at.x)
        };

        trace!(?event, dy = track.drag.current_dy, x = at.x, "gesture resolved");
        Some(event)
    }

    /// Touch interrupted by the system. A pinned drag snaps back; anything
    /// else is dropped.
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        let track = self.track.take()?;
        track.drag.vertical_dominant.then_some(GestureEvent::SnapBack)
    }

    /// Tap side for a release at `x`.
    pub fn classify_tap(&self, x: f32) -> GestureEvent {
        if x < self.tap_split_x() {
            GestureEvent::TapLeft
        } else {
            GestureEvent::TapRight
        }
    }

    /// X coordinate of the back/forward boundary. A release exactly here
    /// goes forward.
    ///
    /// The product is taken in f64 and rounded once, so the boundary is the
    /// pixel position nearest to the true split.
    pub fn tap_split_x(&self) -> f32 {
        (f64::from(self.viewport.width) * self.config.tap_split_ratio) as f32
    }

    /// Rubber-band scale for a vertical travel of `dy`.
    pub fn scale_for(&self, dy: f32) -> f32 {
        rubber_band_scale(dy, self.viewport.height, self.config.min_drag_scale)
    }
}

/// Page scale for a drag of `dy`: 1.0 at rest, `min_scale` at a full
/// `viewport_height`, linear in between and clamped outside.
pub fn rubber_band_scale(dy: f32, viewport_height: f32, min_scale: f32) -> f32 {
    if viewport_height <= 0.0 {
        return 1.0;
    }
    let t = (dy / viewport_height).clamp(0.0, 1.0);
    1.0 - (1.0 - min_scale) * t
}

fn update(track: &mut Track, at: Point, config: GestureConfig) {
    let dx = at.x - track.origin_x;
    let dy = at.y - track.drag.origin_y;
    track.drag.current_dy = dy;

    if !track.drag.vertical_dominant && dy > config.vertical_slop && dy > dx.abs() {
        track.drag.vertical_dominant = true;
        trace!(dy, dx, "gesture pinned as vertical drag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(GestureConfig::default(), VIEWPORT)
    }

    fn release(x: f32, y: f32) -> Option<GestureEvent> {
        let mut g = interpreter();
        g.begin(Point::new(x, y));
        g.end(Point::new(x, y))
    }

    #[test]
    fn tap_split_boundary() {
        // 0.3 * 400 = 120
        assert_eq!(release(119.0, 300.0), Some(GestureEvent::TapLeft));
        assert_eq!(release(121.0, 300.0), Some(GestureEvent::TapRight));
        assert_eq!(release(120.0, 300.0), Some(GestureEvent::TapRight));
    }

    #[test]
    fn tap_exactly_on_split_goes_forward() {
        for width in [360.0, 375.0, 390.0, 400.0, 412.0, 414.0, 428.0, 1000.0] {
            let g = GestureInterpreter::new(GestureConfig::default(), Viewport::new(width, 800.0));
            let split = (f64::from(width) * 0.3) as f32;
            assert_eq!(g.tap_split_x(), split);
            assert_eq!(g.classify_tap(split), GestureEvent::TapRight, "width {width}");
            assert_eq!(g.classify_tap(split - 0.5), GestureEvent::TapLeft, "width {width}");
        }
    }

    #[test]
    fn degenerate_viewport_taps_forward() {
        let g = GestureInterpreter::new(GestureConfig::default(), Viewport::new(0.0, 0.0));
        assert_eq!(g.classify_tap(0.0), GestureEvent::TapRight);
        assert_eq!(g.classify_tap(10.0), GestureEvent::TapRight);
    }

    #[test]
    fn drag_commit_threshold() {
        let mut g = interpreter();
        g.begin(Point::new(200.0, 100.0));
        assert_eq!(g.end(Point::new(200.0, 199.0)), Some(GestureEvent::SnapBack));

        g.begin(Point::new(200.0, 100.0));
        assert_eq!(g.end(Point::new(200.0, 201.0)), Some(GestureEvent::CommitClose));
    }

    #[test]
    fn small_wobble_is_still_a_tap() {
        let mut g = interpreter();
        g.begin(Point::new(300.0, 300.0));
        assert_eq!(g.moved(Point::new(302.0, 308.0)), None);
        assert_eq!(g.end(Point::new(303.0, 309.0)), Some(GestureEvent::TapRight));
    }

    #[test]
    fn horizontal_travel_prevents_pinning() {
        let mut g = interpreter();
        g.begin(Point::new(300.0, 300.0));
        // dy = 40 but |dx| = 80
        assert_eq!(g.moved(Point::new(220.0, 340.0)), None);
        assert_eq!(g.end(Point::new(60.0, 340.0)), Some(GestureEvent::TapLeft));
    }

    #[test]
    fn vertical_classification_is_pinned() {
        let mut g = interpreter();
        g.begin(Point::new(200.0, 100.0));
        assert!(matches!(
            g.moved(Point::new(200.0, 130.0)),
            Some(GestureEvent::VerticalDrag { .. })
        ));

        // Sliding far sideways and back up does not turn it into a tap
        let _ = g.moved(Point::new(20.0, 105.0));
        assert_eq!(g.end(Point::new(20.0, 105.0)), Some(GestureEvent::SnapBack));
    }

    #[test]
    fn upward_drag_never_pins() {
        let mut g = interpreter();
        g.begin(Point::new(300.0, 500.0));
        assert_eq!(g.moved(Point::new(300.0, 300.0)), None);
        assert_eq!(g.end(Point::new(300.0, 300.0)), Some(GestureEvent::TapRight));
    }

    #[test]
    fn drag_reports_rubber_band_scale() {
        let mut g = interpreter();
        g.begin(Point::new(200.0, 0.0));
        let Some(GestureEvent::VerticalDrag { dy, scale }) = g.moved(Point::new(200.0, 400.0))
        else {
            panic!("expected vertical drag");
        };
        assert_eq!(dy, 400.0);
        assert!((scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rubber_band_is_clamped() {
        assert_eq!(rubber_band_scale(0.0, 800.0, 0.8), 1.0);
        assert_eq!(rubber_band_scale(-50.0, 800.0, 0.8), 1.0);
        assert!((rubber_band_scale(800.0, 800.0, 0.8) - 0.8).abs() < 1e-6);
        assert!((rubber_band_scale(5000.0, 800.0, 0.8) - 0.8).abs() < 1e-6);
        assert_eq!(rubber_band_scale(100.0, 0.0, 0.8), 1.0);
    }

    #[test]
    fn cancel_resolves_pinned_drag_only() {
        let mut g = interpreter();
        g.begin(Point::new(200.0, 100.0));
        assert_eq!(g.cancel(), None);

        g.begin(Point::new(200.0, 100.0));
        let _ = g.moved(Point::new(200.0, 150.0));
        assert_eq!(g.cancel(), Some(GestureEvent::SnapBack));
        assert!(g.drag_state().is_none());
    }

    #[test]
    fn release_without_touch_is_ignored() {
        let mut g = interpreter();
        assert_eq!(g.end(Point::new(10.0, 10.0)), None);
        assert_eq!(g.moved(Point::new(10.0, 10.0)), None);
    }
}
