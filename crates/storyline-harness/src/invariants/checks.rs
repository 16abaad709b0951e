//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use storyline_core::SessionState;

use super::{Invariant, InvariantKind, InvariantResult, SystemSnapshot, Violation};

/// At most one timer is live, and only on the playing page.
///
/// The timer runs if and only if the session is `Playing`, and then it
/// belongs to the page the session holds.
pub struct SingleLiveTimer;

impl Invariant for SingleLiveTimer {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SingleLiveTimer
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, viewer) in state.viewers.iter().enumerate() {
            let playing_page = match viewer.state {
                SessionState::Playing { page } => Some(page),
                _ => None,
            };

            if viewer.timer_running != playing_page.is_some() {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "viewer {index}: timer_running={} in state {:?}",
                        viewer.timer_running, viewer.state
                    ),
                });
            }

            if let Some(page) = playing_page
                && viewer.session_page != Some(page)
            {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "viewer {index}: playing page {page} but cursor on {:?}",
                        viewer.session_page
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The cursor always points at a real item of a real page.
pub struct CursorInBounds;

impl Invariant for CursorInBounds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::CursorInBounds
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, viewer) in state.viewers.iter().enumerate() {
            let Some(view) = viewer.view else { continue };

            if view.page >= viewer.page_count || view.item_index >= view.item_count {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "viewer {index}: cursor {}/{} of {} items, {} pages",
                        view.page, view.item_index, view.item_count, viewer.page_count
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Progress and drag feedback stay in range.
///
/// Progress is within `[0, 1]`, the drag offset is never negative and the
/// drag scale never grows the page.
pub struct ProgressInRange;

impl Invariant for ProgressInRange {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ProgressInRange
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, viewer) in state.viewers.iter().enumerate() {
            let Some(view) = viewer.view else { continue };

            let in_range = (0.0..=1.0).contains(&view.progress_ratio)
                && view.drag_offset >= 0.0
                && view.drag_scale > 0.0
                && view.drag_scale <= 1.0;
            if !in_range {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("viewer {index}: out of range view {view:?}"),
                });
            }
        }
        Ok(())
    }
}

/// `Close` is emitted at most once, and exactly once for a closed session.
pub struct CloseOnce;

impl Invariant for CloseOnce {
    fn kind(&self) -> InvariantKind {
        InvariantKind::CloseOnce
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, viewer) in state.viewers.iter().enumerate() {
            let closed = viewer.state == SessionState::Closing;
            if viewer.close_count > 1 || (viewer.close_count == 1) != closed {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "viewer {index}: {} closes in state {:?}",
                        viewer.close_count, viewer.state
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The session plays the page the pager settled on.
///
/// While `Playing`, the activation tracker's live page and the session's page
/// agree. A disagreement means a timer runs on a page the user cannot see.
pub struct PagerAgreement;

impl Invariant for PagerAgreement {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PagerAgreement
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, viewer) in state.viewers.iter().enumerate() {
            if let SessionState::Playing { page } = viewer.state
                && viewer.tracker_page != Some(page)
            {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "viewer {index}: playing page {page} while pager settled on {:?}",
                        viewer.tracker_page
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use storyline_app::PageView;
    use storyline_core::PlaybackPhase;

    use super::*;
    use crate::invariants::ViewerSnapshot;

    fn playing(page: usize) -> ViewerSnapshot {
        ViewerSnapshot {
            state: SessionState::Playing { page },
            timer_running: true,
            session_page: Some(page),
            tracker_page: Some(page),
            view: Some(PageView {
                page,
                item_index: 0,
                item_count: 2,
                progress_ratio: 0.5,
                drag_offset: 0.0,
                drag_scale: 1.0,
                elevated: false,
                phase: PlaybackPhase::Playing,
            }),
            page_count: 3,
            close_count: 0,
        }
    }

    #[test]
    fn healthy_viewer_passes() {
        let snapshot = SystemSnapshot::single(playing(1));
        assert!(SingleLiveTimer.check(&snapshot).is_ok());
        assert!(CursorInBounds.check(&snapshot).is_ok());
        assert!(ProgressInRange.check(&snapshot).is_ok());
        assert!(CloseOnce.check(&snapshot).is_ok());
        assert!(PagerAgreement.check(&snapshot).is_ok());
    }

    #[test]
    fn timer_outside_playing_is_caught() {
        let mut viewer = playing(0);
        viewer.state = SessionState::Finished { page: 0, next: 1 };
        let err = SingleLiveTimer.check(&SystemSnapshot::single(viewer));
        assert!(err.is_err());
    }

    #[test]
    fn double_close_is_caught() {
        let mut viewer = playing(0);
        viewer.state = SessionState::Closing;
        viewer.timer_running = false;
        viewer.close_count = 2;
        let err = CloseOnce.check(&SystemSnapshot::single(viewer)).expect_err("two closes");
        assert_eq!(err.invariant, InvariantKind::CloseOnce);
    }

    #[test]
    fn cursor_past_items_is_caught() {
        let mut viewer = playing(0);
        if let Some(view) = viewer.view.as_mut() {
            view.item_index = 2;
        }
        assert!(CursorInBounds.check(&SystemSnapshot::single(viewer)).is_err());
    }

    #[test]
    fn pager_disagreement_is_caught() {
        let mut viewer = playing(0);
        viewer.tracker_page = Some(2);
        assert!(PagerAgreement.check(&SystemSnapshot::single(viewer)).is_err());
    }
}
