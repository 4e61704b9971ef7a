//! Tracker for a single rectangle-drag gesture.
//!
//! The tracker only knows about pointer positions in display space. Whether a
//! gesture is allowed at all is decided by the workflow that owns it.

use crate::geometry::{Point, Rect};

/// A selection must be strictly larger than this on both axes (display pixels).
pub const DEFAULT_MIN_SELECTION_SIZE: f64 = 5.0;

/// Gesture lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// The rectangle is large enough to be measured.
    Finalized(Rect),
    /// The rectangle was too small and has been dropped.
    Discarded(Rect),
    /// No gesture was in progress.
    Ignored,
}

/// Tracks one rectangle-drag gesture at a time.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    min_size: f64,
    anchor: Option<Point>,
    current: Option<Rect>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SELECTION_SIZE)
    }
}

impl SelectionTracker {
    /// Create a tracker with a custom minimum selection size.
    pub fn new(min_size: f64) -> Self {
        Self {
            min_size,
            anchor: None,
            current: None,
        }
    }

    pub fn state(&self) -> GestureState {
        if self.anchor.is_some() {
            GestureState::Dragging
        } else {
            GestureState::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// The live rectangle while dragging.
    pub fn current(&self) -> Option<Rect> {
        self.current
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Start a gesture at `point`.
    ///
    /// A gesture already in progress is dropped first, so the tracker never
    /// spans two gestures. The dropped rectangle is returned.
    pub fn begin(&mut self, point: Point) -> Option<Rect> {
        let dropped = if self.is_dragging() {
            self.current.take()
        } else {
            None
        };
        if let Some(rect) = dropped {
            tracing::debug!("Restarted selection, dropped {:?}", rect);
        }

        self.anchor = Some(point);
        self.current = Some(Rect::at(point));
        dropped
    }

    /// Move the free corner of the rectangle to `point`.
    ///
    /// Returns the updated rectangle, or `None` when no gesture is active.
    pub fn update(&mut self, point: Point) -> Option<Rect> {
        let anchor = self.anchor?;
        let rect = Rect::from_corners(anchor, point);
        self.current = Some(rect);
        Some(rect)
    }

    /// Release the pointer and decide whether the rectangle counts.
    pub fn end(&mut self, _point: Point) -> GestureOutcome {
        if self.anchor.take().is_none() {
            return GestureOutcome::Ignored;
        }
        let Some(rect) = self.current.take() else {
            return GestureOutcome::Ignored;
        };

        if rect.exceeds(self.min_size) {
            GestureOutcome::Finalized(rect)
        } else {
            GestureOutcome::Discarded(rect)
        }
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.anchor = None;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_lifecycle() {
        let mut tracker = SelectionTracker::default();
        assert_eq!(tracker.state(), GestureState::Idle);

        tracker.begin(Point::new(100.0, 100.0));
        assert_eq!(tracker.state(), GestureState::Dragging);
        assert_eq!(tracker.current(), Some(Rect::new(100.0, 100.0, 0.0, 0.0)));

        let rect = tracker.update(Point::new(40.0, 160.0)).unwrap();
        assert_eq!(rect, Rect::new(40.0, 100.0, 60.0, 60.0));

        let outcome = tracker.end(Point::new(40.0, 160.0));
        assert_eq!(outcome, GestureOutcome::Finalized(rect));
        assert_eq!(tracker.state(), GestureState::Idle);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_small_rectangle_discarded() {
        let mut tracker = SelectionTracker::default();
        tracker.begin(Point::new(10.0, 10.0));
        tracker.update(Point::new(15.0, 80.0));
        assert!(matches!(
            tracker.end(Point::new(15.0, 80.0)),
            GestureOutcome::Discarded(_)
        ));

        tracker.begin(Point::new(10.0, 10.0));
        tracker.update(Point::new(15.1, 15.1));
        assert!(matches!(
            tracker.end(Point::new(15.1, 15.1)),
            GestureOutcome::Finalized(_)
        ));
    }

    #[test]
    fn test_click_without_motion_is_discarded() {
        let mut tracker = SelectionTracker::default();
        tracker.begin(Point::new(10.0, 10.0));
        assert!(matches!(
            tracker.end(Point::new(90.0, 90.0)),
            GestureOutcome::Discarded(_)
        ));
    }

    #[test]
    fn test_motion_outside_gesture_is_noop() {
        let mut tracker = SelectionTracker::default();
        assert_eq!(tracker.update(Point::new(5.0, 5.0)), None);
        assert_eq!(tracker.end(Point::new(5.0, 5.0)), GestureOutcome::Ignored);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_begin_while_dragging_restarts() {
        let mut tracker = SelectionTracker::default();
        tracker.begin(Point::new(0.0, 0.0));
        tracker.update(Point::new(50.0, 50.0));

        let dropped = tracker.begin(Point::new(200.0, 200.0));
        assert_eq!(dropped, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(tracker.current(), Some(Rect::new(200.0, 200.0, 0.0, 0.0)));

        tracker.update(Point::new(210.0, 220.0));
        assert_eq!(
            tracker.end(Point::new(210.0, 220.0)),
            GestureOutcome::Finalized(Rect::new(200.0, 200.0, 10.0, 20.0))
        );
    }

    #[test]
    fn test_custom_min_size() {
        let mut tracker = SelectionTracker::new(20.0);
        tracker.begin(Point::new(0.0, 0.0));
        tracker.update(Point::new(15.0, 30.0));
        assert!(matches!(
            tracker.end(Point::new(15.0, 30.0)),
            GestureOutcome::Discarded(_)
        ));
    }
}
