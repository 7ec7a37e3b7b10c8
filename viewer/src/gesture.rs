//! Horizontal swipe interpretation.

/// Minimum horizontal travel, in touch coordinate units, for a swipe to
/// navigate. Fixed; not derived from the screen size.
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeIntent {
    Previous,
    Next,
    None,
}

/// Content dragged left (start right of end) advances, dragged right goes back.
pub fn interpret(start: f32, end: f32, threshold: f32) -> SwipeIntent {
    let distance = start - end;
    if distance > threshold {
        SwipeIntent::Next
    } else if distance < -threshold {
        SwipeIntent::Previous
    } else {
        SwipeIntent::None
    }
}

/// Start/end scratch state of the touch currently in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureTracker {
    start: Option<f32>,
    end: Option<f32>,
}

impl GestureTracker {
    pub fn begin(&mut self, x: f32) {
        self.start = Some(x);
        self.end = None;
    }

    pub fn update(&mut self, x: f32) {
        self.end = Some(x);
    }

    /// Consume the recorded gesture. A touch without movement yields `None`.
    pub fn finish(&mut self, threshold: f32) -> SwipeIntent {
        match (self.start.take(), self.end.take()) {
            (Some(start), Some(end)) => interpret(start, end, threshold),
            _ => SwipeIntent::None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_left_advances() {
        assert_eq!(interpret(200.0, 100.0, SWIPE_THRESHOLD), SwipeIntent::Next);
    }

    #[test]
    fn test_swipe_right_goes_back() {
        assert_eq!(interpret(100.0, 200.0, SWIPE_THRESHOLD), SwipeIntent::Previous);
    }

    #[test]
    fn test_sub_threshold_is_ignored() {
        assert_eq!(interpret(120.0, 100.0, SWIPE_THRESHOLD), SwipeIntent::None);
        assert_eq!(interpret(150.0, 100.0, SWIPE_THRESHOLD), SwipeIntent::None);
        assert_eq!(interpret(100.0, 150.0, SWIPE_THRESHOLD), SwipeIntent::None);
    }

    #[test]
    fn test_interpret_is_symmetric() {
        let samples = [0.0, 10.0, 49.0, 50.5, 120.0, 300.0, -80.0];
        for &a in &samples {
            assert_eq!(interpret(a, a, SWIPE_THRESHOLD), SwipeIntent::None);
            for &b in &samples {
                let forward = interpret(a, b, SWIPE_THRESHOLD) == SwipeIntent::Previous;
                let backward = interpret(b, a, SWIPE_THRESHOLD) == SwipeIntent::Next;
                assert_eq!(forward, backward, "a={a} b={b}");
            }
        }
    }

    #[test]
    fn test_tracker_requires_movement() {
        let mut tracker = GestureTracker::default();
        tracker.begin(200.0);
        assert!(tracker.is_tracking());
        assert_eq!(tracker.finish(SWIPE_THRESHOLD), SwipeIntent::None);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_tracker_last_move_wins_and_clears() {
        let mut tracker = GestureTracker::default();
        tracker.begin(200.0);
        tracker.update(190.0);
        tracker.update(90.0);
        assert_eq!(tracker.finish(SWIPE_THRESHOLD), SwipeIntent::Next);
        assert_eq!(tracker, GestureTracker::default());
    }
}
