use crate::geometry::Frame;

/// Tracks the frame of a view subtree and latches its top-aligned rect
///
/// The starting rect is taken from frames whose top edge sits at `y == 0`.
/// A frame anywhere else only updates the current frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTracker {
    current_frame: Frame,
    starting_rect: Option<Frame>,
}

impl FrameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new frame and return whether the starting rect changed
    pub fn update(&mut self, new_frame: Frame) -> bool {
        self.current_frame = new_frame;

        if new_frame.min_y() == 0.0 && self.starting_rect != Some(new_frame) {
            tracing::trace!(?new_frame, "Starting rect latched");
            self.starting_rect = Some(new_frame);
            return true;
        }

        false
    }

    /// Geometry-observer entry point
    ///
    /// Frames that round to the same integral rect as the current one are
    /// dropped so sub-unit layout jitter does not republish.
    pub fn observe(&mut self, frame: Frame) -> bool {
        if frame.integral() == self.current_frame.integral() {
            return false;
        }
        self.update(frame)
    }

    #[inline]
    pub fn current_frame(&self) -> Frame {
        self.current_frame
    }

    #[inline]
    pub fn starting_rect(&self) -> Option<Frame> {
        self.starting_rect
    }

    /// Vertical displacement of the current frame from the starting rect
    pub fn offset_from_start(&self) -> Option<f64> {
        self.starting_rect
            .map(|start| self.current_frame.min_y() - start.min_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_at(y: f64) -> Frame {
        Frame::new(0.0, y, 320.0, 1200.0)
    }

    #[test]
    fn test_initial_state() {
        let tracker = FrameTracker::new();
        assert_eq!(tracker.current_frame(), Frame::ZERO);
        assert_eq!(tracker.starting_rect(), None);
        assert_eq!(tracker.offset_from_start(), None);
    }

    #[test]
    fn test_first_top_frame_latches() {
        let mut tracker = FrameTracker::new();
        assert!(!tracker.update(frame_at(15.0)));
        assert_eq!(tracker.starting_rect(), None);

        assert!(tracker.update(frame_at(0.0)));
        assert_eq!(tracker.starting_rect(), Some(frame_at(0.0)));
    }

    #[test]
    fn test_non_top_frame_never_overwrites() {
        let mut tracker = FrameTracker::new();
        tracker.update(frame_at(0.0));

        for y in [-40.0, 12.5, -300.0, 1.0] {
            assert!(!tracker.update(frame_at(y)));
            assert_eq!(tracker.current_frame(), frame_at(y));
            assert_eq!(tracker.starting_rect(), Some(frame_at(0.0)));
        }
    }

    #[test]
    fn test_equal_top_frame_does_not_relatch() {
        let mut tracker = FrameTracker::new();
        assert!(tracker.update(frame_at(0.0)));
        tracker.update(frame_at(-20.0));
        assert!(!tracker.update(frame_at(0.0)));
    }

    #[test]
    fn test_different_top_frame_replaces_latch() {
        let mut tracker = FrameTracker::new();
        tracker.update(frame_at(0.0));

        let resized = Frame::new(0.0, 0.0, 320.0, 1600.0);
        assert!(tracker.update(resized));
        assert_eq!(tracker.starting_rect(), Some(resized));
    }

    #[test]
    fn test_observe_ignores_sub_unit_jitter() {
        let mut tracker = FrameTracker::new();
        tracker.update(frame_at(0.0));
        tracker.update(frame_at(-10.2));

        assert!(!tracker.observe(frame_at(-10.4)));
        assert_eq!(tracker.current_frame(), frame_at(-10.2));

        tracker.observe(frame_at(-25.0));
        assert_eq!(tracker.current_frame(), frame_at(-25.0));
        assert_eq!(tracker.offset_from_start(), Some(-25.0));
    }
}
