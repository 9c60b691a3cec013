//! Plain geometry value types

/// Position of a rectangle's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle of a view subtree
///
/// Width and height are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const ZERO: Frame = Frame {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a frame; negative extents are clamped to zero
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest frame with whole-unit edges that contains this one
    pub fn integral(&self) -> Frame {
        let x = self.x.floor();
        let y = self.y.floor();
        Frame::new(
            x,
            y,
            (self.x + self.width).ceil() - x,
            (self.y + self.height).ceil() - y,
        )
    }

    /// Same frame moved vertically by `dy`
    pub fn offset_y(&self, dy: f64) -> Frame {
        Frame { y: self.y + dy, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_extent_clamped() {
        let frame = Frame::new(1.0, 2.0, -5.0, -0.5);
        assert_eq!(frame.size(), Size { width: 0.0, height: 0.0 });
        assert_eq!(frame.origin(), Point { x: 1.0, y: 2.0 });
    }

    #[test]
    fn test_integral_rounds_outward() {
        let frame = Frame::new(0.4, -0.2, 10.2, 5.1);
        assert_eq!(frame.integral(), Frame::new(0.0, -1.0, 11.0, 6.0));
    }

    #[test]
    fn test_offset_y() {
        let frame = Frame::new(0.0, 0.0, 320.0, 800.0).offset_y(-40.0);
        assert_eq!(frame.min_y(), -40.0);
        assert_eq!(frame.max_y(), 760.0);
    }
}
