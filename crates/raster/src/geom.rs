//! Points and rectangles in pixel space

/// Point in pixel coordinates. Virtual-desktop coordinates may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a normalized rectangle from two drag corners. The corners may
    /// be given in any drag direction; the result always has the top-left
    /// origin and absolute width/height.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).unsigned_abs(),
            height: (a.y - b.y).unsigned_abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Zero-width or zero-height rectangles cannot be captured.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let expected = Rect::new(10, 10, 100, 50);
        let a = Point::new(10, 10);
        let b = Point::new(110, 60);
        assert_eq!(Rect::from_corners(a, b), expected);
        assert_eq!(Rect::from_corners(b, a), expected);
        assert_eq!(Rect::from_corners(Point::new(110, 10), Point::new(10, 60)), expected);
        assert_eq!(Rect::from_corners(Point::new(10, 60), Point::new(110, 10)), expected);
    }

    #[test]
    fn degenerate_when_either_axis_is_zero() {
        let p = Point::new(5, 5);
        assert!(Rect::from_corners(p, p).is_degenerate());
        assert!(Rect::from_corners(p, Point::new(5, 50)).is_degenerate());
        assert!(Rect::from_corners(p, Point::new(50, 5)).is_degenerate());
        assert!(!Rect::from_corners(p, Point::new(6, 6)).is_degenerate());
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 9));
        assert!(!r.contains(-1, 0));
    }
}
