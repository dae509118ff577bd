//! Highlighter dedup ring buffer

use crate::geom::Point;

/// Capacity of the painted-pixel ring. Once full, the oldest entry is
/// overwritten.
pub const PAINTED_CAPACITY: usize = 32768;

/// Bounded ring of recently highlighted pixel coordinates. Used during a
/// highlighter stroke so a pixel is alpha-blended at most once; without it,
/// a lingering pointer would blend the same pixel every pointer-move and the
/// highlight would creep towards full opacity.
pub struct PaintedSet {
    slots: Vec<Option<Point>>,
    cursor: usize,
}

impl PaintedSet {
    pub fn new() -> Self {
        Self {
            slots: vec![None; PAINTED_CAPACITY],
            cursor: 0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.slots.iter().any(|slot| *slot == Some(point))
    }

    /// Record a painted pixel, overwriting the oldest entry when the ring
    /// is full.
    pub fn insert(&mut self, point: Point) {
        self.slots[self.cursor] = Some(point);
        self.cursor = (self.cursor + 1) % PAINTED_CAPACITY;
    }

    /// Forget everything. Called on undo and at stroke start.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
    }
}

impl Default for PaintedSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let mut set = PaintedSet::new();
        let p = Point::new(12, 34);
        assert!(!set.contains(p));
        set.insert(p);
        assert!(set.contains(p));
        assert!(!set.contains(Point::new(34, 12)));
    }

    #[test]
    fn clear_forgets_all_entries() {
        let mut set = PaintedSet::new();
        set.insert(Point::new(1, 1));
        set.insert(Point::new(2, 2));
        set.clear();
        assert!(!set.contains(Point::new(1, 1)));
        assert!(!set.contains(Point::new(2, 2)));
    }

    #[test]
    fn wraps_around_at_capacity() {
        let mut set = PaintedSet::new();
        for i in 0..PAINTED_CAPACITY {
            set.insert(Point::new(i as i32, 0));
        }
        let extra = Point::new(-1, -1);
        set.insert(extra);
        assert!(set.contains(extra));
        // The oldest entry was overwritten.
        assert!(!set.contains(Point::new(0, 0)));
        assert!(set.contains(Point::new(1, 0)));
    }
}
