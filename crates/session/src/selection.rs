//! Drag-to-select engine for the capture overlay

use crate::{SessionError, SessionResult};
use raster::{Point, Rect};

/// Symmetric padding added to the captured region when the drop shadow
/// decoration is enabled.
pub const SHADOW_PADDING: u32 = 7;

/// Tracks the selection rectangle while the user drags over the frozen
/// screenshot. Corners are kept raw (any drag direction) and normalized
/// only when the selection ends.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    anchor: Point,
    cursor: Point,
    dragging: bool,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the rectangle to a zero-size point at the pointer-down
    /// location.
    pub fn begin(&mut self, point: Point) {
        self.anchor = point;
        self.cursor = point;
        self.dragging = true;
    }

    /// Extend the dynamic corner. Pure coordinate update, no validation.
    pub fn update(&mut self, point: Point) {
        self.cursor = point;
    }

    /// Normalize and validate the selection. Degenerate selections are
    /// rejected and the caller must return to the idle state without
    /// creating a frame store.
    pub fn end(&mut self, drop_shadow: bool) -> SessionResult<Rect> {
        self.dragging = false;
        let rect = Rect::from_corners(self.anchor, self.cursor);
        if rect.is_degenerate() {
            return Err(SessionError::DegenerateSelection);
        }
        let pad = if drop_shadow { SHADOW_PADDING } else { 0 };
        Ok(Rect::new(rect.x, rect.y, rect.width + pad, rect.height + pad))
    }

    /// Raw drag corners, for overlay painting.
    pub fn corners(&self) -> (Point, Point) {
        (self.anchor, self.cursor)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Zero the rectangle, e.g. when the user escapes out of selecting.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
