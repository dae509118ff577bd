//! Bounded undo stack of committed frames

use crate::{SessionError, SessionResult};
use raster::Frame;

/// Total store capacity including the pristine entry 0.
pub const STORE_CAPACITY: usize = 32;

/// Ordered stack of committed frames for one capture session. Entry 0 is
/// the pristine capture and is never overwritten; every edit pushes a new
/// top, and undo discards the top back down to entry 0.
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Seed the store with the pristine capture. Replaces any previous
    /// session contents.
    pub fn init(&mut self, pristine: Frame) {
        self.frames.clear();
        self.frames.push(pristine);
    }

    /// Push a new top frame. Rejected when the store is full; the frame is
    /// dropped and the store is unchanged.
    pub fn commit(&mut self, frame: Frame) -> SessionResult<()> {
        if self.frames.len() >= STORE_CAPACITY {
            return Err(SessionError::StoreFull);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Discard the top frame. Fails without touching the store when the
    /// cursor is already at the pristine entry.
    pub fn undo(&mut self) -> SessionResult<()> {
        if self.frames.len() <= 1 {
            return Err(SessionError::NothingToUndo);
        }
        self.frames.pop();
        Ok(())
    }

    /// Read-only view of the top frame, or None before the first capture.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Cursor position of the top frame.
    pub fn cursor(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= STORE_CAPACITY
    }

    /// Release every frame, ready for a new capture session.
    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> Frame {
        let mut f = Frame::new(2, 2).unwrap();
        f.put_pixel(0, 0, [tag, tag, tag, 0xFF]);
        f
    }

    #[test]
    fn current_is_none_before_init() {
        let store = FrameStore::new();
        assert!(store.current().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn commits_then_undos_return_to_pristine() {
        let mut store = FrameStore::new();
        let pristine = frame(0);
        store.init(pristine.clone());

        for i in 1..=31u8 {
            store.commit(frame(i)).unwrap();
        }
        assert_eq!(store.depth(), 32);

        for _ in 0..31 {
            store.undo().unwrap();
        }
        assert_eq!(store.cursor(), 0);
        assert_eq!(store.current().unwrap(), &pristine);
    }

    #[test]
    fn undo_at_pristine_fails_and_changes_nothing() {
        let mut store = FrameStore::new();
        store.init(frame(0));
        assert!(matches!(store.undo(), Err(SessionError::NothingToUndo)));
        assert_eq!(store.depth(), 1);
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn commit_past_capacity_is_rejected_unchanged() {
        let mut store = FrameStore::new();
        store.init(frame(0));
        for i in 1..=31u8 {
            store.commit(frame(i)).unwrap();
        }
        assert!(store.is_full());

        let top_before = store.current().unwrap().clone();
        assert!(matches!(store.commit(frame(99)), Err(SessionError::StoreFull)));
        assert_eq!(store.depth(), 32);
        assert_eq!(store.current().unwrap(), &top_before);
    }

    #[test]
    fn reset_releases_everything() {
        let mut store = FrameStore::new();
        store.init(frame(0));
        store.commit(frame(1)).unwrap();
        store.reset();
        assert!(store.is_empty());
        assert!(store.current().is_none());
    }
}
