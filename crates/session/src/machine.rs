//! Annotation session state machine
//!
//! Routes pointer, keyboard and timer events between the selection engine,
//! the tool compositor and the frame store. All of it runs on the one UI
//! event thread; nothing here blocks or suspends.

use crate::selection::SelectionEngine;
use crate::store::FrameStore;
use crate::tool::Tool;
use crate::{SessionError, SessionResult};
use capture::{CaptureSource, DesktopSnapshot};
use raster::{tools, Frame, PaintedSet, Point, Rect};
use tracing::{debug, warn};

/// Seconds on the delayed-capture countdown.
pub const COUNTDOWN_START: u8 = 6;

/// Top-level session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Before any capture.
    Idle,
    /// Delayed capture armed; a one-second timer ticks the counter down.
    CountdownPending,
    /// Transient: snapshotting the virtual desktop.
    Capturing,
    /// Full-screen overlay up, user dragging out the region.
    Selecting,
    /// Frame store populated, tools available.
    Editing,
}

/// One capture-and-annotate session. Owns every piece of mutable state the
/// event handlers touch; there are no ambient globals.
pub struct Session {
    state: SessionState,
    store: FrameStore,
    selection: SelectionEngine,
    active_tool: Option<Tool>,
    scratch: Option<Frame>,
    stroke_anchor: Option<Point>,
    painted: PaintedSet,
    snapshot: Option<DesktopSnapshot>,
    countdown: u8,
    drop_shadow: bool,
}

impl Session {
    pub fn new(drop_shadow: bool) -> Self {
        Self {
            state: SessionState::Idle,
            store: FrameStore::new(),
            selection: SelectionEngine::new(),
            active_tool: None,
            scratch: None,
            stroke_anchor: None,
            painted: PaintedSet::new(),
            snapshot: None,
            countdown: COUNTDOWN_START,
            drop_shadow,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.active_tool
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn drop_shadow(&self) -> bool {
        self.drop_shadow
    }

    pub fn set_drop_shadow(&mut self, enabled: bool) {
        self.drop_shadow = enabled;
    }

    pub fn snapshot(&self) -> Option<&DesktopSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn stroke_active(&self) -> bool {
        self.scratch.is_some()
    }

    /// The frame the editing window should show right now: the scratch
    /// while a stroke is in progress, the committed top otherwise.
    pub fn displayed_frame(&self) -> Option<&Frame> {
        self.scratch.as_ref().or_else(|| self.store.current())
    }

    /// Select a tool, deselecting the previous one. Passing the active tool
    /// again keeps it; passing None clears the selection.
    pub fn select_tool(&mut self, tool: Option<Tool>) {
        self.active_tool = tool;
    }

    /// Arm the delayed capture.
    pub fn start_countdown(&mut self) -> SessionResult<()> {
        match self.state {
            SessionState::Idle | SessionState::Editing => {
                self.countdown = COUNTDOWN_START;
                self.state = SessionState::CountdownPending;
                Ok(())
            }
            other => Err(SessionError::InvalidState(other)),
        }
    }

    /// One-second timer tick. Returns true when the countdown just expired
    /// and the caller should begin the capture.
    pub fn tick_countdown(&mut self) -> bool {
        if self.state != SessionState::CountdownPending {
            return false;
        }
        self.countdown = self.countdown.saturating_sub(1);
        self.countdown == 0
    }

    /// Snapshot the virtual desktop and move to region selection. A capture
    /// failure is unrecoverable for this session: state drops back to Idle
    /// and the error propagates for the caller to report and exit on.
    pub fn begin_capture(&mut self, source: &dyn CaptureSource) -> SessionResult<()> {
        match self.state {
            SessionState::Idle | SessionState::CountdownPending | SessionState::Editing => {}
            other => return Err(SessionError::InvalidState(other)),
        }
        self.state = SessionState::Capturing;
        self.store.reset();
        self.selection.reset();
        self.scratch = None;
        self.stroke_anchor = None;
        self.painted.clear();
        self.active_tool = None;
        self.countdown = COUNTDOWN_START;

        match source.capture_virtual_desktop() {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.state = SessionState::Selecting;
                Ok(())
            }
            Err(e) => {
                self.snapshot = None;
                self.state = SessionState::Idle;
                Err(e.into())
            }
        }
    }

    pub fn selection_begin(&mut self, point: Point) {
        if self.state != SessionState::Selecting {
            return;
        }
        self.selection.begin(point);
    }

    pub fn selection_update(&mut self, point: Point) {
        if self.state != SessionState::Selecting {
            return;
        }
        self.selection.update(point);
    }

    /// Repaint the overlay: the frozen screenshot, the rectangle outline
    /// while dragging, and dimming over everything outside the selection.
    pub fn selection_overlay(&self) -> Option<Frame> {
        let snapshot = self.snapshot.as_ref()?;
        let mut frame = snapshot.frame.clone();
        let (a, b) = self.selection.corners();
        if self.selection.is_dragging() {
            tools::selection_outline(&mut frame, a, b);
        }
        tools::dim_outside(&mut frame, a, b, self.selection.is_dragging());
        Some(frame)
    }

    /// Finish the drag. A valid region crops the clean screenshot into
    /// frame store entry 0 and moves to editing; a degenerate one rejects
    /// the selection and returns to Idle with the store untouched.
    pub fn selection_end(&mut self) -> SessionResult<Rect> {
        if self.state != SessionState::Selecting {
            return Err(SessionError::InvalidState(self.state));
        }
        let region = match self.selection.end(self.drop_shadow) {
            Ok(region) => region,
            Err(e) => {
                self.selection.reset();
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        let Some(snapshot) = self.snapshot.as_ref() else {
            warn!("selecting without a snapshot");
            self.state = SessionState::Idle;
            return Err(SessionError::InvalidState(SessionState::Selecting));
        };
        let mut pristine = snapshot.frame.crop(&region)?;
        if self.drop_shadow {
            pristine.bake_drop_shadow();
        }
        self.store.init(pristine);
        self.state = SessionState::Editing;
        Ok(region)
    }

    /// Escape out of selecting or the countdown, back to Idle with full
    /// state reset. Returns whether anything changed.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            SessionState::Selecting => {
                self.selection.reset();
                self.state = SessionState::Idle;
                true
            }
            SessionState::CountdownPending => {
                self.countdown = COUNTDOWN_START;
                self.state = SessionState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Pointer-down over the image area: begin a stroke by cloning the
    /// committed top into the scratch. Without an active tool this does
    /// nothing; with a full store the stroke is refused before it starts.
    pub fn pointer_down(&mut self, point: Point) -> SessionResult<()> {
        if self.state != SessionState::Editing {
            return Ok(());
        }
        let Some(_tool) = self.active_tool else {
            debug!("no drawing tool selected, won't start drawing");
            return Ok(());
        };
        let Some(current) = self.store.current() else {
            warn!("editing state with an empty frame store");
            return Ok(());
        };
        if !current.contains(point.x, point.y) {
            debug!(?point, "pointer outside the capture area, won't start drawing");
            return Ok(());
        }
        if self.store.is_full() {
            return Err(SessionError::StoreFull);
        }
        if self.scratch.is_some() {
            warn!("scratch frame already present at stroke start");
        }
        self.scratch = Some(current.clone());
        self.stroke_anchor = Some(point);
        self.painted.clear();
        Ok(())
    }

    /// Pointer-move while a stroke is active: apply the tool to the
    /// scratch. A missing scratch is an internal invariant violation and a
    /// logged no-op.
    pub fn pointer_move(&mut self, point: Point) {
        let Some(anchor) = self.stroke_anchor else {
            return;
        };
        let Some(tool) = self.active_tool else {
            return;
        };
        if self.scratch.is_none() {
            warn!("stroke active but scratch frame is missing");
            return;
        }

        if tool.redraws_from_committed() {
            // Shape tools preview against the committed top, not the
            // accumulated scratch, so the shape follows the pointer.
            let Some(clean) = self.store.current() else {
                warn!("stroke active but frame store is empty");
                return;
            };
            let mut fresh = clean.clone();
            match tool {
                Tool::Rectangle => tools::rectangle(&mut fresh, anchor, point),
                Tool::Arrow => tools::arrow(&mut fresh, anchor, point),
                _ => unreachable!(),
            }
            self.scratch = Some(fresh);
        } else {
            let Some(scratch) = self.scratch.as_mut() else {
                warn!("stroke active but scratch frame is missing");
                return;
            };
            match tool {
                Tool::Highlighter => tools::highlight(scratch, point, &mut self.painted),
                Tool::Redact => tools::redact(scratch, point),
                _ => unreachable!(),
            }
        }
    }

    /// Pointer-up: commit the scratch as the new top frame. Without an
    /// active stroke this is a no-op.
    pub fn pointer_up(&mut self) -> SessionResult<()> {
        self.stroke_anchor = None;
        let Some(frame) = self.scratch.take() else {
            return Ok(());
        };
        self.store.commit(frame)
    }

    /// Ctrl+Z: discard the top frame and clear the highlighter dedup ring.
    pub fn undo(&mut self) -> SessionResult<()> {
        if self.state != SessionState::Editing {
            return Err(SessionError::InvalidState(self.state));
        }
        self.store.undo()?;
        self.painted.clear();
        Ok(())
    }
}
