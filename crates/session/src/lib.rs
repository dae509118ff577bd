//! Annotation session for Snipline
//!
//! Owns the frame undo stack, the drag-to-select engine, the active tool
//! and the top-level capture/edit state machine.

pub mod machine;
pub mod selection;
pub mod settings;
pub mod store;
pub mod tool;

pub use machine::{Session, SessionState};
pub use selection::SelectionEngine;
pub use settings::Settings;
pub use store::FrameStore;
pub use tool::Tool;

use capture::CaptureError;
use raster::RasterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("maximum number of changes exceeded, undo a change first")]
    StoreFull,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("selection has zero width or height")]
    DegenerateSelection,

    #[error("operation is not valid in the {0:?} state")]
    InvalidState(SessionState),

    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
}

impl SessionError {
    /// User-correctable errors leave the session intact and only warrant a
    /// status message; everything else is fatal or an internal bug.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            SessionError::StoreFull
                | SessionError::NothingToUndo
                | SessionError::DegenerateSelection
        )
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
