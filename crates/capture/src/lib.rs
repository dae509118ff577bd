//! Screen capture module for Snipline
//!
//! Provides the virtual-desktop snapshot the annotation session crops from.

pub mod desktop;

pub use desktop::DesktopCapture;

use raster::{Frame, Point, RasterError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no monitors available")]
    NoMonitors,

    #[error("display geometry is empty")]
    EmptyGeometry,

    #[error("capture backend error: {0}")]
    Backend(String),

    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// One full snapshot of the combined coordinate space of all monitors.
/// `origin` is the top-left of the virtual desktop, which can be negative
/// when monitors sit left of or above the primary.
#[derive(Debug, Clone)]
pub struct DesktopSnapshot {
    pub frame: Frame,
    pub origin: Point,
}

/// Source of desktop snapshots. The session treats a failure here as fatal
/// to the capture attempt; tests substitute a canned implementation.
pub trait CaptureSource {
    fn capture_virtual_desktop(&self) -> CaptureResult<DesktopSnapshot>;
}
