//! Raster module for Snipline
//!
//! Owns the pixel-level building blocks: the `Frame` bitmap type, drag
//! geometry, the highlighter dedup ring, and the stateless tool compositor.

pub mod frame;
pub mod geom;
pub mod painted;
pub mod tools;

pub use frame::Frame;
pub use geom::{Point, Rect};
pub use painted::PaintedSet;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("frame dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer length {actual} does not match {expected} for the given dimensions")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("crop rectangle lies outside the frame")]
    CropOutOfBounds,
}

pub type RasterResult<T> = Result<T, RasterError>;
