//! Export module for Snipline
//!
//! Converts the current annotated frame into PNG or BMP bytes for saving,
//! and places frames on the system clipboard.

mod clipboard;
mod encode;

pub use clipboard::copy_to_clipboard;
pub use encode::{encode, save_to_path};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("No frame to export")]
    NoFrame,
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Losslessly compressed raster.
    Png,
    /// Uncompressed 32-bit raster, exact dimensions and full alpha.
    Bmp,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Bmp => "bmp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "Portable Network Graphics (PNG)",
            ExportFormat::Bmp => "32-bpp Bitmap",
        }
    }
}

/// Lossless PNG compression effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionEffort {
    Fast,
    #[default]
    Balanced,
    Best,
}
