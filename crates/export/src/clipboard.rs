//! Clipboard placement

use crate::{ExportError, ExportResult};
use arboard::{Clipboard, ImageData};
use raster::Frame;
use std::borrow::Cow;
use tracing::debug;

/// Place the frame on the system clipboard as raw RGBA image data.
pub fn copy_to_clipboard(frame: &Frame) -> ExportResult<()> {
    let mut clipboard = Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
    let image = ImageData {
        width: frame.width() as usize,
        height: frame.height() as usize,
        bytes: Cow::Borrowed(frame.data()),
    };
    clipboard
        .set_image(image)
        .map_err(|e| ExportError::Clipboard(e.to_string()))?;
    debug!(
        width = frame.width(),
        height = frame.height(),
        "frame copied to clipboard"
    );
    Ok(())
}
