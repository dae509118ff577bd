//! Virtual-desktop snapshots via xcap

use crate::{CaptureError, CaptureResult, CaptureSource, DesktopSnapshot};
use raster::{Frame, Point};
use tracing::debug;
use xcap::Monitor;

/// Captures every monitor and composites them into one frame spanning the
/// bounding box of all displays.
pub struct DesktopCapture;

impl DesktopCapture {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for DesktopCapture {
    fn capture_virtual_desktop(&self) -> CaptureResult<DesktopSnapshot> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitors);
        }

        // Bounding box of all monitors. 0,0 is not necessarily the top-left
        // of the viewing area when monitors are arranged in reverse order.
        let left = monitors.iter().map(|m| m.x()).min().unwrap_or(0);
        let top = monitors.iter().map(|m| m.y()).min().unwrap_or(0);
        let right = monitors
            .iter()
            .map(|m| m.x() + m.width() as i32)
            .max()
            .unwrap_or(0);
        let bottom = monitors
            .iter()
            .map(|m| m.y() + m.height() as i32)
            .max()
            .unwrap_or(0);

        let width = (right - left).max(0) as u32;
        let height = (bottom - top).max(0) as u32;
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyGeometry);
        }

        debug!(width, height, left, top, "capturing virtual desktop");

        let mut frame = Frame::new(width, height)?;
        for monitor in &monitors {
            let image = monitor
                .capture_image()
                .map_err(|e| CaptureError::Backend(e.to_string()))?;
            let (img_width, img_height) = (image.width(), image.height());
            let tile = Frame::from_rgba(img_width, img_height, image.into_raw())?;
            frame.blit(&tile, monitor.x() - left, monitor.y() - top);
        }

        Ok(DesktopSnapshot {
            frame,
            origin: Point::new(left, top),
        })
    }
}
