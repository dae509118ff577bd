//! Frame bitmaps and pixel compositing primitives

use crate::geom::Rect;
use crate::{RasterError, RasterResult};

/// Width of the baked drop-shadow border in pixels.
pub const SHADOW_WIDTH: u32 = 7;

/// Gray ramp for the drop shadow, innermost line first. Each entry is the
/// inset from the right/bottom edge and the gray level drawn there.
const SHADOW_RAMP: [(u32, u8); 7] = [
    (7, 159),
    (6, 172),
    (5, 192),
    (4, 215),
    (3, 234),
    (2, 245),
    (1, 250),
];

/// One RGBA8 raster snapshot. Committed frames are immutable by convention;
/// every edit operates on a scratch clone and commits a new Frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Allocate an opaque black frame.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 0xFF;
        }
        Ok(Self { data, width, height })
    }

    /// Wrap an existing RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSizeMismatch { expected, actual: data.len() });
        }
        Ok(Self { data, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        ((y as u32 * self.width + x as u32) * 4) as usize
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.contains(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Write a pixel; out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if !self.contains(x, y) {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Source-over blend of a solid color at constant alpha. The destination
    /// alpha channel is preserved. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3], alpha: u8) {
        if !self.contains(x, y) {
            return;
        }
        let i = self.offset(x, y);
        let a = alpha as u32;
        let inv = 255 - a;
        for c in 0..3 {
            let src = rgb[c] as u32;
            let dst = self.data[i + c] as u32;
            self.data[i + c] = ((src * a + dst * inv) / 255) as u8;
        }
    }

    /// Copy a sub-region into a new Frame. The rectangle is clamped to the
    /// frame bounds; a rectangle entirely outside the frame is an error.
    pub fn crop(&self, rect: &Rect) -> RasterResult<Frame> {
        let src_x = rect.x.max(0) as u32;
        let src_y = rect.y.max(0) as u32;
        if src_x >= self.width || src_y >= self.height {
            return Err(RasterError::CropOutOfBounds);
        }
        let crop_width = rect.width.min(self.width - src_x);
        let crop_height = rect.height.min(self.height - src_y);
        if crop_width == 0 || crop_height == 0 {
            return Err(RasterError::CropOutOfBounds);
        }

        let mut cropped = Vec::with_capacity((crop_width * crop_height * 4) as usize);
        for y in 0..crop_height {
            let start = (((src_y + y) * self.width + src_x) * 4) as usize;
            cropped.extend_from_slice(&self.data[start..start + (crop_width as usize) * 4]);
        }

        Frame::from_rgba(crop_width, crop_height, cropped)
    }

    /// Blit another frame into this one with its top-left at (x, y).
    /// Rows falling outside this frame are skipped.
    pub fn blit(&mut self, src: &Frame, x: i32, y: i32) {
        for row in 0..src.height as i32 {
            let dst_y = y + row;
            if dst_y < 0 || dst_y as u32 >= self.height {
                continue;
            }
            for col in 0..src.width as i32 {
                let dst_x = x + col;
                if dst_x < 0 || dst_x as u32 >= self.width {
                    continue;
                }
                let s = src.offset(col, row);
                let d = self.offset(dst_x, dst_y);
                self.data[d..d + 4].copy_from_slice(&src.data[s..s + 4]);
            }
        }
    }

    /// Bake the decorative drop shadow into the right and bottom edge
    /// pixels: seven L-shaped gray lines ramping from dark inside to light
    /// outside. The frame must already include the shadow padding.
    pub fn bake_drop_shadow(&mut self) {
        if self.width <= SHADOW_WIDTH || self.height <= SHADOW_WIDTH {
            return;
        }
        for (inset, gray) in SHADOW_RAMP {
            let color = [gray, gray, gray, 0xFF];
            let edge_x = (self.width - inset) as i32;
            let edge_y = (self.height - inset) as i32;
            for x in 0..=edge_x {
                self.put_pixel(x, edge_y, color);
            }
            for y in 0..edge_y {
                self.put_pixel(edge_x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut frame = Frame::new(width, height).unwrap();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                frame.put_pixel(x, y, [x as u8, y as u8, 0, 0xFF]);
            }
        }
        frame
    }

    #[test]
    fn rejects_zero_dimensions_and_bad_buffers() {
        assert!(Frame::new(0, 10).is_err());
        assert!(Frame::new(10, 0).is_err());
        assert!(Frame::from_rgba(2, 2, vec![0u8; 15]).is_err());
        assert!(Frame::from_rgba(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn blend_full_alpha_replaces_and_zero_alpha_keeps() {
        let mut frame = Frame::new(4, 4).unwrap();
        frame.put_pixel(1, 1, [100, 100, 100, 0xFF]);

        frame.blend_pixel(1, 1, [200, 0, 0], 255);
        assert_eq!(frame.pixel(1, 1).unwrap(), [200, 0, 0, 0xFF]);

        frame.blend_pixel(1, 1, [0, 200, 0], 0);
        assert_eq!(frame.pixel(1, 1).unwrap(), [200, 0, 0, 0xFF]);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut frame = Frame::new(2, 2).unwrap();
        let before = frame.clone();
        frame.put_pixel(-1, 0, [1, 2, 3, 4]);
        frame.put_pixel(2, 0, [1, 2, 3, 4]);
        frame.blend_pixel(0, 5, [1, 2, 3], 128);
        assert_eq!(frame, before);
    }

    #[test]
    fn crop_copies_the_exact_subregion() {
        let frame = gradient_frame(16, 16);
        let cropped = frame.crop(&Rect::new(3, 5, 4, 2)).unwrap();
        assert_eq!(cropped.width(), 4);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.pixel(0, 0).unwrap(), [3, 5, 0, 0xFF]);
        assert_eq!(cropped.pixel(3, 1).unwrap(), [6, 6, 0, 0xFF]);
    }

    #[test]
    fn crop_clamps_to_frame_bounds() {
        let frame = gradient_frame(8, 8);
        let cropped = frame.crop(&Rect::new(6, 6, 10, 10)).unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert!(frame.crop(&Rect::new(20, 20, 4, 4)).is_err());
    }

    #[test]
    fn drop_shadow_ramps_on_right_and_bottom_edges() {
        let mut frame = Frame::new(20, 20).unwrap();
        frame.bake_drop_shadow();
        // Outermost line is the lightest gray, innermost the darkest.
        assert_eq!(frame.pixel(0, 19).unwrap(), [250, 250, 250, 0xFF]);
        assert_eq!(frame.pixel(19, 0).unwrap(), [250, 250, 250, 0xFF]);
        assert_eq!(frame.pixel(0, 13).unwrap(), [159, 159, 159, 0xFF]);
        assert_eq!(frame.pixel(13, 0).unwrap(), [159, 159, 159, 0xFF]);
        // Interior pixels are untouched.
        assert_eq!(frame.pixel(0, 0).unwrap(), [0, 0, 0, 0xFF]);
        assert_eq!(frame.pixel(12, 12).unwrap(), [0, 0, 0, 0xFF]);
    }
}
