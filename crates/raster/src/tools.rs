//! Stateless tool compositor
//!
//! Every operation takes the scratch frame plus the stroke anchor and the
//! current pointer position, and mutates the scratch in place. Committed
//! frames are never touched here.

use crate::frame::Frame;
use crate::geom::{Point, Rect};
use crate::painted::PaintedSet;

/// Brush footprint for the highlighter and redact tools.
pub const BRUSH_WIDTH: i32 = 10;
pub const BRUSH_HEIGHT: i32 = 20;

/// Highlighter ink.
const HIGHLIGHT_COLOR: [u8; 3] = [0xFF, 0xFF, 0x00];

/// Pen color for rectangle and arrow strokes.
const STROKE_COLOR: [u8; 4] = [0xFF, 0x00, 0x00, 0xFF];

/// Stroke width for rectangle and arrow outlines.
const STROKE_WIDTH: i32 = 2;

const ARROW_HEAD_LENGTH: f32 = 10.0;
const ARROW_HEAD_HALF_WIDTH: f32 = 5.0;

/// Selection dimming: ~50% dark gray blended over everything outside the
/// selection rectangle.
const DIM_COLOR: [u8; 3] = [0x40, 0x40, 0x40];
const DIM_ALPHA: u8 = 128;

/// Outline drawn around an in-progress selection.
const SELECTION_OUTLINE: [u8; 4] = [0x10, 0x10, 0x10, 0xFF];

/// Alpha-blend the highlighter footprint at `pointer`. Each pixel is blended
/// at most once per painted-set lifetime, with strength taken from the
/// pixel's own brightness ((r+g+b)/3), so the marker reads differently over
/// dark and light content instead of flooding both.
pub fn highlight(frame: &mut Frame, pointer: Point, painted: &mut PaintedSet) {
    for dx in 0..BRUSH_WIDTH {
        for dy in 0..BRUSH_HEIGHT {
            let p = Point::new(pointer.x + dx, pointer.y + dy);
            if painted.contains(p) {
                continue;
            }
            if let Some([r, g, b, _]) = frame.pixel(p.x, p.y) {
                let alpha = ((r as u16 + g as u16 + b as u16) / 3) as u8;
                frame.blend_pixel(p.x, p.y, HIGHLIGHT_COLOR, alpha);
                painted.insert(p);
            }
        }
    }
}

/// Fill the brush footprint at `pointer` with opaque black. Idempotent per
/// pixel, so no dedup is needed.
pub fn redact(frame: &mut Frame, pointer: Point) {
    for dx in 0..BRUSH_WIDTH {
        for dy in 0..BRUSH_HEIGHT {
            frame.put_pixel(pointer.x + dx, pointer.y + dy, [0, 0, 0, 0xFF]);
        }
    }
}

/// Draw a 2 px red stroked outline from the stroke anchor to the pointer.
/// The interior is left unfilled.
pub fn rectangle(frame: &mut Frame, anchor: Point, pointer: Point) {
    let rect = Rect::from_corners(anchor, pointer);
    for inset in 0..STROKE_WIDTH {
        hollow_rect(frame, &rect, inset, STROKE_COLOR);
    }
}

/// Draw a 2 px red line from the anchor to the pointer, capped with a filled
/// triangular head at the pointer end. A zero-length vector has no direction
/// and the operation is a no-op.
pub fn arrow(frame: &mut Frame, anchor: Point, pointer: Point) {
    let Some((corner1, corner2)) = arrow_head_corners(anchor, pointer) else {
        return;
    };
    line(frame, anchor, pointer, STROKE_COLOR, STROKE_WIDTH);
    fill_triangle(frame, pointer, corner1, corner2, STROKE_COLOR);
}

/// Back corners of the arrowhead triangle, or None for a zero-length arrow.
/// The apex is the pointer itself.
pub fn arrow_head_corners(anchor: Point, pointer: Point) -> Option<(Point, Point)> {
    let dx = (pointer.x - anchor.x) as f32;
    let dy = (pointer.y - anchor.y) as f32;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }

    let (ux, uy) = (dx / len, dy / len);
    // Perpendicular unit vector.
    let (vx, vy) = (-uy, ux);

    let base_x = pointer.x as f32 - ARROW_HEAD_LENGTH * ux;
    let base_y = pointer.y as f32 - ARROW_HEAD_LENGTH * uy;

    let corner1 = Point::new(
        (base_x + ARROW_HEAD_HALF_WIDTH * vx).round() as i32,
        (base_y + ARROW_HEAD_HALF_WIDTH * vy).round() as i32,
    );
    let corner2 = Point::new(
        (base_x - ARROW_HEAD_HALF_WIDTH * vx).round() as i32,
        (base_y - ARROW_HEAD_HALF_WIDTH * vy).round() as i32,
    );
    Some((corner1, corner2))
}

/// Dim everything outside the selection rectangle with alpha-blended dark
/// gray. The band right of the selection is always dimmed; the left, top and
/// bottom bands only while the user is actively dragging. Before a drag
/// begins the selection is a zero-size point at the origin, so the right
/// band alone covers the whole screen.
pub fn dim_outside(frame: &mut Frame, a: Point, b: Point, dragging: bool) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    let left = a.x.min(b.x);
    let right = a.x.max(b.x);
    let top = a.y.min(b.y);
    let bottom = a.y.max(b.y);

    dim_band(frame, right, 0, width, height);
    if dragging {
        dim_band(frame, 0, 0, left, height);
        dim_band(frame, left, 0, right, top);
        dim_band(frame, left, bottom, right, height);
    }
}

/// Thin outline around the in-progress selection rectangle.
pub fn selection_outline(frame: &mut Frame, a: Point, b: Point) {
    let rect = Rect::from_corners(a, b);
    hollow_rect(frame, &rect, 0, SELECTION_OUTLINE);
}

fn dim_band(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
    for y in y0.max(0)..y1.min(frame.height() as i32) {
        for x in x0.max(0)..x1.min(frame.width() as i32) {
            frame.blend_pixel(x, y, DIM_COLOR, DIM_ALPHA);
        }
    }
}

fn hollow_rect(frame: &mut Frame, rect: &Rect, inset: i32, color: [u8; 4]) {
    let left = rect.x + inset;
    let right = rect.right() - 1 - inset;
    let top = rect.y + inset;
    let bottom = rect.bottom() - 1 - inset;
    if left > right || top > bottom {
        return;
    }
    for x in left..=right {
        frame.put_pixel(x, top, color);
        frame.put_pixel(x, bottom, color);
    }
    for y in top..=bottom {
        frame.put_pixel(left, y, color);
        frame.put_pixel(right, y, color);
    }
}

fn line(frame: &mut Frame, from: Point, to: Point, color: [u8; 4], width: i32) {
    // Bresenham, stamping a width x width block at each step.
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        for ox in 0..width {
            for oy in 0..width {
                frame.put_pixel(x + ox, y + oy, color);
            }
        }
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_triangle(frame: &mut Frame, p0: Point, p1: Point, p2: Point, color: [u8; 4]) {
    let min_x = p0.x.min(p1.x).min(p2.x);
    let max_x = p0.x.max(p1.x).max(p2.x);
    let min_y = p0.y.min(p1.y).min(p2.y);
    let max_y = p0.y.max(p1.y).max(p2.y);

    let edge = |a: Point, b: Point, x: i32, y: i32| -> i64 {
        (b.x - a.x) as i64 * (y - a.y) as i64 - (b.y - a.y) as i64 * (x - a.x) as i64
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let e0 = edge(p0, p1, x, y);
            let e1 = edge(p1, p2, x, y);
            let e2 = edge(p2, p0, x, y);
            let inside = (e0 >= 0 && e1 >= 0 && e2 >= 0) || (e0 <= 0 && e1 <= 0 && e2 <= 0);
            if inside {
                frame.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
        let mut frame = Frame::new(width, height).unwrap();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                frame.put_pixel(x, y, rgba);
            }
        }
        frame
    }

    #[test]
    fn highlight_blends_each_pixel_at_most_once() {
        let gray = [90, 90, 90, 0xFF];
        let mut frame = solid_frame(40, 40, gray);
        let mut painted = PaintedSet::new();

        highlight(&mut frame, Point::new(5, 5), &mut painted);
        let once = frame.pixel(5, 5).unwrap();
        assert_ne!(once, gray);

        // Lingering pointer: same footprint again, nothing changes.
        highlight(&mut frame, Point::new(5, 5), &mut painted);
        assert_eq!(frame.pixel(5, 5).unwrap(), once);
    }

    #[test]
    fn highlight_strength_follows_pixel_brightness() {
        let mut frame = solid_frame(40, 40, [30, 30, 30, 0xFF]);
        frame.put_pixel(6, 5, [200, 200, 200, 0xFF]);
        let mut painted = PaintedSet::new();

        highlight(&mut frame, Point::new(5, 5), &mut painted);

        // alpha = brightness for each pixel's own original value:
        // dark pixel alpha 30, bright pixel alpha 200.
        let dark = frame.pixel(5, 5).unwrap();
        let bright = frame.pixel(6, 5).unwrap();
        assert_eq!(dark[0], ((255u32 * 30 + 30 * 225) / 255) as u8);
        assert_eq!(bright[0], ((255u32 * 200 + 200 * 55) / 255) as u8);
        // Yellow ink leaves no blue contribution beyond the blend remainder.
        assert_eq!(dark[2], ((30u32 * 225) / 255) as u8);
        assert_eq!(bright[2], ((200u32 * 55) / 255) as u8);
    }

    #[test]
    fn redact_paints_pure_black_regardless_of_content() {
        let mut frame = solid_frame(40, 40, [17, 230, 99, 0xFF]);
        redact(&mut frame, Point::new(3, 3));
        for dx in 0..BRUSH_WIDTH {
            for dy in 0..BRUSH_HEIGHT {
                assert_eq!(frame.pixel(3 + dx, 3 + dy).unwrap(), [0, 0, 0, 0xFF]);
            }
        }
        // Outside the footprint is untouched.
        assert_eq!(frame.pixel(2, 3).unwrap(), [17, 230, 99, 0xFF]);
    }

    #[test]
    fn rectangle_outline_is_two_pixels_and_unfilled() {
        let white = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut frame = solid_frame(30, 30, white);
        rectangle(&mut frame, Point::new(5, 5), Point::new(20, 20));

        let red = [0xFF, 0, 0, 0xFF];
        assert_eq!(frame.pixel(5, 5).unwrap(), red);
        assert_eq!(frame.pixel(6, 6).unwrap(), red);
        assert_eq!(frame.pixel(19, 19).unwrap(), red);
        // Interior stays white.
        assert_eq!(frame.pixel(12, 12).unwrap(), white);
        // Outside stays white.
        assert_eq!(frame.pixel(4, 4).unwrap(), white);
    }

    #[test]
    fn arrow_head_geometry_along_positive_x() {
        let (c1, c2) = arrow_head_corners(Point::new(0, 0), Point::new(100, 0)).unwrap();
        assert_eq!(c1, Point::new(90, 5));
        assert_eq!(c2, Point::new(90, -5));
    }

    #[test]
    fn zero_length_arrow_is_a_no_op() {
        assert!(arrow_head_corners(Point::new(7, 7), Point::new(7, 7)).is_none());
        let mut frame = solid_frame(20, 20, [50, 50, 50, 0xFF]);
        let before = frame.clone();
        arrow(&mut frame, Point::new(7, 7), Point::new(7, 7));
        assert_eq!(frame, before);
    }

    #[test]
    fn arrow_draws_line_and_filled_head() {
        let white = [0xFF, 0xFF, 0xFF, 0xFF];
        let red = [0xFF, 0, 0, 0xFF];
        let mut frame = solid_frame(120, 40, white);
        arrow(&mut frame, Point::new(10, 20), Point::new(100, 20));

        // Along the shaft.
        assert_eq!(frame.pixel(50, 20).unwrap(), red);
        // Apex and inside the head triangle.
        assert_eq!(frame.pixel(100, 20).unwrap(), red);
        assert_eq!(frame.pixel(95, 20).unwrap(), red);
        assert_eq!(frame.pixel(92, 22).unwrap(), red);
        // Well outside the head.
        assert_eq!(frame.pixel(100, 30).unwrap(), white);
    }

    #[test]
    fn dim_right_band_is_blended_not_filled() {
        let white = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut frame = solid_frame(20, 10, white);
        dim_outside(&mut frame, Point::new(0, 0), Point::new(10, 10), false);

        let dimmed = frame.pixel(15, 5).unwrap();
        assert_ne!(dimmed, white);
        // Blended: still lighter than the dim color itself.
        assert!(dimmed[0] > DIM_COLOR[0]);
        // Left of the selection edge stays untouched before dragging.
        assert_eq!(frame.pixel(5, 5).unwrap(), white);
    }

    #[test]
    fn dragging_dims_all_four_bands() {
        let white = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut frame = solid_frame(30, 30, white);
        dim_outside(&mut frame, Point::new(10, 10), Point::new(20, 20), true);

        assert_ne!(frame.pixel(5, 15).unwrap(), white); // left
        assert_ne!(frame.pixel(25, 15).unwrap(), white); // right
        assert_ne!(frame.pixel(15, 5).unwrap(), white); // above
        assert_ne!(frame.pixel(15, 25).unwrap(), white); // below
        assert_eq!(frame.pixel(15, 15).unwrap(), white); // inside
    }
}
