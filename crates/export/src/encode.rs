//! Frame encoding and file output

use crate::{CompressionEffort, ExportFormat, ExportResult};
use image::codecs::bmp::BmpEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use raster::Frame;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

impl From<CompressionEffort> for CompressionType {
    fn from(effort: CompressionEffort) -> Self {
        match effort {
            CompressionEffort::Fast => CompressionType::Fast,
            CompressionEffort::Balanced => CompressionType::Default,
            CompressionEffort::Best => CompressionType::Best,
        }
    }
}

/// Encode a frame into an image byte buffer. Both paths preserve the exact
/// pixel dimensions and the alpha channel; PNG compression is lossless.
pub fn encode(
    frame: &Frame,
    format: ExportFormat,
    effort: CompressionEffort,
) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                Cursor::new(&mut bytes),
                effort.into(),
                FilterType::Adaptive,
            );
            encoder.write_image(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        ExportFormat::Bmp => {
            let mut cursor = Cursor::new(&mut bytes);
            let mut encoder = BmpEncoder::new(&mut cursor);
            encoder.encode(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
    }
    debug!(
        format = format.extension(),
        len = bytes.len(),
        "encoded frame"
    );
    Ok(bytes)
}

/// Encode and write to the given path.
pub fn save_to_path(
    frame: &Frame,
    path: &Path,
    format: ExportFormat,
    effort: CompressionEffort,
) -> ExportResult<()> {
    let bytes = encode(frame, format, effort)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        let mut frame = Frame::new(5, 3).unwrap();
        frame.put_pixel(0, 0, [1, 2, 3, 0xFF]);
        frame.put_pixel(4, 2, [200, 100, 50, 0xFF]);
        frame
    }

    #[test]
    fn png_round_trips_pixels_exactly() {
        let frame = sample_frame();
        let bytes = encode(&frame, ExportFormat::Png, CompressionEffort::default()).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(0, 0).0, [1, 2, 3, 0xFF]);
        assert_eq!(decoded.get_pixel(4, 2).0, [200, 100, 50, 0xFF]);
    }

    #[test]
    fn bmp_preserves_dimensions() {
        let frame = sample_frame();
        let bytes = encode(&frame, ExportFormat::Bmp, CompressionEffort::default()).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 5);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn every_effort_level_yields_a_decodable_png() {
        let frame = sample_frame();
        for effort in [
            CompressionEffort::Fast,
            CompressionEffort::Balanced,
            CompressionEffort::Best,
        ] {
            let bytes = encode(&frame, ExportFormat::Png, effort).unwrap();
            assert!(image::load_from_memory(&bytes).is_ok());
        }
    }
}
