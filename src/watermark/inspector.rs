//! Source image metadata inspection.
//!
//! Reads the natural pixel dimensions of fetched image bytes so the
//! watermark can be scaled proportionally. Deliberately degrade-not-fail:
//! watermark sizing is cosmetic, so unreadable metadata substitutes fixed
//! default dimensions instead of failing the request.

use std::io::Cursor;

use crate::constants::{FALLBACK_SOURCE_HEIGHT, FALLBACK_SOURCE_WIDTH};

/// Determine the pixel width and height of image bytes.
///
/// Falls back to 800x600 when the format cannot be guessed or the header
/// cannot be parsed, logging a warning.
pub fn inspect_dimensions(bytes: &[u8]) -> (u32, u32) {
    let reader = match image::io::Reader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(error = %e, "Could not guess image format, using default dimensions");
            return (FALLBACK_SOURCE_WIDTH, FALLBACK_SOURCE_HEIGHT);
        }
    };

    match reader.into_dimensions() {
        Ok((width, height)) => (width, height),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read image dimensions, using default dimensions");
            (FALLBACK_SOURCE_WIDTH, FALLBACK_SOURCE_HEIGHT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_inspect_png_dimensions() {
        let bytes = png_bytes(320, 240);
        assert_eq!(inspect_dimensions(&bytes), (320, 240));
    }

    #[test]
    fn test_inspect_non_image_falls_back() {
        let bytes = b"<html><body>not an image</body></html>";
        assert_eq!(inspect_dimensions(bytes), (800, 600));
    }

    #[test]
    fn test_inspect_empty_falls_back() {
        assert_eq!(inspect_dimensions(&[]), (800, 600));
    }

    #[test]
    fn test_inspect_truncated_header_falls_back() {
        // PNG magic bytes with nothing after them
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(inspect_dimensions(&bytes), (800, 600));
    }
}
