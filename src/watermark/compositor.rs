//! Watermark compositor.
//!
//! Decodes the fetched source bytes, overlays the watermark asset
//! centered with alpha blending, and re-encodes the result in the same
//! format family the upstream declared. The source is never mutated or
//! persisted; every invocation produces a fresh buffer.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageOutputFormat};

use super::builder::WatermarkAsset;
use super::raster;
use crate::error::RelayError;
use crate::fetch::SourceImage;

/// Map a declared content type to the output encoding format.
///
/// Unknown or absent content types default to JPEG, matching the
/// response-side default.
pub fn format_for_content_type(content_type: Option<&str>) -> ImageFormat {
    let essence = content_type
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/png" => ImageFormat::Png,
        "image/webp" => ImageFormat::WebP,
        "image/gif" => ImageFormat::Gif,
        _ => ImageFormat::Jpeg,
    }
}

/// Overlay the watermark onto the source and serialize the result.
///
/// # Errors
///
/// Returns `RelayError::Composite` when the source bytes cannot be
/// decoded as an image (e.g. an HTML error page fetched instead of image
/// bytes), or when re-encoding fails. Both are terminal for the request.
pub fn composite(
    source: &SourceImage,
    asset: &WatermarkAsset,
    opacity: f32,
) -> Result<Vec<u8>, RelayError> {
    let decoded = image::load_from_memory(&source.bytes)
        .map_err(|e| RelayError::Composite(format!("source is not a decodable image: {}", e)))?;

    let mut rgba = decoded.to_rgba8();
    raster::overlay_centered(&mut rgba, asset.image(), opacity);

    encode(rgba, format_for_content_type(source.content_type.as_deref()))
}

/// Serialize an RGBA buffer in the given format. JPEG output drops the
/// alpha channel first since the format cannot carry it.
fn encode(rgba: image::RgbaImage, format: ImageFormat) -> Result<Vec<u8>, RelayError> {
    let mut out = Cursor::new(Vec::new());

    let result = match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            DynamicImage::ImageRgb8(rgb).write_to(&mut out, ImageOutputFormat::Jpeg(90))
        }
        ImageFormat::Png => {
            DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageOutputFormat::Png)
        }
        ImageFormat::WebP => {
            DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageOutputFormat::WebP)
        }
        ImageFormat::Gif => {
            DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageOutputFormat::Gif)
        }
        other => {
            return Err(RelayError::Composite(format!(
                "unsupported output format: {:?}",
                other
            )))
        }
    };

    result.map_err(|e| RelayError::Composite(format!("encode failed: {}", e)))?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use image::{Rgba, RgbaImage};

    fn png_source(width: u32, height: u32, color: Rgba<u8>) -> SourceImage {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        SourceImage {
            bytes: Bytes::from(out.into_inner()),
            content_type: Some("image/png".to_string()),
        }
    }

    fn red_mark(width: u32, height: u32) -> WatermarkAsset {
        WatermarkAsset::Fallback(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 0, 0, 255]),
        ))
    }

    #[test]
    fn test_format_for_content_type() {
        assert_eq!(
            format_for_content_type(Some("image/png")),
            ImageFormat::Png
        );
        assert_eq!(
            format_for_content_type(Some("image/webp")),
            ImageFormat::WebP
        );
        assert_eq!(
            format_for_content_type(Some("image/gif")),
            ImageFormat::Gif
        );
        assert_eq!(
            format_for_content_type(Some("image/jpeg")),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_format_defaults_to_jpeg() {
        assert_eq!(format_for_content_type(None), ImageFormat::Jpeg);
        assert_eq!(format_for_content_type(Some("text/html")), ImageFormat::Jpeg);
        assert_eq!(format_for_content_type(Some("")), ImageFormat::Jpeg);
    }

    #[test]
    fn test_format_ignores_parameters_and_case() {
        assert_eq!(
            format_for_content_type(Some("Image/PNG; charset=binary")),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_composite_preserves_dimensions() {
        let source = png_source(200, 100, Rgba([255, 255, 255, 255]));
        let mark = red_mark(40, 20);

        let out = composite(&source, &mark, 1.0).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();

        assert_eq!(decoded.width(), 200);
        assert_eq!(decoded.height(), 100);
    }

    #[test]
    fn test_composite_changes_center_pixels() {
        let source = png_source(200, 100, Rgba([255, 255, 255, 255]));
        let mark = red_mark(40, 20);

        let out = composite(&source, &mark, 1.0).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();

        let center = decoded.get_pixel(100, 50);
        assert_eq!(center[0], 255);
        assert!(center[1] < 50, "center should show the red mark");

        let corner = decoded.get_pixel(2, 2);
        assert!(corner[1] > 200, "corners should stay white");
    }

    #[test]
    fn test_composite_partial_opacity_blends() {
        let source = png_source(100, 100, Rgba([255, 255, 255, 255]));
        let mark = red_mark(20, 20);

        let out = composite(&source, &mark, 0.3).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();

        let center = decoded.get_pixel(50, 50);
        // 30% red over white keeps green/blue high but below pure white
        assert!(center[1] > 150 && center[1] < 230);
    }

    #[test]
    fn test_composite_rejects_non_image_source() {
        let source = SourceImage {
            bytes: Bytes::from_static(b"<html>502 Bad Gateway</html>"),
            content_type: Some("text/html".to_string()),
        };
        let mark = red_mark(10, 10);

        let result = composite(&source, &mark, 0.3);
        assert!(matches!(result, Err(RelayError::Composite(_))));
    }

    #[test]
    fn test_composite_jpeg_output_decodes() {
        let mut source = png_source(120, 80, Rgba([10, 200, 30, 255]));
        // upstream said jpeg; output must re-encode in the jpeg family
        source.content_type = Some("image/jpeg".to_string());

        let out = composite(&source, &red_mark(20, 10), 0.3).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_composite_is_deterministic() {
        let source = png_source(100, 100, Rgba([128, 128, 128, 255]));
        let mark = red_mark(30, 15);

        let a = composite(&source, &mark, 0.3).unwrap();
        let b = composite(&source, &mark, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_composite_does_not_touch_source() {
        let source = png_source(100, 100, Rgba([255, 255, 255, 255]));
        let before = source.bytes.clone();

        let _ = composite(&source, &red_mark(10, 10), 0.3).unwrap();
        assert_eq!(source.bytes, before);
    }
}
