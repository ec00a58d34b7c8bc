//! Watermark builder.
//!
//! Produces the watermark image composited onto every relayed source.
//! Two paths, modeled as an explicit two-variant result type rather than
//! exception-driven control flow:
//!
//! - **Logo**: the on-disk logo asset, resized to a fraction of the
//!   source width (aspect preserved) and rotated.
//! - **Fallback**: the literal brand text synthesized with the embedded
//!   font, sized proportionally to the source width and rotated.
//!
//! Any primary-path failure (missing file, decode error) selects the
//! fallback with a warning log. The builder never propagates an error
//! upward; a request always gets *some* watermark.

use image::RgbaImage;

use super::raster;
use super::text_renderer::{parse_hex_color, render_text, Color, TextRenderOptions};
use crate::config::WatermarkConfig;
use crate::error::RelayError;

/// Minimum fallback font size in pixels, for very small sources.
const MIN_FALLBACK_FONT_SIZE: f32 = 8.0;

/// The watermark image and which path produced it.
///
/// The compositor is agnostic to the variant; both feed it identically.
#[derive(Debug, Clone)]
pub enum WatermarkAsset {
    /// Primary path: decoded logo asset.
    Logo(RgbaImage),
    /// Fallback path: synthesized brand text.
    Fallback(RgbaImage),
}

impl WatermarkAsset {
    /// The RGBA image to composite, regardless of variant.
    pub fn image(&self) -> &RgbaImage {
        match self {
            WatermarkAsset::Logo(img) => img,
            WatermarkAsset::Fallback(img) => img,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, WatermarkAsset::Fallback(_))
    }
}

/// Build the watermark for a source image of the given width.
///
/// Attempts the logo asset first; on any failure falls back to text
/// synthesis. Infallible by contract.
pub fn build_watermark(config: &WatermarkConfig, source_width: u32) -> WatermarkAsset {
    match build_logo_asset(config, source_width) {
        Ok(image) => WatermarkAsset::Logo(image),
        Err(e) => {
            tracing::warn!(
                logo_path = %config.logo_path,
                error = %e,
                "Logo asset unavailable, using text fallback watermark"
            );
            WatermarkAsset::Fallback(build_fallback_asset(config, source_width))
        }
    }
}

/// Load, scale and rotate the on-disk logo asset.
fn build_logo_asset(config: &WatermarkConfig, source_width: u32) -> Result<RgbaImage, RelayError> {
    let data = std::fs::read(&config.logo_path)
        .map_err(|e| RelayError::Asset(format!("failed to read logo file: {}", e)))?;

    let decoded = image::load_from_memory(&data)
        .map_err(|e| RelayError::Asset(format!("failed to decode logo: {}", e)))?;

    let target_width = target_width(config, source_width);
    let resized = raster::resize_to_width(&decoded, target_width);

    Ok(raster::rotate(&resized, config.rotation_degrees))
}

/// Synthesize the brand-text fallback watermark.
///
/// Text rendering can only fail on an empty string or a broken embedded
/// font; config validation rules out the former, so the inner degrade to
/// a plain translucent banner should never run in practice. It exists so
/// this function can keep the never-fails contract.
fn build_fallback_asset(config: &WatermarkConfig, source_width: u32) -> RgbaImage {
    let color = parse_hex_color(&config.accent_color).unwrap_or(Color {
        r: 255,
        g: 51,
        b: 102,
    });

    let font_size = (source_width as f32 * config.font_scale).max(MIN_FALLBACK_FONT_SIZE);

    let options = TextRenderOptions {
        text: config.brand_text.clone(),
        font_size,
        color,
        rotation_degrees: Some(config.rotation_degrees),
    };

    match render_text(&options) {
        Ok(image) => image,
        Err(e) => {
            tracing::error!(error = %e, "Text watermark synthesis failed, using banner");
            banner_asset(config, source_width, color)
        }
    }
}

/// Last-resort mark: a solid translucent bar sized to the target width.
fn banner_asset(config: &WatermarkConfig, source_width: u32, color: Color) -> RgbaImage {
    let width = target_width(config, source_width);
    let height = (width / 4).max(1);
    let banner = RgbaImage::from_pixel(width, height, image::Rgba([color.r, color.g, color.b, 255]));
    raster::rotate(&banner, config.rotation_degrees)
}

fn target_width(config: &WatermarkConfig, source_width: u32) -> u32 {
    ((source_width as f32 * config.scale) as u32).max(1)
}
