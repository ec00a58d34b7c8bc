//! Text watermark rendering.
//!
//! Renders the brand text to an RGBA image that the compositor can
//! overlay when the logo asset is unavailable. Uses an embedded DejaVu
//! font so the fallback has no filesystem dependency of its own.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use super::raster;
use crate::error::RelayError;

static DEFAULT_FONT: OnceLock<FontRef<'static>> = OnceLock::new();

/// Embedded font data (DejaVu Sans, public-domain-equivalent license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Get the embedded font, initializing it lazily.
fn get_default_font() -> Result<&'static FontRef<'static>, RelayError> {
    DEFAULT_FONT.get_or_init(|| {
        FontRef::try_from_slice(EMBEDDED_FONT_DATA)
            .expect("Failed to load embedded font - this is a bug")
    });

    DEFAULT_FONT
        .get()
        .ok_or_else(|| RelayError::Asset("Failed to initialize font".to_string()))
}

/// Parsed RGB color from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color (RGB).
    pub color: Color,
    /// Rotation in degrees (clockwise). None means no rotation.
    pub rotation_degrees: Option<f32>,
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
pub fn parse_hex_color(hex: &str) -> Result<Color, RelayError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| RelayError::Asset("Color must start with '#'".to_string()))?;

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            let g = u8::from_str_radix(&hex[1..2], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            let b = u8::from_str_radix(&hex[2..3], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            // Double each component: 0xF -> 0xFF, 0xA -> 0xAA
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            let g = u8::from_str_radix(&hex[2..4], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            let b = u8::from_str_radix(&hex[4..6], 16)
                .map_err(|_| RelayError::Asset("Invalid hex digit".to_string()))?;
            Ok(Color::new(r, g, b))
        }
        _ => Err(RelayError::Asset(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

/// Calculate the dimensions of rendered text.
///
/// Returns (width, height) in pixels.
pub fn measure_text(text: &str, font_size: f32) -> Result<(u32, u32), RelayError> {
    let font = get_default_font()?;
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    let padding = 2;
    Ok((
        width.ceil() as u32 + padding,
        height.ceil() as u32 + padding,
    ))
}

/// Render text to an RGBA image with a transparent background.
///
/// # Errors
///
/// Returns `RelayError::Asset` for empty text or a font initialization
/// failure.
pub fn render_text(options: &TextRenderOptions) -> Result<RgbaImage, RelayError> {
    if options.text.is_empty() {
        return Err(RelayError::Asset("Cannot render empty text".to_string()));
    }

    let font = get_default_font()?;
    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(&options.text, options.font_size)?;

    let canvas_width = width.max(1);
    let canvas_height = height.max(1);
    let mut image = RgbaImage::new(canvas_width, canvas_height);

    let ascent = scaled_font.ascent();
    let baseline_y = ascent;

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in options.text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                    let pixel_alpha = (coverage * 255.0) as u8;
                    let pixel = Rgba([options.color.r, options.color.g, options.color.b, pixel_alpha]);

                    // Blend with existing pixel (for anti-aliasing)
                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = raster::blend_pixels(*existing, pixel, 1.0);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    if let Some(degrees) = options.rotation_degrees {
        image = raster::rotate(&image, degrees);
    }

    Ok(image)
}
