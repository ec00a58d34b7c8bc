//! Shared raster primitives for watermark processing.
//!
//! Alpha blending (Porter-Duff "over"), centered overlay with edge
//! clipping, bilinear rotation, and aspect-preserving resize. These are
//! used by both the watermark builder and the compositor.

use image::{DynamicImage, Rgba, RgbaImage};

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    // Apply additional opacity to foreground alpha
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0) as u8,
    ])
}

/// Blend a watermark onto the target at the given position, clipping to
/// the target bounds. Positions may be negative when the mark is larger
/// than the target.
pub fn blend_at(target: &mut RgbaImage, mark: &RgbaImage, x: i32, y: i32, opacity: f32) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let mark_width = mark.width() as i32;
    let mark_height = mark.height() as i32;

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + mark_width).min(target_width);
    let y_end = (y + mark_height).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let mx = (tx - x) as u32;
            let my = (ty - y) as u32;

            let mark_pixel = mark.get_pixel(mx, my);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *mark_pixel, opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend a watermark onto the center of the target (gravity = center).
pub fn overlay_centered(target: &mut RgbaImage, mark: &RgbaImage, opacity: f32) {
    let x = (target.width() as i32 - mark.width() as i32) / 2;
    let y = (target.height() as i32 - mark.height() as i32) / 2;
    blend_at(target, mark, x, y, opacity);
}

/// Resize an image to the given width, preserving aspect ratio.
pub fn resize_to_width(image: &DynamicImage, width: u32) -> RgbaImage {
    let src_w = image.width().max(1);
    let src_h = image.height().max(1);
    let height = ((width as f32 / src_w as f32) * src_h as f32).round().max(1.0) as u32;

    image
        .resize_exact(width.max(1), height, image::imageops::FilterType::Lanczos3)
        .to_rgba8()
}

/// Rotate an image by the specified degrees (clockwise) around its
/// center, expanding the canvas to the rotated bounding box. Samples
/// with bilinear interpolation; uncovered pixels stay transparent.
pub fn rotate(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let radians = -degrees.to_radians(); // Negative for clockwise
    let cos = radians.cos();
    let sin = radians.sin();

    let src_w = image.width() as f32;
    let src_h = image.height() as f32;
    let cx = src_w / 2.0;
    let cy = src_h / 2.0;

    let corners = [
        (-cx, -cy),
        (src_w - cx, -cy),
        (-cx, src_h - cy),
        (src_w - cx, src_h - cy),
    ];

    let rotated_corners: Vec<(f32, f32)> = corners
        .iter()
        .map(|(x, y)| (x * cos - y * sin, x * sin + y * cos))
        .collect();

    let min_x = rotated_corners
        .iter()
        .map(|(x, _)| *x)
        .fold(f32::INFINITY, f32::min);
    let max_x = rotated_corners
        .iter()
        .map(|(x, _)| *x)
        .fold(f32::NEG_INFINITY, f32::max);
    let min_y = rotated_corners
        .iter()
        .map(|(_, y)| *y)
        .fold(f32::INFINITY, f32::min);
    let max_y = rotated_corners
        .iter()
        .map(|(_, y)| *y)
        .fold(f32::NEG_INFINITY, f32::max);

    let dst_w = (max_x - min_x).ceil() as u32;
    let dst_h = (max_y - min_y).ceil() as u32;

    let mut rotated = RgbaImage::new(dst_w.max(1), dst_h.max(1));

    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    // Inverse rotation for sampling
    let inv_cos = (-radians).cos();
    let inv_sin = (-radians).sin();

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let rx = dx as f32 - dst_cx;
            let ry = dy as f32 - dst_cy;

            let sx = rx * inv_cos - ry * inv_sin + cx;
            let sy = rx * inv_sin + ry * inv_cos + cy;

            if sx >= 0.0 && sx < src_w - 1.0 && sy >= 0.0 && sy < src_h - 1.0 {
                let x0 = sx.floor() as u32;
                let y0 = sy.floor() as u32;
                let x1 = x0 + 1;
                let y1 = y0 + 1;

                let fx = sx - x0 as f32;
                let fy = sy - y0 as f32;

                let p00 = image.get_pixel(x0, y0);
                let p10 = image.get_pixel(x1, y0);
                let p01 = image.get_pixel(x0, y1);
                let p11 = image.get_pixel(x1, y1);

                let interpolate = |c: usize| -> u8 {
                    let v00 = p00[c] as f32;
                    let v10 = p10[c] as f32;
                    let v01 = p01[c] as f32;
                    let v11 = p11[c] as f32;

                    let v = v00 * (1.0 - fx) * (1.0 - fy)
                        + v10 * fx * (1.0 - fy)
                        + v01 * (1.0 - fx) * fy
                        + v11 * fx * fy;

                    v.clamp(0.0, 255.0) as u8
                };

                rotated.put_pixel(
                    dx,
                    dy,
                    Rgba([
                        interpolate(0),
                        interpolate(1),
                        interpolate(2),
                        interpolate(3),
                    ]),
                );
            }
        }
    }

    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_blend_pixels_half_alpha_over_black() {
        let bg = Rgba([0, 0, 0, 255]);
        let fg = Rgba([255, 255, 255, 128]);
        let result = blend_pixels(bg, fg, 1.0);

        assert!(result[0] > 100 && result[0] < 160);
        assert!(result[1] > 100 && result[1] < 160);
        assert!(result[2] > 100 && result[2] < 160);
        assert_eq!(result[3], 255);
    }

    #[test]
    fn test_blend_pixels_zero_opacity_is_noop() {
        let bg = Rgba([10, 20, 30, 255]);
        let fg = Rgba([255, 0, 0, 255]);
        let result = blend_pixels(bg, fg, 0.0);

        assert_eq!(result[0], 10);
        assert_eq!(result[1], 20);
        assert_eq!(result[2], 30);
    }

    #[test]
    fn test_blend_pixels_transparent_foreground_is_noop() {
        let bg = Rgba([10, 20, 30, 255]);
        let fg = Rgba([255, 0, 0, 0]);
        let result = blend_pixels(bg, fg, 1.0);

        assert_eq!(result[0], 10);
        assert_eq!(result[1], 20);
        assert_eq!(result[2], 30);
    }

    #[test]
    fn test_overlay_centered_places_mark_in_middle() {
        let mut target = solid(100, 100, Rgba([255, 255, 255, 255]));
        let mark = solid(20, 20, Rgba([255, 0, 0, 255]));

        overlay_centered(&mut target, &mark, 1.0);

        let center = target.get_pixel(50, 50);
        assert_eq!(center[0], 255);
        assert_eq!(center[1], 0);

        // corners untouched
        let corner = target.get_pixel(5, 5);
        assert_eq!(corner[1], 255);
    }

    #[test]
    fn test_overlay_centered_clips_oversized_mark() {
        let mut target = solid(50, 50, Rgba([255, 255, 255, 255]));
        let mark = solid(80, 80, Rgba([0, 0, 255, 255]));

        overlay_centered(&mut target, &mark, 1.0);

        // entire target is covered when the mark is larger
        let p = target.get_pixel(0, 0);
        assert_eq!(p[2], 255);
        let p = target.get_pixel(49, 49);
        assert_eq!(p[2], 255);
    }

    #[test]
    fn test_blend_at_negative_position_clips() {
        let mut target = solid(50, 50, Rgba([255, 255, 255, 255]));
        let mark = solid(30, 30, Rgba([255, 0, 0, 255]));

        blend_at(&mut target, &mark, -20, -20, 1.0);

        // visible part (top-left of target) is red
        let visible = target.get_pixel(5, 5);
        assert_eq!(visible[0], 255);
        assert_eq!(visible[1], 0);

        // outside the clipped region still white
        let outside = target.get_pixel(20, 20);
        assert_eq!(outside[1], 255);
    }

    #[test]
    fn test_resize_to_width_preserves_aspect() {
        let img = DynamicImage::ImageRgba8(solid(100, 50, Rgba([0, 255, 0, 255])));
        let resized = resize_to_width(&img, 50);
        assert_eq!(resized.width(), 50);
        assert_eq!(resized.height(), 25);
    }

    #[test]
    fn test_resize_to_width_never_zero_height() {
        let img = DynamicImage::ImageRgba8(solid(1000, 1, Rgba([0, 255, 0, 255])));
        let resized = resize_to_width(&img, 10);
        assert!(resized.height() >= 1);
    }

    #[test]
    fn test_rotate_expands_canvas() {
        let img = solid(100, 20, Rgba([255, 0, 0, 255]));
        let rotated = rotate(&img, -12.0);

        assert!(rotated.width() >= 100);
        assert!(rotated.height() > 20);

        // rotated content still present
        let has_red = rotated.pixels().any(|p| p[0] > 200 && p[3] > 200);
        assert!(has_red);
    }

    #[test]
    fn test_rotate_corners_are_transparent() {
        let img = solid(100, 100, Rgba([255, 0, 0, 255]));
        let rotated = rotate(&img, 45.0);

        let corner = rotated.get_pixel(0, 0);
        assert_eq!(corner[3], 0);
    }
}
