//! Shape rasterization onto canvases

use glam::Vec2;

use super::arc::ArcSegment;
use super::canvas::Canvas;
use super::color::Color;
use super::sdf::{coverage, sd_circle, sd_ring, sd_segment};

/// Rasterize any signed distance field over a bounding box
fn fill_sdf<F>(canvas: &mut Canvas, min: Vec2, max: Vec2, color: Color, sdf: F)
where
    F: Fn(Vec2) -> f32,
{
    let x0 = (min.x.floor() as i32 - 1).max(0);
    let y0 = (min.y.floor() as i32 - 1).max(0);
    let x1 = (max.x.ceil() as i32 + 1).min(canvas.width() as i32);
    let y1 = (max.y.ceil() as i32 + 1).min(canvas.height() as i32);

    for py in y0..y1 {
        for px in x0..x1 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let c = coverage(sdf(p));
            if c > 0.0 {
                canvas.blend_pixel(px, py, color, c);
            }
        }
    }
}

/// Filled circle
pub fn circle(canvas: &mut Canvas, center: Vec2, radius: f32, color: Color) {
    let r = Vec2::splat(radius);
    fill_sdf(canvas, center - r, center + r, color, |p| sd_circle(p, center, radius));
}

/// Ring (hollow circle)
pub fn ring(canvas: &mut Canvas, center: Vec2, radius: f32, thickness: f32, color: Color) {
    let r = Vec2::splat(radius + thickness);
    fill_sdf(canvas, center - r, center + r, color, |p| {
        sd_ring(p, center, radius, thickness)
    });
}

/// Thick line with rounded caps
pub fn line(canvas: &mut Canvas, a: Vec2, b: Vec2, width: f32, color: Color) {
    let half = (width * 0.5).max(0.5);
    let pad = Vec2::splat(half);
    fill_sdf(canvas, a.min(b) - pad, a.max(b) + pad, color, |p| {
        sd_segment(p, a, b, half)
    });
}

/// Isometric diamond centered on `center`
pub fn diamond(canvas: &mut Canvas, center: Vec2, width: f32, height: f32, color: Color) {
    let half = Vec2::new(width * 0.5, height * 0.5);
    if half.x <= 0.0 || half.y <= 0.0 {
        return;
    }
    fill_sdf(canvas, center - half, center + half, color, |p| {
        // L1 distance in diamond space, scaled back to pixels along y
        let d = (p - center).abs() / half;
        (d.x + d.y - 1.0) * half.y
    });
}

/// Arc band
pub fn arc(canvas: &mut Canvas, arc: &ArcSegment, color: Color) {
    let (min, max) = arc.bounds();
    fill_sdf(canvas, min, max, color, |p| arc.distance(p));
}

/// Text as solid glyph blocks (fonts come from the asset layer; this keeps
/// layout and paint order visible without one)
pub fn block_text(canvas: &mut Canvas, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
    let advance = font_size * 0.6;
    let glyph_w = font_size * 0.45;
    let glyph_h = font_size * 0.7;
    let mut cx = x;
    for ch in text.chars() {
        if !ch.is_whitespace() {
            canvas.fill_rect(cx, y + font_size * 0.15, glyph_w, glyph_h, color);
        }
        cx += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::colors;

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut c = Canvas::filled(20, 20, colors::BLACK);
        circle(&mut c, Vec2::new(10.0, 10.0), 4.0, colors::WHITE);
        assert_eq!(c.pixel(10, 10).unwrap().r, 255);
        assert_eq!(c.pixel(0, 0).unwrap().r, 0);
    }

    #[test]
    fn test_ring_is_hollow() {
        let mut c = Canvas::filled(40, 40, colors::BLACK);
        ring(&mut c, Vec2::new(20.0, 20.0), 10.0, 2.0, colors::WHITE);
        assert_eq!(c.pixel(20, 20).unwrap().r, 0);
        assert!(c.pixel(30, 20).unwrap().r > 200);
    }

    #[test]
    fn test_diamond_shape() {
        let mut c = Canvas::filled(64, 32, colors::BLACK);
        diamond(&mut c, Vec2::new(32.0, 16.0), 64.0, 32.0, colors::WHITE);
        assert_eq!(c.pixel(32, 16).unwrap().r, 255);
        assert_eq!(c.pixel(1, 1).unwrap().r, 0);
    }

    #[test]
    fn test_block_text_skips_spaces() {
        let mut c = Canvas::filled(40, 20, colors::BLACK);
        block_text(&mut c, "a b", 0.0, 0.0, 10.0, colors::WHITE);
        assert_eq!(c.pixel(2, 5).unwrap().r, 255);
        assert_eq!(c.pixel(8, 5).unwrap().r, 0);
        assert_eq!(c.pixel(14, 5).unwrap().r, 255);
    }
}
