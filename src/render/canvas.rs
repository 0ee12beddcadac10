//! Software render target
//!
//! Screens, transition buffers and cached layers are all `Canvas`es. Every
//! write is source-over alpha blended.

use bytemuck::{Pod, Zeroable};

use super::color::Color;

/// 8-bit RGBA pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    fn from_color(c: Color) -> Self {
        Self {
            r: to_u8(c.r),
            g: to_u8(c.g),
            b: to_u8(c.b),
            a: to_u8(c.a),
        }
    }

    pub fn to_color(self) -> Color {
        Color::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Integer pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Placement of a source canvas onto a destination canvas
#[derive(Debug, Clone, Copy)]
pub struct BlitOptions {
    /// Destination of the source's top-left corner (after scaling)
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub alpha: f32,
    /// Only copy this part of the source
    pub src_rect: Option<PixelRect>,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            alpha: 1.0,
            src_rect: None,
        }
    }
}

impl BlitOptions {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Scale `src` about the center of a `dst_w` x `dst_h` target
    pub fn centered_scale(src: &Canvas, dst_w: u32, dst_h: u32, scale: f32, alpha: f32) -> Self {
        Self {
            x: (dst_w as f32 - src.width() as f32 * scale) * 0.5,
            y: (dst_h as f32 - src.height() as f32 * scale) * 0.5,
            scale,
            alpha,
            src_rect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Canvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.clear(color);
        canvas
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Overwrite every pixel (no blending)
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(Pixel::from_color(color));
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Blend `color` onto pixel (x, y) with extra coverage `alpha`
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let a = (color.a * alpha).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let dst = self.pixels[idx].to_color();
        let inv = 1.0 - a;
        self.pixels[idx] = Pixel::from_color(Color::new(
            color.r * a + dst.r * inv,
            color.g * a + dst.g * inv,
            color.b * a + dst.b * inv,
            a + dst.a * inv,
        ));
    }

    /// Blended axis-aligned rectangle
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let x0 = x.max(0.0).floor() as i32;
        let y0 = y.max(0.0).floor() as i32;
        let x1 = (x + w).min(self.width as f32).ceil() as i32;
        let y1 = (y + h).min(self.height as f32).ceil() as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, 1.0);
            }
        }
    }

    /// Draw `src` onto this canvas (nearest-neighbour sampling)
    pub fn blit(&mut self, src: &Canvas, opts: &BlitOptions) {
        if opts.scale <= 0.0 || opts.alpha <= 0.0 {
            return;
        }
        let rect = opts.src_rect.unwrap_or(PixelRect {
            x: 0,
            y: 0,
            w: src.width,
            h: src.height,
        });
        let rect = PixelRect {
            x: rect.x.min(src.width),
            y: rect.y.min(src.height),
            w: rect.w.min(src.width.saturating_sub(rect.x)),
            h: rect.h.min(src.height.saturating_sub(rect.y)),
        };
        if rect.w == 0 || rect.h == 0 {
            return;
        }

        // Destination footprint of the copied region
        let dx0 = opts.x + rect.x as f32 * opts.scale;
        let dy0 = opts.y + rect.y as f32 * opts.scale;
        let dx1 = dx0 + rect.w as f32 * opts.scale;
        let dy1 = dy0 + rect.h as f32 * opts.scale;

        let px0 = dx0.max(0.0).floor() as i32;
        let py0 = dy0.max(0.0).floor() as i32;
        let px1 = dx1.min(self.width as f32).ceil() as i32;
        let py1 = dy1.min(self.height as f32).ceil() as i32;

        for py in py0..py1 {
            let sy = ((py as f32 + 0.5 - opts.y) / opts.scale).floor() as i64;
            if sy < rect.y as i64 || sy >= (rect.y + rect.h) as i64 {
                continue;
            }
            for px in px0..px1 {
                let sx = ((px as f32 + 0.5 - opts.x) / opts.scale).floor() as i64;
                if sx < rect.x as i64 || sx >= (rect.x + rect.w) as i64 {
                    continue;
                }
                let s = src.pixels[(sy as u32 * src.width + sx as u32) as usize];
                if s.a == 0 {
                    continue;
                }
                self.blend_pixel(px, py, s.to_color(), opts.alpha);
            }
        }
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// FNV-1a hash of the pixel data, for golden-frame comparisons
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;
        self.as_bytes()
            .iter()
            .fold(OFFSET, |h, &b| (h ^ b as u64).wrapping_mul(PRIME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::colors;

    #[test]
    fn test_fill_rect_blends() {
        let mut c = Canvas::filled(4, 4, colors::BLACK);
        c.fill_rect(0.0, 0.0, 2.0, 2.0, Color::new(1.0, 1.0, 1.0, 0.5));
        let p = c.pixel(0, 0).unwrap();
        assert!((127..=128).contains(&p.r));
        assert_eq!(c.pixel(3, 3).unwrap().r, 0);
    }

    #[test]
    fn test_blit_sub_rect_reveals_left_columns_only() {
        let src = Canvas::filled(8, 2, colors::WHITE);
        let mut dst = Canvas::filled(8, 2, colors::BLACK);
        dst.blit(
            &src,
            &BlitOptions {
                src_rect: Some(PixelRect { x: 0, y: 0, w: 3, h: 2 }),
                ..Default::default()
            },
        );
        assert_eq!(dst.pixel(2, 1).unwrap().r, 255);
        assert_eq!(dst.pixel(3, 1).unwrap().r, 0);
    }

    #[test]
    fn test_blit_centered_scale() {
        let src = Canvas::filled(10, 10, colors::WHITE);
        let mut dst = Canvas::filled(10, 10, colors::BLACK);
        dst.blit(&src, &BlitOptions::centered_scale(&src, 10, 10, 0.5, 1.0));
        assert_eq!(dst.pixel(0, 0).unwrap().r, 0);
        assert_eq!(dst.pixel(5, 5).unwrap().r, 255);
        assert_eq!(dst.pixel(8, 8).unwrap().r, 0);
    }

    #[test]
    fn test_checksum_tracks_content() {
        let a = Canvas::filled(3, 3, colors::BLACK);
        let mut b = a.clone();
        assert_eq!(a.checksum(), b.checksum());
        b.blend_pixel(1, 1, colors::WHITE, 1.0);
        assert_ne!(a.checksum(), b.checksum());
        assert_eq!(a.as_bytes().len(), 3 * 3 * 4);
    }
}
