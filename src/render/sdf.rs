//! Signed distance fields for shape rasterization
//!
//! Negative inside, positive outside. Shapes convert distance to pixel
//! coverage with [`coverage`], which gives a one-pixel antialiased edge.

use glam::Vec2;
use std::f32::consts::TAU;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a ring (annulus) of the given centerline radius
#[inline]
pub fn sd_ring(p: Vec2, center: Vec2, radius: f32, thickness: f32) -> f32 {
    ((p - center).length() - radius).abs() - thickness * 0.5
}

/// Signed distance to a line segment with rounded caps
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2, half_width: f32) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length() - half_width
}

/// Signed distance to an arc band centered on the origin
/// (inner to outer radius, theta_start to theta_end)
pub fn sd_arc(p: Vec2, theta_start: f32, theta_end: f32, radius: f32, thickness: f32) -> f32 {
    let r = p.length();
    let angle = p.y.atan2(p.x);

    let mut angle_diff = angle - theta_start;
    angle_diff -= (angle_diff / TAU).round() * TAU;

    let mut span = theta_end - theta_start;
    span -= (span / TAU).round() * TAU;
    if span <= 0.0 {
        span += TAU;
    }

    if angle_diff < 0.0 {
        angle_diff += TAU;
    }

    let half_thick = thickness * 0.5;

    if angle_diff <= span {
        (r - radius).abs() - half_thick
    } else {
        // Distance to the rounded arc endpoints
        let p1 = Vec2::new(theta_start.cos(), theta_start.sin()) * radius;
        let p2 = Vec2::new(theta_end.cos(), theta_end.sin()) * radius;
        let d1 = (p - p1).length() - half_thick;
        let d2 = (p - p2).length() - half_thick;
        d1.min(d2)
    }
}

/// Pixel coverage for a signed distance measured at the pixel center
#[inline]
pub fn coverage(d: f32) -> f32 {
    (0.5 - d).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circle_sign() {
        assert!(sd_circle(Vec2::ZERO, Vec2::ZERO, 5.0) < 0.0);
        assert!((sd_circle(Vec2::new(8.0, 0.0), Vec2::ZERO, 5.0) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_distance() {
        let d = sd_segment(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
        assert!((d - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_arc_inside_and_outside_span() {
        let inside = Vec2::new((PI / 4.0).cos(), (PI / 4.0).sin()) * 100.0;
        assert!(sd_arc(inside, 0.0, PI / 2.0, 100.0, 10.0) < 0.0);
        let outside = Vec2::new(-100.0, 0.0);
        assert!(sd_arc(outside, 0.0, PI / 2.0, 100.0, 10.0) > 0.0);
    }

    #[test]
    fn test_coverage_edges() {
        assert_eq!(coverage(-2.0), 1.0);
        assert_eq!(coverage(2.0), 0.0);
        assert_eq!(coverage(0.0), 0.5);
    }
}
