//! Arc band geometry for the warp-bubble edge
//!
//! In polar coordinates around `center`, an arc band is defined by:
//! - radius: centerline distance from center
//! - thickness: radial extent (inner = radius - thickness/2, outer = radius + thickness/2)
//! - theta_start, theta_end: angular extent

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::sdf::sd_arc;

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub center: Vec2,
    pub radius: f32,
    pub thickness: f32,
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// End angle (radians, normalized to [-π, π))
    pub theta_end: f32,
}

impl ArcSegment {
    pub fn new(center: Vec2, radius: f32, thickness: f32, theta_start: f32, theta_end: f32) -> Self {
        Self {
            center,
            radius,
            thickness,
            theta_start: normalize_angle(theta_start),
            theta_end: normalize_angle(theta_end),
        }
    }

    /// The bubble edge seen from the bridge: a wide arc hanging over the
    /// top of the screen, sweeping slightly with `phase`.
    pub fn bubble_edge(screen_w: f32, screen_h: f32, phase: f32) -> Self {
        let sweep = (phase * TAU).sin() * 0.05;
        Self::new(
            Vec2::new(screen_w * 0.5, screen_h * 1.6),
            screen_h * 1.45,
            6.0,
            -PI * 0.78 + sweep,
            -PI * 0.22 + sweep,
        )
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }

    /// Angular span of the arc (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.theta_end - self.theta_start;
        if span < 0.0 {
            span += TAU;
        }
        span
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        let start = self.theta_start;
        let end = self.theta_end;

        if start <= end {
            theta >= start && theta <= end
        } else {
            theta >= start || theta <= end
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = point - self.center;
        let r = local.length();
        r >= self.inner_radius() && r <= self.outer_radius() && self.contains_angle(local.y.atan2(local.x))
    }

    /// Signed distance from `point` to the band
    pub fn distance(&self, point: Vec2) -> f32 {
        sd_arc(
            point - self.center,
            self.theta_start,
            self.theta_end,
            self.radius,
            self.thickness,
        )
    }

    /// Screen-space bounding box (min, max) of the full circle
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.outer_radius());
        (self.center - r, self.center + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_contains_angle_wraparound() {
        let arc = ArcSegment::new(Vec2::ZERO, 100.0, 10.0, 170.0_f32.to_radians(), -170.0_f32.to_radians());
        assert!(arc.contains_angle(PI));
        assert!(arc.contains_angle(-PI + 0.01));
        assert!(!arc.contains_angle(0.0));
    }

    #[test]
    fn test_arc_contains_point_with_offset_center() {
        let arc = ArcSegment::new(Vec2::new(50.0, 50.0), 100.0, 20.0, 0.0, PI / 2.0);
        assert!(arc.contains_point(Vec2::new(145.0, 50.0)));
        assert!(!arc.contains_point(Vec2::new(50.0, 50.0)));
        assert!(arc.distance(Vec2::new(145.0, 50.0)) < 0.0);
    }

    #[test]
    fn test_bubble_edge_spans_top_of_screen() {
        let arc = ArcSegment::bubble_edge(1280.0, 720.0, 0.0);
        assert!((arc.angular_span() - PI * 0.56).abs() < 1e-3);
        // Apex of the arc sits near the top edge of the screen
        let apex = arc.center + Vec2::new(0.0, -arc.radius);
        assert!(apex.y > 0.0 && apex.y < 720.0 * 0.3);
    }
}
