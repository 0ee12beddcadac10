//! 3D planet rendering contract
//!
//! The real planet engine is an external collaborator: it takes a scene and
//! returns an image. [`FlatPlanetRenderer`] stands in for it with
//! Lambert-shaded discs.

use glam::{Vec2, Vec3};

use super::canvas::Canvas;
use super::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetBody {
    /// Center in normalized screen coordinates
    pub position: Vec2,
    /// Radius as a fraction of screen height
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetScene {
    pub bodies: Vec<PlanetBody>,
    /// Direction toward the light source (view space, z toward the viewer)
    pub light_dir: Vec3,
}

impl PlanetScene {
    /// A gas giant and its moon drifting with `time` (seconds)
    pub fn orbiting(time: f32) -> Self {
        let angle = time * 0.05;
        Self {
            bodies: vec![
                PlanetBody {
                    position: Vec2::new(0.78, 0.28),
                    radius: 0.16,
                    color: Color::rgb(0.75, 0.55, 0.35),
                },
                PlanetBody {
                    position: Vec2::new(0.78 + angle.cos() * 0.2, 0.28 + angle.sin() * 0.06),
                    radius: 0.03,
                    color: Color::rgb(0.7, 0.7, 0.75),
                },
            ],
            light_dir: Vec3::new(-0.6, -0.4, 0.7).normalize(),
        }
    }
}

pub trait PlanetRenderer {
    /// Render `scene` into a new transparent image of the given size
    fn render(&self, scene: &PlanetScene, width: u32, height: u32) -> Canvas;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FlatPlanetRenderer;

impl PlanetRenderer for FlatPlanetRenderer {
    fn render(&self, scene: &PlanetScene, width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        let h = height as f32;
        for body in &scene.bodies {
            let center = Vec2::new(body.position.x * width as f32, body.position.y * h);
            let r = body.radius * h;
            if r <= 0.0 {
                continue;
            }
            let x0 = ((center.x - r).floor() as i32).max(0);
            let y0 = ((center.y - r).floor() as i32).max(0);
            let x1 = ((center.x + r).ceil() as i32).min(width as i32);
            let y1 = ((center.y + r).ceil() as i32).min(height as i32);
            for py in y0..y1 {
                for px in x0..x1 {
                    let d = (Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center) / r;
                    let len_sq = d.length_squared();
                    if len_sq > 1.0 {
                        continue;
                    }
                    // Sphere normal from the disc position
                    let normal = Vec3::new(d.x, d.y, (1.0 - len_sq).sqrt());
                    let light = normal.dot(scene.light_dir).max(0.0) * 0.9 + 0.1;
                    canvas.blend_pixel(px, py, body.color.scale_rgb(light), 1.0);
                }
            }
        }
        canvas
    }
}
