//! Parallax starfield background
//!
//! Seeded star layers wrapped over the screen. Deeper layers move less when
//! the camera pans. Velocity and GR intensity are carried for backgrounds
//! that distort the field; the flat renderer here stores them untouched.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::render::canvas::Canvas;
use crate::render::color::{Color, colors};
use crate::render::shapes;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldConfig {
    pub seed: u64,
    pub layers: usize,
    pub stars_per_layer: usize,
    pub twinkle: bool,
    /// Size of the wrap area in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), 0x5747_4152)
    }
}

impl StarfieldConfig {
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self {
            seed,
            layers: settings.quality.starfield_layers(),
            stars_per_layer: settings.quality.stars_per_layer(),
            twinkle: settings.effective_twinkle(),
            width: settings.screen_width,
            height: settings.screen_height,
        }
    }
}

#[derive(Debug, Clone)]
struct BgStar {
    pos: Vec2,
    brightness: f32,
    radius: f32,
    phase: f32,
    color: Color,
}

#[derive(Debug, Clone)]
struct StarLayer {
    /// Parallax factor; 1.0 moves with the camera, 0.0 is fixed
    depth: f32,
    stars: Vec<BgStar>,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    config: StarfieldConfig,
    layers: Vec<StarLayer>,
    camera: Vec2,
    time: f32,
    velocity: f32,
    gr_intensity: f32,
}

const STAR_TINTS: [Color; 4] = [
    Color::new(1.0, 1.0, 1.0, 1.0),
    Color::new(0.75, 0.85, 1.0, 1.0),
    Color::new(1.0, 0.9, 0.7, 1.0),
    Color::new(1.0, 0.75, 0.6, 1.0),
];

impl Starfield {
    pub fn new(config: StarfieldConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let (w, h) = (config.width.max(1) as f32, config.height.max(1) as f32);
        let layers = (0..config.layers)
            .map(|i| {
                // Farthest layer first
                let depth = (i + 1) as f32 / (config.layers + 1) as f32;
                let stars = (0..config.stars_per_layer)
                    .map(|_| BgStar {
                        pos: Vec2::new(rng.random_range(0.0..w), rng.random_range(0.0..h)),
                        brightness: rng.random_range(0.3..1.0) * (0.5 + 0.5 * depth),
                        radius: if rng.random_range(0..20) == 0 { 1.5 } else { 0.0 },
                        phase: rng.random_range(0.0..std::f32::consts::TAU),
                        color: STAR_TINTS[rng.random_range(0..STAR_TINTS.len())],
                    })
                    .collect();
                StarLayer { depth, stars }
            })
            .collect();
        log::debug!(
            "Starfield: {} layers x {} stars (seed {})",
            config.layers,
            config.stars_per_layer,
            config.seed
        );
        Self {
            config,
            layers,
            camera: Vec2::ZERO,
            time: 0.0,
            velocity: 0.0,
            gr_intensity: 0.0,
        }
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(|l| l.stars.len()).sum()
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera += delta;
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Ship speed as a fraction of c
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity.clamp(0.0, 0.999);
    }

    pub fn gr_intensity(&self) -> f32 {
        self.gr_intensity
    }

    pub fn set_gr_intensity(&mut self, intensity: f32) {
        self.gr_intensity = intensity.max(0.0);
    }

    pub fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    /// Wrapped position of every star in `layer`, in wrap-area pixels
    pub fn layer_positions(&self, layer: usize) -> Vec<Vec2> {
        let Some(l) = self.layers.get(layer) else {
            return Vec::new();
        };
        l.stars.iter().map(|s| self.wrap(s.pos - self.camera * l.depth)).collect()
    }

    fn wrap(&self, p: Vec2) -> Vec2 {
        let w = self.config.width.max(1) as f32;
        let h = self.config.height.max(1) as f32;
        Vec2::new(p.x.rem_euclid(w), p.y.rem_euclid(h))
    }

    fn twinkle(&self, star: &BgStar) -> f32 {
        if self.config.twinkle {
            0.75 + 0.25 * (self.time * 2.5 + star.phase).sin()
        } else {
            1.0
        }
    }

    /// Clear `target` to deep space and paint every layer, far to near
    pub fn draw(&self, target: &mut Canvas) {
        target.clear(colors::DEEP_SPACE);
        let sx = target.width() as f32 / self.config.width.max(1) as f32;
        let sy = target.height() as f32 / self.config.height.max(1) as f32;
        for layer in &self.layers {
            for star in &layer.stars {
                let p = self.wrap(star.pos - self.camera * layer.depth);
                let p = Vec2::new(p.x * sx, p.y * sy);
                let alpha = star.brightness * self.twinkle(star);
                if star.radius > 0.0 {
                    shapes::circle(target, p, star.radius, star.color.with_alpha(alpha));
                } else {
                    target.blend_pixel(p.x as i32, p.y as i32, star.color, alpha);
                }
            }
        }
    }
}
