//! Color type shared by draw commands and canvases

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in [0, 1]
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with alpha multiplied by `alpha`
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: self.a * alpha,
            ..self
        }
    }

    /// Component-wise multiply (used for tinting)
    pub fn tint(self, other: Color) -> Self {
        Self::new(
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
            self.a * other.a,
        )
    }

    pub fn scale_rgb(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const DEEP_SPACE: Color = Color::rgb(0.01, 0.01, 0.03);
    pub const HULL: Color = Color::rgb(0.22, 0.24, 0.30);
    pub const HULL_GRID: Color = Color::rgb(0.30, 0.34, 0.42);
    pub const SPIRE: Color = Color::rgb(0.55, 0.60, 0.75);
    pub const SELECTION: Color = Color::new(1.0, 0.9, 0.3, 0.6);
    pub const BUBBLE_EDGE: Color = Color::new(0.4, 0.8, 1.0, 0.5);
    pub const UI_PANEL: Color = Color::new(0.0, 0.0, 0.0, 0.55);
    pub const UI_TEXT: Color = Color::rgb(0.85, 0.95, 0.85);
    pub const UI_ACCENT: Color = Color::rgb(1.0, 0.67, 0.0);
    pub const PLACEHOLDER: Color = Color::rgb(1.0, 0.0, 1.0);
}
