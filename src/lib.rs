//! Starbridge - view composition and ship simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation step (tile world, NPCs, draw command generation)
//! - `view`: Views, transitions and the view manager driven by the host loop
//! - `render`: Draw commands, software canvases and the command renderer
//! - `starmap`: Star catalog and sky projection math
//! - `easing`: Easing curves used by transitions

pub mod assets;
pub mod audio;
pub mod easing;
pub mod render;
pub mod settings;
pub mod sim;
pub mod starmap;
pub mod view;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical screen size the simulation lays its UI out against
    pub const SCREEN_WIDTH: u32 = 1280;
    pub const SCREEN_HEIGHT: u32 = 720;

    /// Host frame timestep (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Isometric tile footprint in pixels at zoom 1.0
    pub const TILE_WIDTH: f32 = 64.0;
    pub const TILE_HEIGHT: f32 = 32.0;
    /// Vertical pixels per unit of tile/entity height
    pub const HEIGHT_STEP: f32 = 16.0;

    /// Planet grid dimensions
    pub const PLANET_WIDTH: usize = 64;
    pub const PLANET_HEIGHT: usize = 64;

    /// Camera pan speed in world pixels per frame at zoom 1.0
    pub const CAMERA_PAN_SPEED: f32 = 8.0;
    /// Multiplicative zoom step per frame while a zoom key is held
    pub const CAMERA_ZOOM_STEP: f32 = 1.02;
    pub const CAMERA_MIN_ZOOM: f32 = 0.25;
    pub const CAMERA_MAX_ZOOM: f32 = 4.0;
}

/// Project a tile coordinate (fractional allowed) to isometric world pixels.
///
/// The origin tile (0, 0) maps to (0, 0); +x runs down-right, +y down-left.
#[inline]
pub fn tile_to_screen(tx: f32, ty: f32) -> Vec2 {
    use consts::{TILE_HEIGHT, TILE_WIDTH};
    Vec2::new(
        (tx - ty) * TILE_WIDTH * 0.5,
        (tx + ty) * TILE_HEIGHT * 0.5,
    )
}

/// Inverse of [`tile_to_screen`], returning fractional tile coordinates
#[inline]
pub fn screen_to_tile(p: Vec2) -> Vec2 {
    use consts::{TILE_HEIGHT, TILE_WIDTH};
    let a = p.x / (TILE_WIDTH * 0.5);
    let b = p.y / (TILE_HEIGHT * 0.5);
    Vec2::new((a + b) * 0.5, (b - a) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_projection_round_trips() {
        let p = tile_to_screen(5.0, 3.0);
        assert_eq!(p, Vec2::new(64.0, 128.0));
        let t = screen_to_tile(p);
        assert!((t.x - 5.0).abs() < 1e-4);
        assert!((t.y - 3.0).abs() < 1e-4);
    }
}
