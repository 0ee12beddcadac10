//! Sprite lookup
//!
//! Renderers only see the [`SpriteSource`] trait. Unknown ids resolve to a
//! placeholder so a missing asset never fails a frame.

use std::collections::HashMap;

use glam::Vec2;

use crate::render::canvas::Canvas;
use crate::render::color::{Color, colors};
use crate::render::shapes;

/// Sprite ids shared by the simulation and the asset layer
pub mod sprite_ids {
    pub const TILE_GRASS: u32 = 1;
    pub const TILE_SAND: u32 = 2;
    pub const TILE_ROCK: u32 = 3;
    pub const TILE_WATER: u32 = 4;
    pub const TILE_ICE: u32 = 5;

    pub const NPC_CREW: u32 = 20;
    pub const NPC_ENGINEER: u32 = 21;
    pub const NPC_OFFICER: u32 = 22;

    pub const STRUCT_HOUSE: u32 = 40;
    pub const STRUCT_FARM: u32 = 41;
    pub const STRUCT_MINE: u32 = 42;
    pub const STRUCT_BEACON: u32 = 43;

    /// Star sprites by spectral class, O through M
    pub const STAR_O: u32 = 60;
    pub const STAR_B: u32 = 61;
    pub const STAR_A: u32 = 62;
    pub const STAR_F: u32 = 63;
    pub const STAR_G: u32 = 64;
    pub const STAR_K: u32 = 65;
    pub const STAR_M: u32 = 66;

    pub const ICON_COMPASS: u32 = 80;
}

pub trait SpriteSource {
    /// Sprite for `id`, or a placeholder when unknown
    fn sprite(&self, id: u32) -> &Canvas;

    fn contains(&self, id: u32) -> bool;
}

pub struct AssetManager {
    sprites: HashMap<u32, Canvas>,
    placeholder: Canvas,
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetManager {
    /// Empty manager; every lookup returns the placeholder
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            placeholder: placeholder_sprite(),
        }
    }

    /// Manager pre-populated with generated art for every built-in sprite id
    pub fn procedural() -> Self {
        use sprite_ids::*;

        let mut assets = Self::new();

        for (id, color) in [
            (TILE_GRASS, Color::rgb(0.25, 0.55, 0.25)),
            (TILE_SAND, Color::rgb(0.80, 0.72, 0.45)),
            (TILE_ROCK, Color::rgb(0.45, 0.42, 0.40)),
            (TILE_WATER, Color::rgb(0.15, 0.35, 0.75)),
            (TILE_ICE, Color::rgb(0.80, 0.90, 0.95)),
        ] {
            let mut c = Canvas::new(64, 32);
            shapes::diamond(&mut c, Vec2::new(32.0, 16.0), 64.0, 32.0, color);
            assets.insert(id, c);
        }

        for (id, color) in [
            (NPC_CREW, Color::rgb(0.3, 0.6, 1.0)),
            (NPC_ENGINEER, Color::rgb(1.0, 0.6, 0.2)),
            (NPC_OFFICER, Color::rgb(0.9, 0.2, 0.3)),
        ] {
            let mut c = Canvas::new(16, 24);
            shapes::circle(&mut c, Vec2::new(8.0, 6.0), 5.0, color);
            c.fill_rect(4.0, 11.0, 8.0, 13.0, color.scale_rgb(0.8));
            assets.insert(id, c);
        }

        for (id, color) in [
            (STRUCT_HOUSE, Color::rgb(0.7, 0.5, 0.35)),
            (STRUCT_FARM, Color::rgb(0.55, 0.75, 0.3)),
            (STRUCT_MINE, Color::rgb(0.4, 0.4, 0.45)),
            (STRUCT_BEACON, Color::rgb(0.9, 0.9, 0.4)),
        ] {
            let mut c = Canvas::new(32, 32);
            c.fill_rect(6.0, 10.0, 20.0, 22.0, color);
            c.fill_rect(4.0, 6.0, 24.0, 6.0, color.scale_rgb(0.7));
            assets.insert(id, c);
        }

        for (id, color) in [
            (STAR_O, Color::rgb(0.6, 0.7, 1.0)),
            (STAR_B, Color::rgb(0.7, 0.8, 1.0)),
            (STAR_A, Color::rgb(0.9, 0.9, 1.0)),
            (STAR_F, Color::rgb(1.0, 1.0, 0.9)),
            (STAR_G, Color::rgb(1.0, 0.95, 0.7)),
            (STAR_K, Color::rgb(1.0, 0.8, 0.5)),
            (STAR_M, Color::rgb(1.0, 0.55, 0.4)),
        ] {
            let mut c = Canvas::new(9, 9);
            shapes::circle(&mut c, Vec2::splat(4.5), 4.0, color.with_alpha(0.35));
            shapes::circle(&mut c, Vec2::splat(4.5), 2.0, color);
            assets.insert(id, c);
        }

        let mut compass = Canvas::new(24, 24);
        shapes::ring(&mut compass, Vec2::splat(12.0), 10.0, 2.0, colors::UI_TEXT);
        shapes::line(&mut compass, Vec2::new(12.0, 12.0), Vec2::new(12.0, 3.0), 2.0, colors::UI_ACCENT);
        assets.insert(ICON_COMPASS, compass);

        log::info!("Generated {} procedural sprites", assets.sprites.len());
        assets
    }

    pub fn insert(&mut self, id: u32, sprite: Canvas) {
        self.sprites.insert(id, sprite);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl SpriteSource for AssetManager {
    fn sprite(&self, id: u32) -> &Canvas {
        self.sprites.get(&id).unwrap_or(&self.placeholder)
    }

    fn contains(&self, id: u32) -> bool {
        self.sprites.contains_key(&id)
    }
}

/// Magenta/black checkerboard
fn placeholder_sprite() -> Canvas {
    let mut c = Canvas::filled(16, 16, colors::BLACK);
    for y in 0..2 {
        for x in 0..2 {
            if (x + y) % 2 == 0 {
                c.fill_rect(x as f32 * 8.0, y as f32 * 8.0, 8.0, 8.0, colors::PLACEHOLDER);
            }
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_id_returns_placeholder() {
        let assets = AssetManager::new();
        let sprite = assets.sprite(9999);
        assert_eq!(sprite.width(), 16);
        assert!(!assets.contains(9999));
        assert_eq!(sprite.pixel(0, 0).unwrap().r, 255);
        assert_eq!(sprite.pixel(8, 0).unwrap().r, 0);
    }

    #[test]
    fn test_procedural_covers_builtin_ids() {
        let assets = AssetManager::procedural();
        assert!(assets.contains(sprite_ids::TILE_GRASS));
        assert!(assets.contains(sprite_ids::STAR_G));
        assert!(assets.contains(sprite_ids::ICON_COMPASS));
        assert_eq!(assets.sprite(sprite_ids::STRUCT_HOUSE).width(), 32);
    }
}
