//! World state and core simulation types
//!
//! Everything the step function reads or produces lives here. All of it is
//! plain serializable data so a host can snapshot, diff or persist a world.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::assets::sprite_ids;
use crate::consts::{PLANET_HEIGHT, PLANET_WIDTH};
use crate::render::color::Color;
use crate::tile_to_screen;

/// Which renderer the step dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Walking the planet tile grid from the ship
    #[default]
    ShipExploration,
    /// Star map (plane or sky projection)
    GalaxyMap,
    /// Talking to an NPC
    Dialogue { npc_id: u32 },
    /// Plotting a route on the star map
    JourneyPlan,
    /// Civilization summary panel
    CivDetail,
    /// End-of-run summary
    Legacy,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ShipExploration => "Ship",
            Mode::GalaxyMap => "Galaxy",
            Mode::Dialogue { .. } => "Dialogue",
            Mode::JourneyPlan => "Journey",
            Mode::CivDetail => "Civilization",
            Mode::Legacy => "Legacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Grass,
    Sand,
    Rock,
    Water,
    Ice,
}

impl Biome {
    const ALL: [Biome; 5] = [Biome::Grass, Biome::Sand, Biome::Rock, Biome::Water, Biome::Ice];

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Grass => "Grass",
            Biome::Sand => "Sand",
            Biome::Rock => "Rock",
            Biome::Water => "Water",
            Biome::Ice => "Ice",
        }
    }

    pub fn sprite_id(&self) -> u32 {
        match self {
            Biome::Grass => sprite_ids::TILE_GRASS,
            Biome::Sand => sprite_ids::TILE_SAND,
            Biome::Rock => sprite_ids::TILE_ROCK,
            Biome::Water => sprite_ids::TILE_WATER,
            Biome::Ice => sprite_ids::TILE_ICE,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Biome::Grass => Color::rgb(0.25, 0.55, 0.25),
            Biome::Sand => Color::rgb(0.80, 0.72, 0.45),
            Biome::Rock => Color::rgb(0.45, 0.42, 0.40),
            Biome::Water => Color::rgb(0.15, 0.35, 0.75),
            Biome::Ice => Color::rgb(0.80, 0.90, 0.95),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureType {
    House,
    Farm,
    Mine,
    Beacon,
}

impl StructureType {
    pub fn sprite_id(&self) -> u32 {
        match self {
            StructureType::House => sprite_ids::STRUCT_HOUSE,
            StructureType::Farm => sprite_ids::STRUCT_FARM,
            StructureType::Mine => sprite_ids::STRUCT_MINE,
            StructureType::Beacon => sprite_ids::STRUCT_BEACON,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::House => "House",
            StructureType::Farm => "Farm",
            StructureType::Mine => "Mine",
            StructureType::Beacon => "Beacon",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Structure {
    #[default]
    Empty,
    Built(StructureType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub biome: Biome,
    pub structure: Structure,
}

/// Row-major tile grid; tile (x, y) lives at `y * width + x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
}

impl Planet {
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| y as usize * self.width + x as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).and_then(|i| self.tiles.get(i))
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).and_then(|i| self.tiles.get_mut(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// 0 = North, 1 = East, 2 = South, 3 = West (wraps mod 4)
    pub fn from_index(i: u64) -> Self {
        match i % 4 {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            _ => Direction::West,
        }
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    Static,
    /// Step in a tick-derived direction every `interval` ticks
    RandomWalk { interval: u32 },
    /// Walk `path` cyclically, one entry every `interval` ticks
    Patrol { path: Vec<Direction>, interval: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    /// Visual offset in tiles, eased toward zero every frame
    pub offset_x: f32,
    pub offset_y: f32,
    pub pattern: MovementPattern,
    /// Ticks until the next move
    pub cooldown: u32,
    /// Next entry of a patrol path
    pub path_index: usize,
    pub sprite_id: u32,
}

impl Npc {
    pub fn new(id: u32, x: i32, y: i32, pattern: MovementPattern) -> Self {
        let sprite_id = match pattern {
            MovementPattern::Static => sprite_ids::NPC_OFFICER,
            MovementPattern::RandomWalk { .. } => sprite_ids::NPC_CREW,
            MovementPattern::Patrol { .. } => sprite_ids::NPC_ENGINEER,
        };
        Self {
            id,
            x,
            y,
            offset_x: 0.0,
            offset_y: 0.0,
            pattern,
            cooldown: 0,
            path_index: 0,
            sprite_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Tile {
        x: i32,
        y: i32,
    },
}

/// View camera; x/y in isometric world pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Star map view parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalaxyState {
    /// Sky (gnomonic look-direction) projection instead of the top-down plane
    pub sky_view: bool,
    /// Look direction in degrees
    pub view_lon: f32,
    pub view_lat: f32,
    /// Horizontal field of view in degrees
    pub fov: f32,
    /// Plane view scale in pixels per light-year
    pub plane_scale: f32,
}

impl Default for GalaxyState {
    fn default() -> Self {
        Self {
            sky_view: false,
            view_lon: 0.0,
            view_lat: 0.0,
            fov: 90.0,
            plane_scale: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    /// Frames stepped so far
    pub tick: u64,
    pub planet: Planet,
    /// Sorted by id for deterministic iteration
    pub npcs: Vec<Npc>,
    pub selection: Selection,
    pub camera: Camera,
    pub mode: Mode,
    pub galaxy: GalaxyState,
}

/// Side length in tiles of one biome region
const BIOME_REGION: usize = 8;

/// Build the starting world for `seed`
pub fn init_world(seed: u64) -> World {
    let mut rng = Pcg32::seed_from_u64(seed);
    let (width, height) = (PLANET_WIDTH, PLANET_HEIGHT);

    // Coarse biome regions, then a sprinkling of per-tile variation
    let rw = width.div_ceil(BIOME_REGION);
    let rh = height.div_ceil(BIOME_REGION);
    let regions: Vec<Biome> = (0..rw * rh)
        .map(|_| Biome::ALL[rng.random_range(0..Biome::ALL.len())])
        .collect();

    let mut tiles = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let region = regions[(y / BIOME_REGION) * rw + x / BIOME_REGION];
            let biome = if rng.random_range(0..10) == 0 {
                Biome::ALL[rng.random_range(0..Biome::ALL.len())]
            } else {
                region
            };
            tiles.push(Tile {
                biome,
                structure: Structure::Empty,
            });
        }
    }

    let mut npcs = Vec::new();
    let patterns = [
        MovementPattern::Static,
        MovementPattern::Static,
        MovementPattern::RandomWalk { interval: 30 },
        MovementPattern::RandomWalk { interval: 45 },
        MovementPattern::RandomWalk { interval: 60 },
        MovementPattern::Patrol {
            path: vec![Direction::East, Direction::East, Direction::South, Direction::West, Direction::West, Direction::North],
            interval: 20,
        },
        MovementPattern::Patrol {
            path: vec![Direction::North, Direction::East, Direction::South, Direction::West],
            interval: 30,
        },
        MovementPattern::Patrol {
            path: vec![Direction::South, Direction::South, Direction::North, Direction::North],
            interval: 40,
        },
    ];
    for (i, pattern) in patterns.into_iter().enumerate() {
        let x = rng.random_range(4..width as i32 - 4);
        let y = rng.random_range(4..height as i32 - 4);
        npcs.push(Npc::new(i as u32 + 1, x, y, pattern));
    }

    let center = tile_to_screen(width as f32 * 0.5, height as f32 * 0.5);

    World {
        seed,
        tick: 0,
        planet: Planet {
            width,
            height,
            tiles,
        },
        npcs,
        selection: Selection::None,
        camera: Camera {
            x: center.x,
            y: center.y,
            zoom: 1.0,
        },
        mode: Mode::ShipExploration,
        galaxy: GalaxyState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_world_is_seed_deterministic() {
        assert_eq!(init_world(1234), init_world(1234));
        assert_ne!(init_world(1234).planet, init_world(4321).planet);
    }

    #[test]
    fn test_init_world_shape() {
        let world = init_world(1234);
        assert_eq!(world.planet.tiles.len(), PLANET_WIDTH * PLANET_HEIGHT);
        assert_eq!(world.mode, Mode::ShipExploration);
        assert_eq!(world.selection, Selection::None);
        assert!(world.planet.tiles.iter().all(|t| t.structure == Structure::Empty));
        assert!(world.npcs.iter().all(|n| world.planet.in_bounds(n.x, n.y)));
        assert!(world.npcs.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_planet_indexing() {
        let world = init_world(1);
        assert_eq!(world.planet.index(5, 5), Some(5 * 64 + 5));
        assert_eq!(world.planet.index(-1, 0), None);
        assert_eq!(world.planet.index(64, 0), None);
        assert!(world.planet.tile(63, 63).is_some());
    }

    #[test]
    fn test_direction_from_index_wraps() {
        assert_eq!(Direction::from_index(0), Direction::North);
        assert_eq!(Direction::from_index(5), Direction::East);
        assert_eq!(Direction::from_index(7).delta(), (-1, 0));
    }
}
