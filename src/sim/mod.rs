//! Deterministic simulation module
//!
//! The ship/planet world and its frame step. This module must be pure and
//! deterministic:
//! - One frame per step, no wall clock
//! - Seeded RNG only (world generation)
//! - Stable iteration order (tiles row-major, NPCs by id)
//! - No logging, no canvas or platform dependencies

pub mod input;
pub mod render;
pub mod state;
pub mod step;

pub use input::{FrameInput, FrameOutput, KeyEvent, KeyState, PlayerAction, keys, sounds};
pub use render::{frame_commands, galaxy_commands, ship_commands};
pub use state::{
    Biome, Camera, Direction, GalaxyState, Mode, MovementPattern, Npc, Planet, Selection, Structure,
    StructureType, Tile, World, init_world,
};
pub use step::{StepError, step, update_galaxy_view};
