//! Per-frame input and output of the step function

use serde::{Deserialize, Serialize};

use super::state::{Camera, StructureType};
use crate::render::draw_cmd::DrawCmd;

/// Key codes the simulation reacts to
pub mod keys {
    pub const UP: u32 = 38;
    pub const DOWN: u32 = 40;
    pub const LEFT: u32 = 37;
    pub const RIGHT: u32 = 39;
    pub const W: u32 = 87;
    pub const A: u32 = 65;
    pub const S: u32 = 83;
    pub const D: u32 = 68;
    /// Zoom in / out
    pub const Q: u32 = 81;
    pub const E: u32 = 69;
    /// Toggle ship exploration and the galaxy map
    pub const M: u32 = 77;
    /// Toggle plane and sky projection on the galaxy map
    pub const TAB: u32 = 9;
    /// Field of view on the sky map
    pub const PLUS: u32 = 187;
    pub const MINUS: u32 = 189;
    /// Talk to an NPC on the selected tile
    pub const T: u32 = 84;
    /// Journey planner, civilization detail and legacy screens
    pub const J: u32 = 74;
    pub const C: u32 = 67;
    pub const L: u32 = 76;
    pub const ESCAPE: u32 = 27;
    /// View switches handled by the views, not the simulation
    pub const B: u32 = 66;
    pub const G: u32 = 71;
    pub const V: u32 = 86;
    pub const SPACE: u32 = 32;
}

/// Sound effect ids emitted in [`FrameOutput::sounds`]
pub mod sounds {
    pub const SELECT: u32 = 1;
    pub const BUILD: u32 = 2;
    pub const CLEAR: u32 = 3;
    pub const ERROR: u32 = 4;
    pub const MODE_SWITCH: u32 = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Went down this frame
    Pressed,
    /// Held from an earlier frame
    Down,
    /// Released this frame
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: u32,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: u32) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn down(key: u32) -> Self {
        Self {
            key,
            state: KeyState::Down,
        }
    }

    pub fn up(key: u32) -> Self {
        Self {
            key,
            state: KeyState::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAction {
    #[default]
    None,
    Inspect,
    Build(StructureType),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Screen-space mouse position
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Bit 0 = left, bit 1 = right, bit 2 = middle
    pub mouse_buttons: u8,
    pub keys: Vec<KeyEvent>,
    /// Left button went down this frame
    pub clicked_this_frame: bool,
    /// Mouse position already inverse-projected by the host
    pub world_mouse_x: f32,
    pub world_mouse_y: f32,
    pub tile_mouse_x: i32,
    pub tile_mouse_y: i32,
    pub action: PlayerAction,
    /// Suppress UI panels so golden frames ignore cosmetic text
    pub test_mode: bool,
}

impl FrameInput {
    /// Key went down this frame
    pub fn was_pressed(&self, key: u32) -> bool {
        self.keys
            .iter()
            .any(|k| k.key == key && k.state == KeyState::Pressed)
    }

    /// Key is currently held (pressed this frame or earlier)
    pub fn is_held(&self, key: u32) -> bool {
        self.keys
            .iter()
            .any(|k| k.key == key && matches!(k.state, KeyState::Pressed | KeyState::Down))
    }

    /// Any key went down this frame
    pub fn any_pressed(&self) -> bool {
        self.keys.iter().any(|k| k.state == KeyState::Pressed)
    }

    /// A left click on tile (x, y)
    pub fn click_tile(x: i32, y: i32) -> Self {
        Self {
            clicked_this_frame: true,
            mouse_buttons: 1,
            tile_mouse_x: x,
            tile_mouse_y: y,
            ..Default::default()
        }
    }

    pub fn with_action(action: PlayerAction) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }

    pub fn with_keys(keys: Vec<KeyEvent>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// In emission order; renderers sort by layer
    pub draw: Vec<DrawCmd>,
    pub sounds: Vec<u32>,
    pub debug: Vec<String>,
    pub camera: Camera,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_vs_pressed() {
        let input = FrameInput::with_keys(vec![KeyEvent::down(keys::W), KeyEvent::pressed(keys::M), KeyEvent::up(keys::A)]);
        assert!(input.is_held(keys::W));
        assert!(!input.was_pressed(keys::W));
        assert!(input.was_pressed(keys::M));
        assert!(input.is_held(keys::M));
        assert!(!input.is_held(keys::A));
        assert!(input.any_pressed());
    }
}
