//! Frame draw commands
//!
//! A frame is a flat list of [`DrawCmd`]s produced by the simulation or a
//! view. The integer layer is the only sort key; commands within one layer
//! keep their emission order.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Paint-order bands used by the built-in renderers
pub mod layers {
    pub const SPACE_BG: i32 = -1000;
    pub const GALAXY_BG: i32 = -900;
    pub const PLANETS: i32 = -800;
    /// Cached hull/floor art sits between the planets and the tiles
    pub const HULL: i32 = -500;
    pub const TILES: i32 = 0;
    pub const SELECTION: i32 = 50;
    /// Entities add their iso depth (x + y) on top of this
    pub const ENTITIES: i32 = 100;
    pub const STARS: i32 = 300;
    pub const BUBBLE: i32 = 800;
    pub const UI: i32 = 1000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen-space UI element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiKind {
    Panel,
    Label,
    Button,
    ProgressBar,
    Icon,
    Crosshair,
}

/// Variant discriminant, used for batching consecutive commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmdKind {
    Rect,
    Sprite,
    Text,
    IsoTile,
    IsoEntity,
    Ui,
    Line,
    Circle,
    GalaxyBackground,
    Star,
    SpaceBg,
    Planets3D,
    BubbleArc,
}

/// Commands handed to an external sub-renderer instead of drawn directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    SpaceBg,
    Planets3D,
    BubbleArc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        z: i32,
    },
    Sprite {
        id: u32,
        x: f32,
        y: f32,
        z: i32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
        z: i32,
    },
    IsoTile {
        tile: TileCoord,
        height: f32,
        sprite_id: u32,
        layer: i32,
        color: Color,
    },
    IsoEntity {
        id: u32,
        tile: TileCoord,
        /// Sub-tile visual offset in tiles
        offset_x: f32,
        offset_y: f32,
        height: f32,
        sprite_id: u32,
        layer: i32,
    },
    /// Screen-space element; x/y/w/h are normalized to [0, 1] and never
    /// camera-transformed
    Ui {
        id: String,
        kind: UiKind,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        text: String,
        sprite_id: u32,
        z: i32,
        color: Color,
        value: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
        z: i32,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        filled: bool,
        z: i32,
    },
    GalaxyBackground {
        opacity: f32,
        sky_view_mode: bool,
        view_lon: f32,
        view_lat: f32,
        fov: f32,
        z: i32,
    },
    Star {
        x: f32,
        y: f32,
        sprite_id: u32,
        scale: f32,
        alpha: f32,
        z: i32,
    },
    SpaceBg {
        z: i32,
    },
    Planets3D {
        z: i32,
    },
    BubbleArc {
        /// Animation phase in [0, 1)
        phase: f32,
        z: i32,
    },
}

impl DrawCmd {
    /// Sort key
    pub fn layer(&self) -> i32 {
        match self {
            DrawCmd::Rect { z, .. }
            | DrawCmd::Sprite { z, .. }
            | DrawCmd::Text { z, .. }
            | DrawCmd::Ui { z, .. }
            | DrawCmd::Line { z, .. }
            | DrawCmd::Circle { z, .. }
            | DrawCmd::GalaxyBackground { z, .. }
            | DrawCmd::Star { z, .. }
            | DrawCmd::SpaceBg { z }
            | DrawCmd::Planets3D { z }
            | DrawCmd::BubbleArc { z, .. } => *z,
            DrawCmd::IsoTile { layer, .. } | DrawCmd::IsoEntity { layer, .. } => *layer,
        }
    }

    pub fn kind(&self) -> CmdKind {
        match self {
            DrawCmd::Rect { .. } => CmdKind::Rect,
            DrawCmd::Sprite { .. } => CmdKind::Sprite,
            DrawCmd::Text { .. } => CmdKind::Text,
            DrawCmd::IsoTile { .. } => CmdKind::IsoTile,
            DrawCmd::IsoEntity { .. } => CmdKind::IsoEntity,
            DrawCmd::Ui { .. } => CmdKind::Ui,
            DrawCmd::Line { .. } => CmdKind::Line,
            DrawCmd::Circle { .. } => CmdKind::Circle,
            DrawCmd::GalaxyBackground { .. } => CmdKind::GalaxyBackground,
            DrawCmd::Star { .. } => CmdKind::Star,
            DrawCmd::SpaceBg { .. } => CmdKind::SpaceBg,
            DrawCmd::Planets3D { .. } => CmdKind::Planets3D,
            DrawCmd::BubbleArc { .. } => CmdKind::BubbleArc,
        }
    }

    /// `Some` for commands routed to a sub-renderer
    pub fn trigger(&self) -> Option<TriggerKind> {
        match self {
            DrawCmd::SpaceBg { .. } => Some(TriggerKind::SpaceBg),
            DrawCmd::Planets3D { .. } => Some(TriggerKind::Planets3D),
            DrawCmd::BubbleArc { .. } => Some(TriggerKind::BubbleArc),
            _ => None,
        }
    }

    pub fn is_ui(&self) -> bool {
        matches!(self, DrawCmd::Ui { .. })
    }
}

/// Stable sort by layer: equal layers keep emission order
pub fn sort_by_layer(cmds: &[DrawCmd]) -> Vec<&DrawCmd> {
    let mut sorted: Vec<&DrawCmd> = cmds.iter().collect();
    sorted.sort_by_key(|c| c.layer());
    sorted
}
