//! Software rendering
//!
//! Draw commands are rasterized into [`Canvas`]es by the [`CommandRenderer`].

pub mod arc;
pub mod canvas;
pub mod color;
pub mod draw_cmd;
pub mod planet;
pub mod renderer;
pub mod sdf;
pub mod shapes;

pub use arc::ArcSegment;
pub use canvas::{BlitOptions, Canvas, PixelRect};
pub use color::{Color, colors};
pub use draw_cmd::{CmdKind, DrawCmd, TileCoord, TriggerKind, UiKind, layers, sort_by_layer};
pub use planet::{FlatPlanetRenderer, PlanetBody, PlanetRenderer, PlanetScene};
pub use renderer::{CommandRenderer, DrawCall, NoTriggers, TriggerHandler};
