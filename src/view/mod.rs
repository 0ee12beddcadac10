//! Views and view composition
//!
//! A view is one full-screen game screen with its own lifecycle. The
//! [`ViewManager`] owns every registered view, the current one, and at most
//! one in-flight [`Transition`] between two of them.
//!
//! Lifecycle of a view, driven by the manager:
//! `Uninitialized -> init() -> Inactive -> enter() -> Active -> exit() -> Inactive`

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::render::canvas::Canvas;
use crate::render::draw_cmd::DrawCmd;
use crate::sim::FrameInput;

pub mod arrival;
pub mod bridge;
pub mod galaxy;
pub mod manager;
pub mod space;
pub mod starfield;
pub mod transition;

pub use arrival::ArrivalView;
pub use bridge::BridgeView;
pub use galaxy::GalaxyMapView;
pub use manager::ViewManager;
pub use space::SpaceView;
pub use starfield::{Starfield, StarfieldConfig};
pub use transition::{Transition, TransitionEffect};

/// Registry key of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewType {
    /// No view; never registrable
    None,
    Space,
    Bridge,
    /// Reserved for a ship exterior view; nothing registers it yet
    Ship,
    GalaxyMap,
    /// Reserved for a planet surface view; nothing registers it yet
    PlanetSurface,
    Arrival,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::None => "none",
            ViewType::Space => "space",
            ViewType::Bridge => "bridge",
            ViewType::Ship => "ship",
            ViewType::GalaxyMap => "galaxy map",
            ViewType::PlanetSurface => "planet surface",
            ViewType::Arrival => "arrival",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("view reports no type and cannot be registered")]
    InvalidView,
    #[error("view {0} is not registered")]
    NotRegistered(ViewType),
    #[error("failed to initialize {view} view: {reason}")]
    Init { view: ViewType, reason: String },
}

/// How a transition animates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub effect: TransitionEffect,
    pub easing: Easing,
    /// Seconds; zero or less switches immediately
    pub duration: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            effect: TransitionEffect::Fade,
            easing: Easing::InOutQuad,
            duration: 0.5,
        }
    }
}

impl TransitionConfig {
    pub fn new(effect: TransitionEffect, easing: Easing, duration: f32) -> Self {
        Self {
            effect,
            easing,
            duration,
        }
    }

    /// Switch without animation
    pub fn instant() -> Self {
        Self::new(TransitionEffect::None, Easing::Linear, 0.0)
    }

    /// Runs through the transition engine (as opposed to switching at once)
    pub fn is_animated(&self) -> bool {
        self.effect != TransitionEffect::None && self.duration > 0.0
    }
}

/// A view asking the manager to switch to another view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub to: ViewType,
    pub config: TransitionConfig,
}

impl TransitionRequest {
    pub fn new(to: ViewType, config: TransitionConfig) -> Self {
        Self { to, config }
    }
}

/// Sub-components a view exposes for external composition
#[derive(Default, Clone, Copy)]
pub struct ViewLayers<'a> {
    pub background: Option<&'a Starfield>,
    pub content: Option<&'a [DrawCmd]>,
    pub ui: Option<&'a [DrawCmd]>,
}

/// Input shared between the host loop and the views that read it.
/// The host overwrites it before each manager update.
pub type InputHandle = Rc<RefCell<FrameInput>>;

pub trait View {
    fn view_type(&self) -> ViewType;

    /// Build resources. Called before every activation; must be idempotent.
    fn init(&mut self) -> Result<(), ViewError>;

    /// Became current, coming from `from`
    fn enter(&mut self, from: ViewType);

    /// Stopped being current, going to `to`
    fn exit(&mut self, to: ViewType);

    /// Advance by `dt` seconds. May ask for a transition.
    fn update(&mut self, dt: f32) -> Option<TransitionRequest>;

    /// Paint the view onto `screen`
    fn draw(&self, screen: &mut Canvas);

    fn layers(&self) -> ViewLayers<'_> {
        ViewLayers::default()
    }
}
