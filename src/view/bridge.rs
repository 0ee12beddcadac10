//! Ship bridge: isometric interior over open space
//!
//! The hull floor (disc, deck grid, spire) is painted pixel by pixel once
//! into an offscreen cache at `init` and blitted every frame. Per frame only
//! the simulation's draw commands are rendered: everything below the hull
//! layer first, then the cache, then the rest. Trigger commands go to the
//! starfield, the planet renderer and the bubble arc.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;

use super::starfield::{Starfield, StarfieldConfig};
use super::{InputHandle, TransitionConfig, TransitionEffect, TransitionRequest, View, ViewError, ViewLayers, ViewType};
use crate::assets::AssetManager;
use crate::audio::AudioManager;
use crate::easing::Easing;
use crate::render::arc::ArcSegment;
use crate::render::canvas::{BlitOptions, Canvas};
use crate::render::color::colors;
use crate::render::draw_cmd::{DrawCmd, layers, sort_by_layer};
use crate::render::planet::{PlanetRenderer, PlanetScene};
use crate::render::renderer::{CommandRenderer, DrawCall, TriggerHandler};
use crate::render::shapes;
use crate::sim::{FrameOutput, World, init_world, keys, step};
use crate::starmap::StarCatalog;

/// Routes trigger commands to the bridge's sub-renderers
struct BridgeTriggers<'a> {
    starfield: &'a Starfield,
    planets: &'a dyn PlanetRenderer,
    time: f32,
}

impl TriggerHandler for BridgeTriggers<'_> {
    fn render_trigger(&self, cmd: &DrawCmd, target: &mut Canvas) {
        let (w, h) = (target.width(), target.height());
        match cmd {
            DrawCmd::SpaceBg { .. } => self.starfield.draw(target),
            DrawCmd::Planets3D { .. } => {
                let image = self.planets.render(&PlanetScene::orbiting(self.time), w, h);
                target.blit(&image, &BlitOptions::default());
            }
            DrawCmd::BubbleArc { phase, .. } => {
                let arc = ArcSegment::bubble_edge(w as f32, h as f32, *phase);
                shapes::arc(target, &arc, colors::BUBBLE_EDGE);
            }
            _ => {}
        }
    }
}

pub struct BridgeView {
    input: InputHandle,
    catalog: Rc<StarCatalog>,
    assets: Rc<AssetManager>,
    audio: Rc<RefCell<AudioManager>>,
    planets: Box<dyn PlanetRenderer>,
    starfield_config: StarfieldConfig,
    starfield: Option<Starfield>,
    world: World,
    output: FrameOutput,
    show_ui: bool,
    floor_cache: Option<Canvas>,
    cache_builds: u32,
    width: u32,
    height: u32,
    time: f32,
}

impl BridgeView {
    pub fn new(
        input: InputHandle,
        catalog: Rc<StarCatalog>,
        assets: Rc<AssetManager>,
        audio: Rc<RefCell<AudioManager>>,
        planets: Box<dyn PlanetRenderer>,
        starfield_config: StarfieldConfig,
        seed: u64,
        show_ui: bool,
    ) -> Self {
        let (width, height) = (starfield_config.width, starfield_config.height);
        Self {
            input,
            catalog,
            assets,
            audio,
            planets,
            starfield_config,
            starfield: None,
            world: init_world(seed),
            output: FrameOutput::default(),
            show_ui,
            floor_cache: None,
            cache_builds: 0,
            width,
            height,
            time: 0.0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Output of the latest simulation step
    pub fn output(&self) -> &FrameOutput {
        &self.output
    }

    /// How many times the floor cache has been painted
    pub fn cache_builds(&self) -> u32 {
        self.cache_builds
    }

    /// Render the latest frame onto `screen`, returning the renderer's call log
    pub fn render_frame(&self, screen: &mut Canvas) -> Vec<DrawCall> {
        screen.clear(colors::DEEP_SPACE);
        let Some(starfield) = self.starfield.as_ref() else {
            return Vec::new();
        };
        let triggers = BridgeTriggers {
            starfield,
            planets: self.planets.as_ref(),
            time: self.time,
        };
        let renderer = CommandRenderer::new(&*self.assets, &triggers, self.output.camera);

        let sorted = sort_by_layer(&self.output.draw);
        let split = sorted.partition_point(|c| c.layer() < layers::HULL);

        let mut calls = renderer.render_sorted(&sorted[..split], screen);
        if let Some(cache) = &self.floor_cache {
            let opts = BlitOptions {
                x: (screen.width() as f32 - cache.width() as f32) * 0.5,
                y: (screen.height() as f32 - cache.height() as f32) * 0.5,
                ..Default::default()
            };
            screen.blit(cache, &opts);
        }
        calls.extend(renderer.render_sorted(&sorted[split..], screen));
        calls
    }
}

/// Hull disc with a deck grid and a central spire
fn paint_floor(width: u32, height: u32) -> Canvas {
    let mut floor = Canvas::new(width, height);
    let (w, h) = (width as f32, height as f32);
    let center = Vec2::new(w * 0.5, h * 0.58);
    let radius = w.min(h) * 0.42;

    shapes::circle(&mut floor, center, radius, colors::HULL);
    for i in 1..=4 {
        shapes::ring(&mut floor, center, radius * i as f32 / 4.0, 1.5, colors::HULL_GRID);
    }
    for i in 0..12 {
        let angle = i as f32 / 12.0 * TAU;
        let rim = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        shapes::line(&mut floor, center, rim, 1.0, colors::HULL_GRID);
    }

    let top = center - Vec2::new(0.0, radius * 0.9);
    shapes::line(&mut floor, center, top, 4.0, colors::SPIRE);
    shapes::circle(&mut floor, top, 6.0, colors::SPIRE);
    shapes::circle(&mut floor, center, radius * 0.08, colors::SPIRE);
    floor
}

impl View for BridgeView {
    fn view_type(&self) -> ViewType {
        ViewType::Bridge
    }

    fn init(&mut self) -> Result<(), ViewError> {
        if self.floor_cache.is_some() {
            return Ok(());
        }
        if self.width == 0 || self.height == 0 {
            return Err(ViewError::Init {
                view: ViewType::Bridge,
                reason: format!("cannot cache a {}x{} floor", self.width, self.height),
            });
        }
        self.floor_cache = Some(paint_floor(self.width, self.height));
        self.cache_builds += 1;
        self.starfield = Some(Starfield::new(self.starfield_config));
        log::info!("Bridge floor cached ({}x{})", self.width, self.height);
        Ok(())
    }

    fn enter(&mut self, from: ViewType) {
        log::debug!("Entering bridge from {from}");
    }

    fn exit(&mut self, _to: ViewType) {}

    fn update(&mut self, dt: f32) -> Option<TransitionRequest> {
        self.time += dt;
        let input = self.input.borrow().clone();

        match step(&self.world, &input, &self.catalog) {
            Ok((world, mut output)) => {
                if !self.show_ui {
                    output.draw.retain(|c| !c.is_ui());
                }
                for line in &output.debug {
                    log::info!("{line}");
                }
                self.audio.borrow_mut().process_commands(&output.sounds);
                self.world = world;
                self.output = output;
            }
            Err(e) => log::warn!("Bridge simulation step failed: {e}"),
        }

        if let Some(field) = self.starfield.as_mut() {
            field.update(dt);
            // Distant space drifts slowly with the ship camera
            field.set_camera(Vec2::new(self.world.camera.x, self.world.camera.y) * 0.1);
        }

        if input.was_pressed(keys::V) {
            return Some(TransitionRequest::new(
                ViewType::Space,
                TransitionConfig::new(TransitionEffect::Crossfade, Easing::InOutSine, 1.0),
            ));
        }
        if input.was_pressed(keys::G) {
            return Some(TransitionRequest::new(
                ViewType::GalaxyMap,
                TransitionConfig::new(TransitionEffect::Zoom, Easing::InOutCubic, 0.8),
            ));
        }
        None
    }

    fn draw(&self, screen: &mut Canvas) {
        self.render_frame(screen);
    }

    fn layers(&self) -> ViewLayers<'_> {
        ViewLayers {
            background: self.starfield.as_ref(),
            content: Some(&self.output.draw),
            ui: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::draw_cmd::{CmdKind, TriggerKind};
    use crate::render::planet::FlatPlanetRenderer;
    use crate::sim::{FrameInput, Selection};

    fn bridge(width: u32, height: u32) -> (BridgeView, InputHandle) {
        bridge_with_ui(width, height, true)
    }

    fn bridge_with_ui(width: u32, height: u32, show_ui: bool) -> (BridgeView, InputHandle) {
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::default()));
        let config = StarfieldConfig {
            seed: 1,
            layers: 1,
            stars_per_layer: 10,
            twinkle: false,
            width,
            height,
        };
        let view = BridgeView::new(
            input.clone(),
            Rc::new(StarCatalog::builtin()),
            Rc::new(AssetManager::procedural()),
            Rc::new(RefCell::new(AudioManager::default())),
            Box::new(FlatPlanetRenderer),
            config,
            1234,
            show_ui,
        );
        (view, input)
    }

    #[test]
    fn test_floor_cache_built_once() {
        let (mut view, _) = bridge(64, 48);
        view.init().unwrap();
        view.init().unwrap();
        assert_eq!(view.cache_builds(), 1);
    }

    #[test]
    fn test_zero_sized_screen_fails_init() {
        let (mut view, _) = bridge(0, 48);
        assert!(matches!(view.init(), Err(ViewError::Init { .. })));
    }

    #[test]
    fn test_update_steps_the_world() {
        let (mut view, input) = bridge(64, 48);
        view.init().unwrap();
        *input.borrow_mut() = FrameInput::click_tile(5, 5);
        view.update(1.0 / 60.0);
        assert_eq!(view.world().tick, 1);
        assert_eq!(view.world().selection, Selection::Tile { x: 5, y: 5 });
    }

    #[test]
    fn test_triggers_are_never_inside_a_batch() {
        let (mut view, _) = bridge(96, 64);
        view.init().unwrap();
        view.update(1.0 / 60.0);
        let mut screen = Canvas::new(96, 64);
        let calls = view.render_frame(&mut screen);

        assert_eq!(calls.first(), Some(&DrawCall::Trigger(TriggerKind::SpaceBg)));
        assert_eq!(calls.get(1), Some(&DrawCall::Trigger(TriggerKind::Planets3D)));
        let bubble = calls
            .iter()
            .position(|c| *c == DrawCall::Trigger(TriggerKind::BubbleArc))
            .unwrap();
        assert!(calls[2..bubble]
            .iter()
            .all(|c| matches!(c, DrawCall::Batch { .. })));
        assert!(calls[2..bubble]
            .iter()
            .any(|c| matches!(c, DrawCall::Batch { kind: CmdKind::IsoTile, .. })));
    }

    #[test]
    fn test_v_requests_space_view() {
        let (mut view, input) = bridge(32, 32);
        view.init().unwrap();
        *input.borrow_mut() = FrameInput::with_keys(vec![crate::sim::KeyEvent::pressed(keys::V)]);
        let req = view.update(0.016).unwrap();
        assert_eq!(req.to, ViewType::Space);
    }

    #[test]
    fn test_hidden_debug_ui_drops_panels() {
        let (mut shown, _) = bridge_with_ui(64, 48, true);
        shown.init().unwrap();
        shown.update(1.0 / 60.0);
        assert!(shown.output().draw.iter().any(|c| c.is_ui()));

        let (mut hidden, _) = bridge_with_ui(64, 48, false);
        hidden.init().unwrap();
        hidden.update(1.0 / 60.0);
        assert_eq!(hidden.output().draw.iter().filter(|c| c.is_ui()).count(), 0);
        assert!(hidden.output().draw.iter().any(|c| c.kind() == CmdKind::IsoTile));
    }
}
