//! Full-screen star map
//!
//! Shares the simulation's galaxy renderer and controls; the map state lives
//! in the view, not in a world.

use std::rc::Rc;

use super::{InputHandle, TransitionConfig, TransitionEffect, TransitionRequest, View, ViewError, ViewType};
use crate::assets::AssetManager;
use crate::easing::Easing;
use crate::render::canvas::Canvas;
use crate::render::draw_cmd::DrawCmd;
use crate::render::renderer::{CommandRenderer, NoTriggers};
use crate::sim::{Camera, GalaxyState, galaxy_commands, keys, update_galaxy_view};
use crate::starmap::StarCatalog;

pub struct GalaxyMapView {
    input: InputHandle,
    catalog: Rc<StarCatalog>,
    assets: Rc<AssetManager>,
    galaxy: GalaxyState,
    show_ui: bool,
    cmds: Vec<DrawCmd>,
    /// View to go back to on Escape
    back: ViewType,
}

impl GalaxyMapView {
    pub fn new(input: InputHandle, catalog: Rc<StarCatalog>, assets: Rc<AssetManager>, show_ui: bool) -> Self {
        Self {
            input,
            catalog,
            assets,
            galaxy: GalaxyState::default(),
            show_ui,
            cmds: Vec::new(),
            back: ViewType::Bridge,
        }
    }

    pub fn galaxy(&self) -> &GalaxyState {
        &self.galaxy
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    fn rebuild(&mut self) {
        self.cmds = galaxy_commands(&self.galaxy, &self.catalog);
        if !self.show_ui {
            self.cmds.retain(|c| !c.is_ui());
        }
    }
}

impl View for GalaxyMapView {
    fn view_type(&self) -> ViewType {
        ViewType::GalaxyMap
    }

    fn init(&mut self) -> Result<(), ViewError> {
        if self.catalog.is_empty() {
            log::warn!("Galaxy map has an empty star catalog");
        }
        self.rebuild();
        Ok(())
    }

    fn enter(&mut self, from: ViewType) {
        if from != ViewType::None {
            self.back = from;
        }
        self.rebuild();
    }

    fn exit(&mut self, _to: ViewType) {}

    fn update(&mut self, _dt: f32) -> Option<TransitionRequest> {
        let input = self.input.borrow().clone();
        update_galaxy_view(&mut self.galaxy, &input);
        self.rebuild();

        if input.was_pressed(keys::ESCAPE) || input.was_pressed(keys::G) {
            return Some(TransitionRequest::new(
                self.back,
                TransitionConfig::new(TransitionEffect::Zoom, Easing::InOutCubic, 0.8),
            ));
        }
        None
    }

    fn draw(&self, screen: &mut Canvas) {
        let renderer = CommandRenderer::new(&*self.assets, &NoTriggers, Camera::default());
        renderer.render(&self.cmds, screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::draw_cmd::CmdKind;
    use crate::sim::{FrameInput, KeyEvent};
    use std::cell::RefCell;

    fn view(show_ui: bool) -> (GalaxyMapView, InputHandle) {
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::default()));
        let view = GalaxyMapView::new(
            input.clone(),
            Rc::new(StarCatalog::builtin()),
            Rc::new(AssetManager::procedural()),
            show_ui,
        );
        (view, input)
    }

    #[test]
    fn test_tab_switches_to_sky_projection() {
        let (mut view, input) = view(false);
        view.init().unwrap();
        assert!(!view.galaxy().sky_view);
        *input.borrow_mut() = FrameInput::with_keys(vec![KeyEvent::pressed(keys::TAB)]);
        assert!(view.update(0.016).is_none());
        assert!(view.galaxy().sky_view);
        assert!(matches!(
            view.commands()[0],
            DrawCmd::GalaxyBackground { sky_view_mode: true, .. }
        ));
        assert!(!view.commands().iter().any(|c| c.kind() == CmdKind::Ui));
    }

    #[test]
    fn test_escape_returns_to_previous_view() {
        let (mut view, input) = view(true);
        view.init().unwrap();
        view.enter(ViewType::Space);
        *input.borrow_mut() = FrameInput::with_keys(vec![KeyEvent::pressed(keys::ESCAPE)]);
        let req = view.update(0.016).unwrap();
        assert_eq!(req.to, ViewType::Space);
    }

    #[test]
    fn test_draw_paints_background() {
        let (mut view, _) = view(true);
        view.init().unwrap();
        let mut screen = Canvas::new(64, 36);
        view.draw(&mut screen);
        assert!(screen.pixel(0, 0).unwrap().a > 0);
    }
}
