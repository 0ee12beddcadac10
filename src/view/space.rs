//! Open space: the starfield and nothing else

use glam::Vec2;

use super::starfield::{Starfield, StarfieldConfig};
use super::{InputHandle, TransitionConfig, TransitionEffect, TransitionRequest, View, ViewError, ViewLayers, ViewType};
use crate::easing::Easing;
use crate::render::canvas::Canvas;
use crate::render::color::colors;
use crate::sim::keys;

/// Camera pan in pixels per second while a direction key is held
const PAN_SPEED: f32 = 240.0;

pub struct SpaceView {
    input: InputHandle,
    config: StarfieldConfig,
    starfield: Option<Starfield>,
    velocity: f32,
    gr_intensity: f32,
}

impl SpaceView {
    pub fn new(input: InputHandle, config: StarfieldConfig) -> Self {
        Self {
            input,
            config,
            starfield: None,
            velocity: 0.0,
            gr_intensity: 0.0,
        }
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.starfield.as_ref()
    }

    /// Ship speed as a fraction of c, forwarded to the background
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
        if let Some(field) = self.starfield.as_mut() {
            field.set_velocity(velocity);
        }
    }

    pub fn set_gr_intensity(&mut self, intensity: f32) {
        self.gr_intensity = intensity;
        if let Some(field) = self.starfield.as_mut() {
            field.set_gr_intensity(intensity);
        }
    }
}

impl View for SpaceView {
    fn view_type(&self) -> ViewType {
        ViewType::Space
    }

    fn init(&mut self) -> Result<(), ViewError> {
        if self.starfield.is_none() {
            let mut field = Starfield::new(self.config);
            field.set_velocity(self.velocity);
            field.set_gr_intensity(self.gr_intensity);
            self.starfield = Some(field);
        }
        Ok(())
    }

    fn enter(&mut self, from: ViewType) {
        log::debug!("Entering space from {from}");
    }

    fn exit(&mut self, _to: ViewType) {}

    fn update(&mut self, dt: f32) -> Option<TransitionRequest> {
        let input = self.input.borrow();
        let field = self.starfield.as_mut()?;
        field.update(dt);

        let mut pan = Vec2::ZERO;
        if input.is_held(keys::LEFT) || input.is_held(keys::A) {
            pan.x -= 1.0;
        }
        if input.is_held(keys::RIGHT) || input.is_held(keys::D) {
            pan.x += 1.0;
        }
        if input.is_held(keys::UP) || input.is_held(keys::W) {
            pan.y -= 1.0;
        }
        if input.is_held(keys::DOWN) || input.is_held(keys::S) {
            pan.y += 1.0;
        }
        field.pan(pan * PAN_SPEED * dt);

        if input.was_pressed(keys::B) {
            return Some(TransitionRequest::new(
                ViewType::Bridge,
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
        match &self.starfield {
            Some(field) => field.draw(screen),
            None => screen.clear(colors::DEEP_SPACE),
        }
    }

    fn layers(&self) -> ViewLayers<'_> {
        ViewLayers {
            background: self.starfield.as_ref(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FrameInput, KeyEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> StarfieldConfig {
        StarfieldConfig {
            seed: 4,
            layers: 2,
            stars_per_layer: 20,
            twinkle: false,
            width: 32,
            height: 32,
        }
    }

    #[test]
    fn test_init_is_idempotent_and_keeps_knobs() {
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::with_keys(vec![KeyEvent::down(keys::RIGHT)])));
        let mut view = SpaceView::new(input, config());
        view.set_velocity(0.5);
        view.init().unwrap();
        view.update(0.25);
        view.init().unwrap();
        let field = view.starfield().unwrap();
        assert_eq!(field.velocity(), 0.5);
        assert_eq!(field.camera(), Vec2::new(60.0, 0.0));
        assert!(view.layers().background.is_some());
    }

    #[test]
    fn test_held_keys_pan_and_b_requests_bridge() {
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::default()));
        let mut view = SpaceView::new(input.clone(), config());
        view.init().unwrap();

        *input.borrow_mut() = FrameInput::with_keys(vec![KeyEvent::down(keys::D)]);
        assert!(view.update(0.5).is_none());
        assert_eq!(view.starfield().unwrap().camera(), Vec2::new(120.0, 0.0));

        *input.borrow_mut() = FrameInput::with_keys(vec![KeyEvent::pressed(keys::B)]);
        let req = view.update(0.016).unwrap();
        assert_eq!(req.to, ViewType::Bridge);
        assert_eq!(req.config.effect, TransitionEffect::Crossfade);
    }
}
