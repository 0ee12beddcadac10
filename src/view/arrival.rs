//! Arrival cinematic
//!
//! The ship drops out of transit: the starfield streams past and slows down,
//! then the view hands over to the bridge. Any key skips ahead.

use glam::Vec2;

use super::starfield::{Starfield, StarfieldConfig};
use super::{InputHandle, TransitionConfig, TransitionEffect, TransitionRequest, View, ViewError, ViewLayers, ViewType};
use crate::easing::{self, Easing};
use crate::render::canvas::Canvas;
use crate::render::color::colors;
use crate::render::shapes;

/// Starfield speed at the start of the cinematic, pixels per second
const CRUISE_SPEED: f32 = 900.0;

pub struct ArrivalView {
    input: InputHandle,
    config: StarfieldConfig,
    starfield: Option<Starfield>,
    duration: f32,
    elapsed: f32,
    requested: bool,
}

impl ArrivalView {
    pub fn new(input: InputHandle, config: StarfieldConfig, duration: f32) -> Self {
        Self {
            input,
            config,
            starfield: None,
            duration: duration.max(0.0),
            elapsed: 0.0,
            requested: false,
        }
    }

    /// Fraction of the cinematic played, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            easing::clamp(self.elapsed / self.duration)
        } else {
            1.0
        }
    }

    fn handoff() -> TransitionRequest {
        TransitionRequest::new(
            ViewType::Bridge,
            TransitionConfig::new(TransitionEffect::Fade, Easing::InOutQuad, 1.2),
        )
    }
}

impl View for ArrivalView {
    fn view_type(&self) -> ViewType {
        ViewType::Arrival
    }

    fn init(&mut self) -> Result<(), ViewError> {
        if self.starfield.is_none() {
            self.starfield = Some(Starfield::new(self.config));
        }
        Ok(())
    }

    fn enter(&mut self, from: ViewType) {
        log::info!("Arrival sequence started (from {from})");
        self.elapsed = 0.0;
        self.requested = false;
    }

    fn exit(&mut self, _to: ViewType) {}

    fn update(&mut self, dt: f32) -> Option<TransitionRequest> {
        self.elapsed += dt;
        let slowdown = 1.0 - easing::out_cubic(self.progress());
        if let Some(field) = self.starfield.as_mut() {
            field.set_velocity(0.9 * slowdown);
            field.pan(Vec2::new(0.0, -CRUISE_SPEED * slowdown * dt));
            field.update(dt);
        }

        if self.requested {
            return None;
        }
        let skip = self.input.borrow().any_pressed();
        if skip || self.elapsed >= self.duration {
            self.requested = true;
            return Some(Self::handoff());
        }
        None
    }

    fn draw(&self, screen: &mut Canvas) {
        match &self.starfield {
            Some(field) => field.draw(screen),
            None => screen.clear(colors::DEEP_SPACE),
        }
        let alpha = easing::in_out_sine(self.progress());
        let (w, h) = (screen.width() as f32, screen.height() as f32);
        let size = (h * 0.06).max(8.0);
        let text = "ARRIVING";
        let x = (w - text.len() as f32 * size * 0.6) * 0.5;
        shapes::block_text(screen, text, x, h * 0.45, size, colors::UI_TEXT.with_alpha(alpha));
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
    use crate::sim::{FrameInput, KeyEvent, keys};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn arrival(duration: f32) -> (ArrivalView, InputHandle) {
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::default()));
        let config = StarfieldConfig {
            seed: 2,
            layers: 1,
            stars_per_layer: 8,
            twinkle: false,
            width: 32,
            height: 32,
        };
        (ArrivalView::new(input.clone(), config, duration), input)
    }

    #[test]
    fn test_requests_bridge_once_when_done() {
        let (mut view, _) = arrival(1.0);
        view.init().unwrap();
        view.enter(ViewType::None);
        assert!(view.update(0.5).is_none());
        let req = view.update(0.5).unwrap();
        assert_eq!(req.to, ViewType::Bridge);
        assert!(view.update(0.5).is_none());
    }

    #[test]
    fn test_any_key_skips() {
        let (mut view, input) = arrival(10.0);
        view.init().unwrap();
        *input.borrow_mut() = FrameInput::with_keys(vec![KeyEvent::pressed(keys::SPACE)]);
        assert!(view.update(0.016).is_some());
    }

    #[test]
    fn test_starfield_slows_down() {
        let (mut view, _) = arrival(2.0);
        view.init().unwrap();
        view.update(0.1);
        let early = view.layers().background.unwrap().velocity();
        view.update(1.8);
        let late = view.layers().background.unwrap().velocity();
        assert!(late < early);
    }
}
