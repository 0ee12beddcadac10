//! View registry and transition driver
//!
//! Every operation validates before it mutates, so a failed call leaves the
//! registry, the current view and any in-flight transition untouched.
//!
//! A transition requested while another is running supersedes it: the running
//! one is settled first (its target becomes current, its buffer is dropped),
//! then the new one starts from there.

use std::collections::BTreeMap;

use super::{Transition, TransitionConfig, TransitionEffect, TransitionRequest, View, ViewError, ViewType};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render::canvas::Canvas;

pub struct ViewManager {
    views: BTreeMap<ViewType, Box<dyn View>>,
    current: Option<ViewType>,
    transition: Option<Transition>,
    width: u32,
    height: u32,
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl ViewManager {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            views: BTreeMap::new(),
            current: None,
            transition: None,
            width,
            height,
        }
    }

    /// Store `view` under its type, replacing any earlier registration
    pub fn register(&mut self, view: Box<dyn View>) -> Result<(), ViewError> {
        let ty = view.view_type();
        if ty == ViewType::None {
            return Err(ViewError::InvalidView);
        }
        if self.views.insert(ty, view).is_some() {
            log::debug!("Replaced registered {ty} view");
        } else {
            log::info!("Registered {ty} view");
        }
        Ok(())
    }

    pub fn is_registered(&self, ty: ViewType) -> bool {
        self.views.contains_key(&ty)
    }

    pub fn current(&self) -> Option<ViewType> {
        self.current
    }

    pub fn current_view(&self) -> Option<&dyn View> {
        self.current.and_then(|ty| self.view(ty))
    }

    pub fn view(&self, ty: ViewType) -> Option<&dyn View> {
        self.views.get(&ty).map(|v| v.as_ref())
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Initialize `ty` without activating it. Errors leave nothing changed.
    fn prepare(&mut self, ty: ViewType) -> Result<(), ViewError> {
        let view = self.views.get_mut(&ty).ok_or(ViewError::NotRegistered(ty))?;
        view.init().inspect_err(|e| log::warn!("{e}"))
    }

    /// Switch to `ty` at once, without animation
    pub fn set_current(&mut self, ty: ViewType) -> Result<(), ViewError> {
        self.prepare(ty)?;
        self.settle_transition();
        self.activate(ty);
        Ok(())
    }

    fn activate(&mut self, ty: ViewType) {
        let prev = self.current;
        if let Some(view) = prev.and_then(|p| self.views.get_mut(&p)) {
            view.exit(ty);
        }
        if let Some(view) = self.views.get_mut(&ty) {
            view.enter(prev.unwrap_or(ViewType::None));
        }
        self.current = Some(ty);
        log::info!("Current view: {ty}");
    }

    pub fn transition_to(&mut self, request: TransitionRequest) -> Result<(), ViewError> {
        self.transition_with_config(request.to, request.config)
    }

    /// Animate to `to`. Without an animated config (or without a current
    /// view to animate from) this is an immediate switch.
    pub fn transition_with_config(&mut self, to: ViewType, config: TransitionConfig) -> Result<(), ViewError> {
        self.prepare(to)?;
        self.settle_transition();

        let from = match self.current {
            Some(from) if config.is_animated() => from,
            _ => {
                self.activate(to);
                return Ok(());
            }
        };

        log::info!(
            "Transition {from} -> {to} ({:?}, {:.2}s)",
            config.effect,
            config.duration
        );
        self.transition = Some(Transition::new(from, to, config, self.width, self.height));
        Ok(())
    }

    /// Finish any in-flight transition now
    fn settle_transition(&mut self) {
        if let Some(t) = self.transition.as_ref() {
            log::debug!("Settling transition {} -> {} early", t.from(), t.to());
            self.complete_transition();
        }
    }

    fn complete_transition(&mut self) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        let (from, to) = transition.finish();
        self.current = Some(to);
        if let Some(view) = self.views.get_mut(&from) {
            view.exit(to);
        }
        if let Some(view) = self.views.get_mut(&to) {
            view.enter(from);
        }
        log::info!("Current view: {to}");
    }

    /// Advance the transition, or the current view when none is running.
    /// A transition the current view asks for starts this same frame.
    pub fn update(&mut self, dt: f32) -> Result<(), ViewError> {
        if let Some(transition) = self.transition.as_mut() {
            if transition.effect() == TransitionEffect::Crossfade {
                let (from, to) = (transition.from(), transition.to());
                let mut types = vec![from];
                if to != from {
                    types.push(to);
                }
                for ty in types {
                    if let Some(view) = self.views.get_mut(&ty) {
                        if let Some(req) = view.update(dt) {
                            log::debug!("Dropping {ty} request for {} during crossfade", req.to);
                        }
                    }
                }
            }
            if transition.update(dt) {
                self.complete_transition();
            }
            return Ok(());
        }

        let request = match self.current.and_then(|ty| self.views.get_mut(&ty)) {
            Some(view) => view.update(dt),
            None => None,
        };
        match request {
            Some(request) => self.transition_to(request),
            None => Ok(()),
        }
    }

    /// Paint the transition frame, or the current view
    pub fn draw(&mut self, screen: &mut Canvas) {
        if let Some(transition) = self.transition.as_mut() {
            let from = self.views.get(&transition.from());
            let to = self.views.get(&transition.to());
            if let (Some(from), Some(to)) = (from, to) {
                transition.draw(from.as_ref(), to.as_ref(), screen);
                return;
            }
        }
        if let Some(view) = self.current.and_then(|ty| self.views.get(&ty)) {
            view.draw(screen);
        }
    }

    /// New size for future transition buffers
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
