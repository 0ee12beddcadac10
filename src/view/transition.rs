//! Animated transitions between two views
//!
//! A [`Transition`] only tracks time and owns its scratch buffer; the views
//! themselves stay in the manager's registry and are lent to [`Transition::draw`]
//! each frame. Finishing consumes the transition, which drops the buffer.

use serde::{Deserialize, Serialize};

use super::{TransitionConfig, View, ViewType};
use crate::easing::Easing;
use crate::render::canvas::{BlitOptions, Canvas, PixelRect};
use crate::render::color::colors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionEffect {
    /// Immediate switch
    None,
    /// Fade to black, then in
    #[default]
    Fade,
    /// Blend the new view over the old one
    Crossfade,
    /// Reveal the new view left to right
    Wipe,
    /// Shrink the old view out, grow the new one in
    Zoom,
}

impl TransitionEffect {
    /// Whether drawing renders one of the views offscreen first
    pub fn needs_buffer(&self) -> bool {
        matches!(
            self,
            TransitionEffect::Crossfade | TransitionEffect::Wipe | TransitionEffect::Zoom
        )
    }
}

#[derive(Debug)]
pub struct Transition {
    from: ViewType,
    to: ViewType,
    effect: TransitionEffect,
    easing: Easing,
    duration: f32,
    elapsed: f32,
    width: u32,
    height: u32,
    buffer: Option<Canvas>,
}

impl Transition {
    pub fn new(from: ViewType, to: ViewType, config: TransitionConfig, width: u32, height: u32) -> Self {
        let buffer = config
            .effect
            .needs_buffer()
            .then(|| Canvas::new(width, height));
        Self {
            from,
            to,
            effect: config.effect,
            easing: config.easing,
            duration: config.duration,
            elapsed: 0.0,
            width,
            height,
            buffer,
        }
    }

    pub fn from(&self) -> ViewType {
        self.from
    }

    pub fn to(&self) -> ViewType {
        self.to
    }

    pub fn effect(&self) -> TransitionEffect {
        self.effect
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Advance by `dt`; true once the full duration has elapsed
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased completion fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.easing.apply(t).clamp(0.0, 1.0)
    }

    /// Paint the in-between frame of `from` and `to` onto `screen`
    pub fn draw(&mut self, from: &dyn View, to: &dyn View, screen: &mut Canvas) {
        let p = self.progress();
        let (sw, sh) = (screen.width(), screen.height());
        match self.effect {
            TransitionEffect::None => to.draw(screen),
            TransitionEffect::Fade => {
                let alpha = if p < 0.5 {
                    from.draw(screen);
                    p * 2.0
                } else {
                    to.draw(screen);
                    (1.0 - p) * 2.0
                };
                screen.fill_rect(0.0, 0.0, sw as f32, sh as f32, colors::BLACK.with_alpha(alpha));
            }
            TransitionEffect::Crossfade => {
                from.draw(screen);
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.clear(colors::TRANSPARENT);
                    to.draw(buffer);
                    screen.blit(buffer, &BlitOptions { alpha: p, ..Default::default() });
                }
            }
            TransitionEffect::Wipe => {
                from.draw(screen);
                if let Some(buffer) = self.buffer.as_mut() {
                    let columns = (p * self.width as f32) as u32;
                    if columns > 0 {
                        buffer.clear(colors::TRANSPARENT);
                        to.draw(buffer);
                        let src_rect = PixelRect {
                            x: 0,
                            y: 0,
                            w: columns,
                            h: self.height,
                        };
                        screen.blit(
                            buffer,
                            &BlitOptions {
                                src_rect: Some(src_rect),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
            TransitionEffect::Zoom => {
                screen.clear(colors::BLACK);
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.clear(colors::TRANSPARENT);
                    let (scale, alpha) = if p < 0.5 {
                        from.draw(buffer);
                        (1.0 - p, 1.0 - p * 2.0)
                    } else {
                        to.draw(buffer);
                        (p, (p - 0.5) * 2.0)
                    };
                    let opts = BlitOptions::centered_scale(buffer, sw, sh, scale, alpha);
                    screen.blit(buffer, &opts);
                }
            }
        }
    }

    /// End the transition, dropping its buffer. Returns `(from, to)`.
    pub fn finish(self) -> (ViewType, ViewType) {
        log::debug!(
            "Transition {} -> {} finished after {:.3}s",
            self.from,
            self.to,
            self.elapsed
        );
        (self.from, self.to)
    }
}
