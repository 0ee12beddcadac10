//! Draw command renderer
//!
//! Consumes a frame's [`DrawCmd`]s in layer order. Consecutive commands of
//! the same kind are collected into a batch; trigger commands flush the
//! pending batch, run their sub-renderer, and start a fresh batch, so paint
//! order across 2D and sub-rendered content is preserved.

use glam::Vec2;

use super::canvas::{BlitOptions, Canvas};
use super::color::Color;
use super::draw_cmd::{CmdKind, DrawCmd, TileCoord, TriggerKind, UiKind, sort_by_layer};
use super::shapes;
use crate::assets::SpriteSource;
use crate::consts::{HEIGHT_STEP, TILE_HEIGHT, TILE_WIDTH};
use crate::sim::Camera;
use crate::tile_to_screen;

/// One entry of the renderer's call log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// `count` consecutive commands of one kind drawn together
    Batch { kind: CmdKind, count: usize },
    Trigger(TriggerKind),
}

/// Sub-renderer for trigger commands (space background, 3D planets, bubble edge)
pub trait TriggerHandler {
    fn render_trigger(&self, cmd: &DrawCmd, target: &mut Canvas);
}

/// Handler that ignores every trigger
pub struct NoTriggers;

impl TriggerHandler for NoTriggers {
    fn render_trigger(&self, cmd: &DrawCmd, _target: &mut Canvas) {
        log::trace!("Ignoring trigger {:?}", cmd.kind());
    }
}

pub struct CommandRenderer<'a> {
    assets: &'a dyn SpriteSource,
    triggers: &'a dyn TriggerHandler,
    camera: Camera,
}

impl<'a> CommandRenderer<'a> {
    pub fn new(assets: &'a dyn SpriteSource, triggers: &'a dyn TriggerHandler, camera: Camera) -> Self {
        Self {
            assets,
            triggers,
            camera,
        }
    }

    /// Sort `cmds` by layer and render them
    pub fn render(&self, cmds: &[DrawCmd], target: &mut Canvas) -> Vec<DrawCall> {
        let sorted = sort_by_layer(cmds);
        self.render_sorted(&sorted, target)
    }

    /// Render commands that are already in layer order
    pub fn render_sorted(&self, sorted: &[&DrawCmd], target: &mut Canvas) -> Vec<DrawCall> {
        let mut calls = Vec::new();
        let mut pending: Vec<&DrawCmd> = Vec::new();

        for &cmd in sorted {
            if let Some(trigger) = cmd.trigger() {
                self.flush(&mut pending, target, &mut calls);
                self.triggers.render_trigger(cmd, target);
                calls.push(DrawCall::Trigger(trigger));
                continue;
            }
            if pending.last().is_some_and(|p| p.kind() != cmd.kind()) {
                self.flush(&mut pending, target, &mut calls);
            }
            pending.push(cmd);
        }
        self.flush(&mut pending, target, &mut calls);

        calls
    }

    fn flush(&self, pending: &mut Vec<&DrawCmd>, target: &mut Canvas, calls: &mut Vec<DrawCall>) {
        let Some(first) = pending.first() else {
            return;
        };
        let kind = first.kind();
        for cmd in pending.iter() {
            self.draw_2d(cmd, target);
        }
        calls.push(DrawCall::Batch {
            kind,
            count: pending.len(),
        });
        pending.clear();
    }

    /// Screen position of an iso point (tile + sub-tile offset, raised by height)
    pub fn project(&self, tile: TileCoord, offset: Vec2, height: f32, target: &Canvas) -> Vec2 {
        let world = tile_to_screen(tile.x as f32 + offset.x, tile.y as f32 + offset.y)
            - Vec2::new(0.0, height * HEIGHT_STEP);
        let center = Vec2::new(target.width() as f32, target.height() as f32) * 0.5;
        (world - Vec2::new(self.camera.x, self.camera.y)) * self.camera.zoom + center
    }

    fn draw_2d(&self, cmd: &DrawCmd, target: &mut Canvas) {
        let zoom = self.camera.zoom;
        match cmd {
            DrawCmd::Rect { x, y, w, h, color, .. } => target.fill_rect(*x, *y, *w, *h, *color),
            DrawCmd::Sprite { id, x, y, .. } => {
                target.blit(self.assets.sprite(*id), &BlitOptions::at(*x, *y));
            }
            DrawCmd::Text {
                text,
                x,
                y,
                font_size,
                color,
                ..
            } => shapes::block_text(target, text, *x, *y, *font_size, *color),
            DrawCmd::IsoTile {
                tile, height, color, ..
            } => {
                let center = self.project(*tile, Vec2::ZERO, *height, target);
                shapes::diamond(target, center, TILE_WIDTH * zoom, TILE_HEIGHT * zoom, *color);
            }
            DrawCmd::IsoEntity {
                tile,
                offset_x,
                offset_y,
                height,
                sprite_id,
                ..
            } => {
                let foot = self.project(*tile, Vec2::new(*offset_x, *offset_y), *height, target);
                let sprite = self.assets.sprite(*sprite_id);
                // Anchor the sprite's bottom-center on the tile center
                let opts = BlitOptions {
                    x: foot.x - sprite.width() as f32 * zoom * 0.5,
                    y: foot.y - sprite.height() as f32 * zoom,
                    scale: zoom,
                    ..Default::default()
                };
                target.blit(sprite, &opts);
            }
            DrawCmd::Ui {
                kind,
                x,
                y,
                w,
                h,
                text,
                sprite_id,
                color,
                value,
                ..
            } => {
                let sw = target.width() as f32;
                let sh = target.height() as f32;
                let (px, py, pw, ph) = (x * sw, y * sh, w * sw, h * sh);
                self.draw_ui(target, *kind, (px, py, pw, ph), text, *sprite_id, *color, *value);
            }
            DrawCmd::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
                ..
            } => shapes::line(target, Vec2::new(*x1, *y1), Vec2::new(*x2, *y2), *width, *color),
            DrawCmd::Circle {
                x,
                y,
                radius,
                color,
                filled,
                ..
            } => {
                if *filled {
                    shapes::circle(target, Vec2::new(*x, *y), *radius, *color);
                } else {
                    shapes::ring(target, Vec2::new(*x, *y), *radius, 1.5, *color);
                }
            }
            DrawCmd::GalaxyBackground {
                opacity,
                sky_view_mode,
                view_lat,
                fov,
                ..
            } => {
                let w = target.width() as f32;
                let h = target.height() as f32;
                target.fill_rect(0.0, 0.0, w, h, Color::rgb(0.02, 0.02, 0.06).with_alpha(*opacity));
                if *sky_view_mode && *fov > 0.0 {
                    // Galactic equator, when it is inside the field of view
                    let half = fov * 0.5;
                    if view_lat.abs() < half {
                        let y = h * 0.5 + view_lat / half * h * 0.5;
                        let c = Color::new(0.3, 0.3, 0.6, 0.4 * opacity);
                        shapes::line(target, Vec2::new(0.0, y), Vec2::new(w, y), 1.0, c);
                    }
                }
            }
            DrawCmd::Star {
                x,
                y,
                sprite_id,
                scale,
                alpha,
                ..
            } => {
                let sprite = self.assets.sprite(*sprite_id);
                let opts = BlitOptions {
                    x: x - sprite.width() as f32 * scale * 0.5,
                    y: y - sprite.height() as f32 * scale * 0.5,
                    scale: *scale,
                    alpha: *alpha,
                    src_rect: None,
                };
                target.blit(sprite, &opts);
            }
            DrawCmd::SpaceBg { .. } | DrawCmd::Planets3D { .. } | DrawCmd::BubbleArc { .. } => {
                // Routed through render_trigger before batching
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_ui(
        &self,
        target: &mut Canvas,
        kind: UiKind,
        (x, y, w, h): (f32, f32, f32, f32),
        text: &str,
        sprite_id: u32,
        color: Color,
        value: f32,
    ) {
        let font = (h * 0.6).clamp(8.0, 24.0);
        match kind {
            UiKind::Panel => target.fill_rect(x, y, w, h, color),
            UiKind::Label => shapes::block_text(target, text, x, y, font, color),
            UiKind::Button => {
                target.fill_rect(x, y, w, h, color.scale_rgb(0.4));
                shapes::block_text(target, text, x + 4.0, y + (h - font) * 0.5, font, color);
            }
            UiKind::ProgressBar => {
                target.fill_rect(x, y, w, h, color.scale_rgb(0.3));
                target.fill_rect(x, y, w * value.clamp(0.0, 1.0), h, color);
            }
            UiKind::Icon => {
                let sprite = self.assets.sprite(sprite_id);
                let scale = (w / sprite.width().max(1) as f32).max(0.01);
                target.blit(
                    sprite,
                    &BlitOptions {
                        x,
                        y,
                        scale,
                        ..Default::default()
                    },
                );
            }
            UiKind::Crosshair => {
                let c = Vec2::new(x + w * 0.5, y + h * 0.5);
                shapes::line(target, Vec2::new(x, c.y), Vec2::new(x + w, c.y), 1.0, color);
                shapes::line(target, Vec2::new(c.x, y), Vec2::new(c.x, y + h), 1.0, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManager;
    use crate::render::color::colors;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// Records the kinds of triggers it sees
    #[derive(Default)]
    struct RecordingTriggers {
        seen: RefCell<Vec<TriggerKind>>,
    }

    impl TriggerHandler for RecordingTriggers {
        fn render_trigger(&self, cmd: &DrawCmd, target: &mut Canvas) {
            if let Some(kind) = cmd.trigger() {
                self.seen.borrow_mut().push(kind);
            }
            target.fill_rect(0.0, 0.0, 1.0, 1.0, colors::WHITE);
        }
    }

    fn rect(z: i32) -> DrawCmd {
        DrawCmd::Rect {
            x: 0.0,
            y: 0.0,
            w: 2.0,
            h: 2.0,
            color: colors::WHITE,
            z,
        }
    }

    fn circle(z: i32) -> DrawCmd {
        DrawCmd::Circle {
            x: 4.0,
            y: 4.0,
            radius: 2.0,
            color: colors::WHITE,
            filled: true,
            z,
        }
    }

    #[test]
    fn test_batches_consecutive_kinds_and_flushes_on_triggers() {
        let assets = AssetManager::new();
        let triggers = RecordingTriggers::default();
        let renderer = CommandRenderer::new(&assets, &triggers, Camera::default());
        let mut target = Canvas::new(16, 16);

        let cmds = vec![
            rect(1),
            rect(2),
            DrawCmd::Planets3D { z: 3 },
            rect(4),
            circle(5),
            circle(6),
            DrawCmd::SpaceBg { z: -1 },
        ];
        let calls = renderer.render(&cmds, &mut target);

        assert_eq!(
            calls,
            vec![
                DrawCall::Trigger(TriggerKind::SpaceBg),
                DrawCall::Batch { kind: CmdKind::Rect, count: 2 },
                DrawCall::Trigger(TriggerKind::Planets3D),
                DrawCall::Batch { kind: CmdKind::Rect, count: 1 },
                DrawCall::Batch { kind: CmdKind::Circle, count: 2 },
            ]
        );
        assert_eq!(
            *triggers.seen.borrow(),
            vec![TriggerKind::SpaceBg, TriggerKind::Planets3D]
        );
    }

    #[test]
    fn test_ui_is_not_camera_transformed() {
        let assets = AssetManager::new();
        let camera = Camera {
            x: 500.0,
            y: 500.0,
            zoom: 3.0,
        };
        let renderer = CommandRenderer::new(&assets, &NoTriggers, camera);
        let mut target = Canvas::filled(100, 100, colors::BLACK);
        let cmds = vec![DrawCmd::Ui {
            id: "panel".into(),
            kind: UiKind::Panel,
            x: 0.0,
            y: 0.0,
            w: 0.5,
            h: 0.5,
            text: String::new(),
            sprite_id: 0,
            z: 0,
            color: colors::WHITE,
            value: 0.0,
        }];
        renderer.render(&cmds, &mut target);
        assert_eq!(target.pixel(10, 10).unwrap().r, 255);
        assert_eq!(target.pixel(60, 60).unwrap().r, 0);
    }

    #[test]
    fn test_iso_tile_follows_camera() {
        let assets = AssetManager::new();
        let renderer = CommandRenderer::new(&assets, &NoTriggers, Camera::default());
        let target = Canvas::new(200, 100);
        let p = renderer.project(TileCoord::new(0, 0), Vec2::ZERO, 0.0, &target);
        assert_eq!(p, Vec2::new(100.0, 50.0));

        let panned = CommandRenderer::new(
            &assets,
            &NoTriggers,
            Camera {
                x: 32.0,
                y: 16.0,
                zoom: 1.0,
            },
        );
        let p = panned.project(TileCoord::new(1, 0), Vec2::ZERO, 0.0, &target);
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }

    fn arb_cmd() -> impl Strategy<Value = DrawCmd> {
        (0u8..5, -20i32..20).prop_map(|(k, z)| match k {
            0 => rect(z),
            1 => circle(z),
            2 => DrawCmd::SpaceBg { z },
            3 => DrawCmd::Planets3D { z },
            _ => DrawCmd::BubbleArc { phase: 0.0, z },
        })
    }

    proptest! {
        #[test]
        fn prop_every_command_drawn_once_in_layer_order(cmds in prop::collection::vec(arb_cmd(), 0..40)) {
            let sorted = sort_by_layer(&cmds);
            prop_assert!(sorted.windows(2).all(|w| w[0].layer() <= w[1].layer()));

            let assets = AssetManager::new();
            let renderer = CommandRenderer::new(&assets, &NoTriggers, Camera::default());
            let mut target = Canvas::new(8, 8);
            let calls = renderer.render_sorted(&sorted, &mut target);

            // Replaying the call log reproduces the sorted kind sequence, so
            // no trigger ever lands inside a batch
            let mut replay = Vec::new();
            for call in &calls {
                match call {
                    DrawCall::Batch { kind, count } => {
                        prop_assert!(*count > 0);
                        replay.extend(std::iter::repeat_n(*kind, *count));
                    }
                    DrawCall::Trigger(t) => replay.push(match t {
                        TriggerKind::SpaceBg => CmdKind::SpaceBg,
                        TriggerKind::Planets3D => CmdKind::Planets3D,
                        TriggerKind::BubbleArc => CmdKind::BubbleArc,
                    }),
                }
            }
            let expected: Vec<CmdKind> = sorted.iter().map(|c| c.kind()).collect();
            prop_assert_eq!(replay, expected);
        }
    }
}
