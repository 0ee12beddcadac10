//! World to draw commands
//!
//! One builder per simulation mode. Builders only read the world; the step
//! calls [`frame_commands`] after all state changes for the frame are done.

use super::state::{GalaxyState, Mode, Selection, Structure, World};
use crate::assets::sprite_ids;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_WIDTH};
use crate::render::color::{Color, colors};
use crate::render::draw_cmd::{DrawCmd, TileCoord, UiKind, layers};
use crate::starmap::{StarCatalog, galactic_lon_lat, gnomonic, tangent_to_screen};
use crate::tile_to_screen;

/// Entity ids for structures start here so they never collide with NPC ids
const STRUCTURE_ID_BASE: u32 = 10_000;
/// Frames per bubble edge animation cycle
const BUBBLE_PERIOD: u64 = 600;
/// Stars whose sprite center lies this far outside the screen are culled
const STAR_CULL_MARGIN: f32 = 32.0;

/// Draw commands for the current mode. With `test_mode` set, every UI
/// element is dropped.
pub fn frame_commands(world: &World, catalog: &StarCatalog, test_mode: bool) -> Vec<DrawCmd> {
    let mut cmds = match world.mode {
        Mode::ShipExploration => ship_commands(world),
        Mode::GalaxyMap => galaxy_commands(&world.galaxy, catalog),
        Mode::Dialogue { npc_id } => {
            let mut cmds = ship_commands(world);
            dialogue_panel(&mut cmds, world, npc_id);
            cmds
        }
        Mode::JourneyPlan => {
            let mut cmds = galaxy_commands(&world.galaxy, catalog);
            journey_panel(&mut cmds, catalog);
            cmds
        }
        Mode::CivDetail => {
            let mut cmds = galaxy_commands(&world.galaxy, catalog);
            civ_panel(&mut cmds, world);
            cmds
        }
        Mode::Legacy => legacy_commands(world),
    };
    if test_mode {
        cmds.retain(|c| !c.is_ui());
    }
    cmds
}

fn ui(id: &str, kind: UiKind, rect: (f32, f32, f32, f32), text: String, color: Color) -> DrawCmd {
    let (x, y, w, h) = rect;
    DrawCmd::Ui {
        id: id.to_string(),
        kind,
        x,
        y,
        w,
        h,
        text,
        sprite_id: 0,
        z: layers::UI,
        color,
        value: 0.0,
    }
}

fn panel(id: &str, rect: (f32, f32, f32, f32)) -> DrawCmd {
    ui(id, UiKind::Panel, rect, String::new(), colors::UI_PANEL)
}

fn label(id: &str, x: f32, y: f32, text: String) -> DrawCmd {
    ui(id, UiKind::Label, (x, y, 0.3, 0.03), text, colors::UI_TEXT)
}

/// Tile center within the screen (plus one tile of slack) for this camera
fn tile_visible(world: &World, x: i32, y: i32) -> bool {
    let cam = &world.camera;
    let p = tile_to_screen(x as f32, y as f32);
    let half_w = SCREEN_WIDTH as f32 * 0.5 / cam.zoom + TILE_WIDTH;
    let half_h = SCREEN_HEIGHT as f32 * 0.5 / cam.zoom + TILE_WIDTH;
    (p.x - cam.x).abs() <= half_w && (p.y - cam.y).abs() <= half_h
}

/// The planet from the ship: space background, planets, tiles, entities,
/// bubble edge and the status panels
pub fn ship_commands(world: &World) -> Vec<DrawCmd> {
    let mut cmds = vec![
        DrawCmd::SpaceBg { z: layers::SPACE_BG },
        DrawCmd::Planets3D { z: layers::PLANETS },
    ];

    let planet = &world.planet;
    let mut structures = Vec::new();
    for (i, tile) in planet.tiles.iter().enumerate() {
        let x = (i % planet.width) as i32;
        let y = (i / planet.width) as i32;
        if !tile_visible(world, x, y) {
            continue;
        }
        cmds.push(DrawCmd::IsoTile {
            tile: TileCoord::new(x, y),
            height: 0.0,
            sprite_id: tile.biome.sprite_id(),
            layer: layers::TILES,
            color: tile.biome.color(),
        });
        if let Structure::Built(kind) = tile.structure {
            structures.push(DrawCmd::IsoEntity {
                id: STRUCTURE_ID_BASE + i as u32,
                tile: TileCoord::new(x, y),
                offset_x: 0.0,
                offset_y: 0.0,
                height: 0.0,
                sprite_id: kind.sprite_id(),
                layer: layers::ENTITIES + x + y,
            });
        }
    }

    if let Selection::Tile { x, y } = world.selection {
        cmds.push(DrawCmd::IsoTile {
            tile: TileCoord::new(x, y),
            height: 0.0,
            sprite_id: 0,
            layer: layers::SELECTION,
            color: colors::SELECTION,
        });
    }

    cmds.extend(structures);
    for npc in &world.npcs {
        if !tile_visible(world, npc.x, npc.y) {
            continue;
        }
        cmds.push(DrawCmd::IsoEntity {
            id: npc.id,
            tile: TileCoord::new(npc.x, npc.y),
            offset_x: npc.offset_x,
            offset_y: npc.offset_y,
            height: 0.0,
            sprite_id: npc.sprite_id,
            layer: layers::ENTITIES + npc.x + npc.y,
        });
    }

    cmds.push(DrawCmd::BubbleArc {
        phase: (world.tick % BUBBLE_PERIOD) as f32 / BUBBLE_PERIOD as f32,
        z: layers::BUBBLE,
    });

    cmds.push(panel("status", (0.01, 0.01, 0.24, 0.08)));
    cmds.push(label(
        "status.mode",
        0.02,
        0.02,
        format!("{} tick {}", world.mode.as_str(), world.tick),
    ));
    cmds.push(label(
        "status.zoom",
        0.02,
        0.055,
        format!("zoom {:.2}", world.camera.zoom),
    ));
    let selected = match world.selection {
        Selection::Tile { x, y } => planet.tile(x, y).map(|tile| (x, y, tile)),
        Selection::None => None,
    };
    if let Some((x, y, tile)) = selected {
        let structure = match tile.structure {
            Structure::Empty => "empty".to_string(),
            Structure::Built(kind) => kind.to_string(),
        };
        cmds.push(panel("selection", (0.75, 0.01, 0.24, 0.06)));
        cmds.push(label(
            "selection.text",
            0.76,
            0.025,
            format!("({x},{y}) {} {structure}", tile.biome.as_str()),
        ));
    }

    cmds
}

/// Star map: galaxy background, projected stars, crosshair and compass
pub fn galaxy_commands(galaxy: &GalaxyState, catalog: &StarCatalog) -> Vec<DrawCmd> {
    let (w, h) = (SCREEN_WIDTH as f32, SCREEN_HEIGHT as f32);
    let mut cmds = vec![DrawCmd::GalaxyBackground {
        opacity: 1.0,
        sky_view_mode: galaxy.sky_view,
        view_lon: galaxy.view_lon,
        view_lat: galaxy.view_lat,
        fov: galaxy.fov,
        z: layers::GALAXY_BG,
    }];

    let on_screen = |x: f32, y: f32| {
        x >= -STAR_CULL_MARGIN
            && y >= -STAR_CULL_MARGIN
            && x <= w + STAR_CULL_MARGIN
            && y <= h + STAR_CULL_MARGIN
    };

    let mut names = Vec::new();
    for star in &catalog.stars {
        let screen = if galaxy.sky_view {
            // The observer sits at the origin; a star there has no direction
            if star.position().length_squared() == 0.0 {
                continue;
            }
            let (lon, lat) = galactic_lon_lat(star.position());
            let Some(t) = gnomonic(lon, lat, galaxy.view_lon as f64, galaxy.view_lat as f64) else {
                continue;
            };
            let p = tangent_to_screen(t, galaxy.fov as f64, w as f64, h as f64);
            (p.x as f32, p.y as f32)
        } else {
            let s = galaxy.plane_scale;
            (w * 0.5 + star.x as f32 * s, h * 0.5 - star.y as f32 * s)
        };
        if !screen.0.is_finite() || !screen.1.is_finite() || !on_screen(screen.0, screen.1) {
            continue;
        }
        cmds.push(DrawCmd::Star {
            x: screen.0,
            y: screen.1,
            sprite_id: star.sprite_id(),
            scale: star.display_scale(),
            alpha: (1.0 - star.vmag as f32 / 15.0).clamp(0.25, 1.0),
            z: layers::STARS,
        });
        names.push(ui(
            &format!("star.{}", star.id),
            UiKind::Label,
            (screen.0 / w + 0.01, screen.1 / h, 0.15, 0.025),
            star.name.clone(),
            star.color(),
        ));
    }
    cmds.extend(names);

    cmds.push(ui(
        "crosshair",
        UiKind::Crosshair,
        (0.48, 0.46, 0.04, 0.08),
        String::new(),
        colors::UI_ACCENT,
    ));
    cmds.push(DrawCmd::Ui {
        id: "compass".to_string(),
        kind: UiKind::Icon,
        x: 0.92,
        y: 0.02,
        w: 0.06,
        h: 0.1,
        text: String::new(),
        sprite_id: sprite_ids::ICON_COMPASS,
        z: layers::UI,
        color: colors::WHITE,
        value: 0.0,
    });
    let view = if galaxy.sky_view {
        format!(
            "SKY lon {:.1} lat {:.1} fov {:.0}",
            galaxy.view_lon, galaxy.view_lat, galaxy.fov
        )
    } else {
        format!("PLANE {:.1} px/ly", galaxy.plane_scale)
    };
    cmds.push(panel("legend", (0.01, 0.88, 0.3, 0.1)));
    cmds.push(label("legend.view", 0.02, 0.89, view));
    cmds.push(label(
        "legend.count",
        0.02,
        0.93,
        format!("{} stars", catalog.len()),
    ));
    cmds
}

fn dialogue_panel(cmds: &mut Vec<DrawCmd>, world: &World, npc_id: u32) {
    let line = match world.npcs.iter().find(|n| n.id == npc_id) {
        Some(npc) => format!("Crew #{} at ({},{})", npc.id, npc.x, npc.y),
        None => format!("Crew #{npc_id} has wandered off"),
    };
    cmds.push(panel("dialogue", (0.2, 0.7, 0.6, 0.25)));
    cmds.push(label("dialogue.text", 0.22, 0.73, line));
    cmds.push(ui(
        "dialogue.close",
        UiKind::Button,
        (0.68, 0.88, 0.1, 0.05),
        "Close".to_string(),
        colors::UI_ACCENT,
    ));
}

fn journey_panel(cmds: &mut Vec<DrawCmd>, catalog: &StarCatalog) {
    cmds.push(panel("journey", (0.68, 0.1, 0.3, 0.5)));
    cmds.push(label("journey.title", 0.69, 0.11, "Nearest systems".to_string()));
    let origin = catalog
        .find_by_name("Sol")
        .map(|s| s.position())
        .unwrap_or_default();
    for (i, star) in catalog
        .nearest(origin, 9)
        .into_iter()
        .filter(|s| s.position() != origin)
        .enumerate()
    {
        let d = star.position().distance(origin);
        cmds.push(label(
            &format!("journey.{i}"),
            0.69,
            0.15 + i as f32 * 0.04,
            format!("{} {:.1} ly", star.name, d),
        ));
    }
}

fn civ_panel(cmds: &mut Vec<DrawCmd>, world: &World) {
    let built = world
        .planet
        .tiles
        .iter()
        .filter(|t| t.structure != Structure::Empty)
        .count();
    let total = world.planet.tiles.len().max(1);
    cmds.push(panel("civ", (0.3, 0.2, 0.4, 0.4)));
    cmds.push(label("civ.title", 0.31, 0.21, "Civilization".to_string()));
    cmds.push(label(
        "civ.population",
        0.31,
        0.26,
        format!("{} crew", world.npcs.len()),
    ));
    cmds.push(label(
        "civ.structures",
        0.31,
        0.30,
        format!("{built} structures"),
    ));
    cmds.push(DrawCmd::Ui {
        id: "civ.development".to_string(),
        kind: UiKind::ProgressBar,
        x: 0.31,
        y: 0.35,
        w: 0.38,
        h: 0.03,
        text: String::new(),
        sprite_id: 0,
        z: layers::UI,
        color: colors::UI_ACCENT,
        value: built as f32 / total as f32,
    });
}

fn legacy_commands(world: &World) -> Vec<DrawCmd> {
    let built = world
        .planet
        .tiles
        .iter()
        .filter(|t| t.structure != Structure::Empty)
        .count();
    vec![
        DrawCmd::SpaceBg { z: layers::SPACE_BG },
        DrawCmd::Rect {
            x: 0.0,
            y: 0.0,
            w: SCREEN_WIDTH as f32,
            h: SCREEN_HEIGHT as f32,
            color: colors::DEEP_SPACE.with_alpha(0.7),
            z: layers::HULL,
        },
        panel("legacy", (0.25, 0.25, 0.5, 0.5)),
        label("legacy.title", 0.27, 0.27, "Legacy".to_string()),
        label("legacy.seed", 0.27, 0.33, format!("world {}", world.seed)),
        label("legacy.ticks", 0.27, 0.37, format!("{} ticks", world.tick)),
        label("legacy.built", 0.27, 0.41, format!("{built} structures raised")),
    ]
}
