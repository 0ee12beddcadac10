//! Starbridge entry point
//!
//! Headless host loop: builds every view, plays a scripted run through the
//! arrival, bridge, space and galaxy views, and logs a checksum of each
//! second of frames. `RUST_LOG` controls verbosity.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starbridge (headless) starting...");

    match host::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by the embedding page
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use starbridge::{QualityPreset, Settings};
    use starbridge::assets::AssetManager;
    use starbridge::audio::{AudioManager, LogSink};
    use starbridge::consts::FRAME_DT;
    use starbridge::render::{Canvas, FlatPlanetRenderer};
    use starbridge::sim::{FrameInput, KeyEvent, PlayerAction, StructureType, keys};
    use starbridge::starmap::StarCatalog;
    use starbridge::view::{
        ArrivalView, BridgeView, GalaxyMapView, InputHandle, SpaceView, StarfieldConfig, ViewError,
        ViewManager, ViewType,
    };

    const SETTINGS_PATH: &str = "starbridge.json";
    const CATALOG_ENV: &str = "STARBRIDGE_CATALOG";
    const QUALITY_ENV: &str = "STARBRIDGE_QUALITY";
    const WORLD_SEED: u64 = 1234;
    const RUN_FRAMES: u32 = 900;

    /// Input for one frame of the scripted run
    fn scripted_input(frame: u32) -> FrameInput {
        match frame {
            // Skip the rest of the arrival
            120 => FrameInput::with_keys(vec![KeyEvent::pressed(keys::SPACE)]),
            240 => FrameInput::click_tile(5, 5),
            241 => FrameInput::with_action(PlayerAction::Build(StructureType::House)),
            242 => FrameInput::with_action(PlayerAction::Inspect),
            243..=300 => FrameInput::with_keys(vec![KeyEvent::down(keys::D), KeyEvent::down(keys::Q)]),
            360 => FrameInput::with_keys(vec![KeyEvent::pressed(keys::V)]),
            480 => FrameInput::with_keys(vec![KeyEvent::pressed(keys::G)]),
            540 => FrameInput::with_keys(vec![KeyEvent::pressed(keys::TAB)]),
            541..=600 => FrameInput::with_keys(vec![KeyEvent::down(keys::LEFT)]),
            660 => FrameInput::with_keys(vec![KeyEvent::pressed(keys::ESCAPE)]),
            _ => FrameInput::default(),
        }
    }

    fn load_catalog() -> StarCatalog {
        match std::env::var(CATALOG_ENV) {
            Ok(path) => StarCatalog::load(&path).unwrap_or_else(|e| {
                log::warn!("{e}; using the built-in catalog");
                StarCatalog::builtin()
            }),
            Err(_) => StarCatalog::builtin(),
        }
    }

    pub fn run() -> Result<(), ViewError> {
        let mut settings = Settings::load_or_default(SETTINGS_PATH);
        if let Ok(name) = std::env::var(QUALITY_ENV) {
            match QualityPreset::parse(&name) {
                Some(quality) => settings.quality = quality,
                None => log::warn!("Unknown quality preset '{name}', keeping {}", settings.quality.as_str()),
            }
        }
        let catalog = Rc::new(load_catalog());
        let assets = Rc::new(AssetManager::procedural());
        let audio = Rc::new(RefCell::new(AudioManager::with_settings(Box::new(LogSink), &settings)));
        let input: InputHandle = Rc::new(RefCell::new(FrameInput::default()));
        log::info!(
            "Quality {} at {}x{}, {} stars in catalog",
            settings.quality.as_str(),
            settings.screen_width,
            settings.screen_height,
            catalog.len()
        );

        let starfield = StarfieldConfig::from_settings(&settings, WORLD_SEED);
        let mut manager = ViewManager::new(settings.screen_width, settings.screen_height);
        manager.register(Box::new(ArrivalView::new(input.clone(), starfield, 4.0)))?;
        manager.register(Box::new(BridgeView::new(
            input.clone(),
            catalog.clone(),
            assets.clone(),
            audio,
            Box::new(FlatPlanetRenderer),
            starfield,
            WORLD_SEED,
            settings.show_debug_ui,
        )))?;
        manager.register(Box::new(SpaceView::new(input.clone(), starfield)))?;
        manager.register(Box::new(GalaxyMapView::new(
            input.clone(),
            catalog,
            assets,
            settings.show_debug_ui,
        )))?;
        manager.set_current(ViewType::Arrival)?;

        let mut screen = Canvas::new(settings.screen_width, settings.screen_height);
        for frame in 0..RUN_FRAMES {
            *input.borrow_mut() = scripted_input(frame);
            manager.update(FRAME_DT)?;
            manager.draw(&mut screen);

            if frame % 60 == 59 {
                log::info!(
                    "t={:>2}s view={} transitioning={} checksum={:016x}",
                    (frame + 1) / 60,
                    manager.current().unwrap_or(ViewType::None),
                    manager.is_transitioning(),
                    screen.checksum()
                );
            }
        }

        log::info!("Run finished on the {} view", manager.current().unwrap_or(ViewType::None));
        Ok(())
    }
}
