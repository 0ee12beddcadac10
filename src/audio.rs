//! Sound effect dispatch
//!
//! The simulation emits plain sound ids each frame; the audio manager maps
//! them to effects and hands them to a sink with the effective volume.

use crate::settings::Settings;
use crate::sim::sounds;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tile selected
    Select,
    /// Structure built
    Build,
    /// Structure cleared
    Clear,
    /// Rejected action
    Error,
    /// Ship / galaxy mode switch
    ModeSwitch,
}

impl SoundEffect {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            sounds::SELECT => Some(SoundEffect::Select),
            sounds::BUILD => Some(SoundEffect::Build),
            sounds::CLEAR => Some(SoundEffect::Clear),
            sounds::ERROR => Some(SoundEffect::Error),
            sounds::MODE_SWITCH => Some(SoundEffect::ModeSwitch),
            _ => None,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            SoundEffect::Select => sounds::SELECT,
            SoundEffect::Build => sounds::BUILD,
            SoundEffect::Clear => sounds::CLEAR,
            SoundEffect::Error => sounds::ERROR,
            SoundEffect::ModeSwitch => sounds::MODE_SWITCH,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs what would play
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Playing {effect:?} at volume {volume:.2}");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn with_settings(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play every known id in order; unknown ids are logged and skipped.
    /// Returns the number of effects played.
    pub fn process_commands(&mut self, ids: &[u32]) -> usize {
        let mut played = 0;
        for &id in ids {
            match SoundEffect::from_id(id) {
                Some(effect) => {
                    if self.effective_volume() > 0.0 {
                        self.play(effect);
                        played += 1;
                    }
                }
                None => log::warn!("Unknown sound id {id}, skipping"),
            }
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(Box::new(Recorder(log.clone())));
        audio.set_master_volume(0.5);
        let played = audio.process_commands(&[sounds::BUILD, 999, sounds::ERROR]);
        assert_eq!(played, 2);
        assert_eq!(
            *log.borrow(),
            vec![(SoundEffect::Build, 0.5), (SoundEffect::Error, 0.5)]
        );
    }

    #[test]
    fn test_muted_plays_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioManager::with_settings(Box::new(Recorder(log.clone())), &settings);
        assert_eq!(audio.process_commands(&[sounds::SELECT]), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_ids_round_trip() {
        for id in [sounds::SELECT, sounds::BUILD, sounds::CLEAR, sounds::ERROR, sounds::MODE_SWITCH] {
            assert_eq!(SoundEffect::from_id(id).map(|e| e.id()), Some(id));
        }
    }
}
