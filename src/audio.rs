/// Looping background music.  Every failure here is survivable: the caller
/// logs it and the game runs silently.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::PlaybackState;
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Tween};
use log::{info, warn};

use crate::config::Config;

pub struct BackgroundMusic {
    // Dropping the manager closes the output stream, so it lives as long as
    // the handle.
    _manager: AudioManager<DefaultBackend>,
    handle: StaticSoundHandle,
}

impl BackgroundMusic {
    /// Open the default output device and loop `path` forever.
    pub fn play(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("music file not found: {}", path.display());
        }

        let data = StaticSoundData::from_file(path)
            .with_context(|| format!("unsupported or corrupt audio in {}", path.display()))?
            .loop_region(..);

        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| anyhow!("audio device unavailable: {e}"))?;
        let handle = manager
            .play(data)
            .map_err(|e| anyhow!("could not start playback: {e}"))?;

        Ok(BackgroundMusic {
            _manager: manager,
            handle,
        })
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.handle.state(), PlaybackState::Playing)
    }

    pub fn stop(&mut self) {
        if self.is_playing() {
            self.handle.stop(Tween::default());
        }
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the configured track, or return `None` (after logging why) when muted
/// or when anything goes wrong.
pub fn start_background_music(config: &Config) -> Option<BackgroundMusic> {
    if config.mute {
        info!("music muted");
        return None;
    }
    match BackgroundMusic::play(&config.music) {
        Ok(music) => {
            info!("music playing from {}", config.music.display());
            Some(music)
        }
        Err(e) => {
            warn!("continuing without music: {e:#}");
            None
        }
    }
}
