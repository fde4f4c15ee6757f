//! Descent Sandbox - six-degrees-of-freedom ship combat prototype, run headless from a script.

mod camera_sway;
mod config;
mod enemy;
mod script;
mod session;
mod ship;

use anyhow::Result;
use audio::{AudioBackend, AudioManifest, KiraBackend, SilentBackend, SoundRegistry};
use config::GameConfig;
use script::ScriptedInput;
use session::GameSession;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    log::info!(
        "Starting Descent Sandbox: {} scripted frames at {:.4}s",
        config.frames,
        config.frame_dt
    );

    if config.use_audio_device {
        match KiraBackend::new() {
            Ok(backend) => return run(config, backend),
            Err(e) => log::warn!("Audio device unavailable ({}), running silent", e),
        }
    }
    run(config, SilentBackend::default())
}

fn run<B: AudioBackend>(config: GameConfig, backend: B) -> Result<()> {
    let mut audio = load_sounds(backend, config.audio_manifest.as_deref());
    if let Some(seed) = config.seed {
        audio.reseed(seed);
    }
    for id in audio.loaded_ids() {
        log::debug!("Loaded sound {}", id);
    }

    let mut script = ScriptedInput::new(config.script.clone());
    let (frames, dt) = (config.frames, config.frame_dt);
    let mut session = GameSession::new(config, audio)?;
    session.run(&mut script, frames, dt);
    Ok(())
}

/// Build the sound registry from the manifest, or an empty one without.
fn load_sounds<B: AudioBackend>(backend: B, manifest: Option<&Path>) -> SoundRegistry<B> {
    let Some(path) = manifest else {
        return SoundRegistry::new(backend);
    };
    match AudioManifest::load(path) {
        Ok(manifest) => {
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            SoundRegistry::from_manifest(backend, &manifest, base_dir)
        }
        Err(e) => {
            log::warn!("Could not load sound manifest: {}", e);
            SoundRegistry::new(backend)
        }
    }
}
