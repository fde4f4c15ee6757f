//! Kira output: one persistent spatial emitter per pooled voice.

use crate::{AudioBackend, AudioError, Placement, PlayRequest, SoundId};
use glam::{Mat3, Quat, Vec3};
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::{
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
        PlaybackState,
    },
    spatial::{
        emitter::{EmitterHandle, EmitterSettings},
        listener::{ListenerHandle, ListenerSettings},
        scene::{SpatialSceneHandle, SpatialSceneSettings},
    },
    tween::Tween,
};
use std::path::Path;

fn to_mint(v: Vec3) -> mint::Vector3<f32> {
    mint::Vector3 { x: v.x, y: v.y, z: v.z }
}

fn backend_error(err: impl std::fmt::Display) -> AudioError {
    AudioError::Backend(err.to_string())
}

/// A pooled emitter and the sound currently playing on it.
pub struct KiraVoice {
    emitter: EmitterHandle,
    sound: Option<StaticSoundHandle>,
}

/// Audio device output through Kira with a spatial scene and one listener.
pub struct KiraBackend {
    manager: AudioManager,
    spatial_scene: SpatialSceneHandle,
    listener: ListenerHandle,
}

impl KiraBackend {
    /// Open the default audio device.
    pub fn new() -> Result<Self, AudioError> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(backend_error)?;

        let mut spatial_scene = manager
            .add_spatial_scene(SpatialSceneSettings::default())
            .map_err(backend_error)?;

        let listener = spatial_scene
            .add_listener(
                to_mint(Vec3::ZERO),
                mint::Quaternion { v: to_mint(Vec3::ZERO), s: 1.0 },
                ListenerSettings::default(),
            )
            .map_err(backend_error)?;

        Ok(Self {
            manager,
            spatial_scene,
            listener,
        })
    }
}

impl AudioBackend for KiraBackend {
    type Clip = StaticSoundData;
    type Voice = KiraVoice;

    fn load_clip(&mut self, path: &Path) -> Result<StaticSoundData, AudioError> {
        StaticSoundData::from_file(path).map_err(|e| AudioError::ClipLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn create_voice(&mut self, id: &SoundId) -> Result<KiraVoice, AudioError> {
        log::debug!("Creating emitter for {}", id);
        let emitter = self
            .spatial_scene
            .add_emitter(to_mint(Vec3::ZERO), EmitterSettings::default())
            .map_err(backend_error)?;
        Ok(KiraVoice {
            emitter,
            sound: None,
        })
    }

    fn start(
        &mut self,
        voice: &mut KiraVoice,
        request: PlayRequest<'_, StaticSoundData>,
    ) -> Result<(), AudioError> {
        self.stop(voice);

        let mut settings = StaticSoundSettings::new()
            .volume(request.volume as f64)
            .playback_rate(request.pitch as f64);
        if request.looping {
            settings = settings.loop_region(..);
        }
        if let Placement::Spatial(position) = request.placement {
            voice.emitter.set_position(to_mint(position), Tween::default());
            settings = settings.output_destination(&voice.emitter);
        }

        let data = request.clip.clone().with_settings(settings);
        let handle = self.manager.play(data).map_err(backend_error)?;
        voice.sound = Some(handle);
        Ok(())
    }

    fn set_master_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0) as f64;
        self.manager.main_track().set_volume(volume, Tween::default());
    }

    /// Update listener position and orientation (call each frame).
    fn set_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        let right = forward.cross(up).normalize_or_zero();
        let corrected_up = right.cross(forward).normalize_or_zero();
        let rotation = Mat3::from_cols(right, corrected_up, -forward);
        let quat = Quat::from_mat3(&rotation);

        self.listener.set_position(to_mint(position), Tween::default());
        self.listener.set_orientation(
            mint::Quaternion {
                v: mint::Vector3 { x: quat.x, y: quat.y, z: quat.z },
                s: quat.w,
            },
            Tween::default(),
        );
    }

    fn set_position(&mut self, voice: &mut KiraVoice, position: Vec3) {
        voice.emitter.set_position(to_mint(position), Tween::default());
    }

    fn set_volume(&mut self, voice: &mut KiraVoice, volume: f32) {
        if let Some(sound) = voice.sound.as_mut() {
            let _ = sound.set_volume(volume as f64, Tween::default());
        }
    }

    fn set_pitch(&mut self, voice: &mut KiraVoice, pitch: f32) {
        if let Some(sound) = voice.sound.as_mut() {
            let _ = sound.set_playback_rate(pitch as f64, Tween::default());
        }
    }

    fn is_playing(&self, voice: &KiraVoice) -> bool {
        voice
            .sound
            .as_ref()
            .is_some_and(|sound| sound.state() != PlaybackState::Stopped)
    }

    fn stop(&mut self, voice: &mut KiraVoice) {
        if let Some(mut sound) = voice.sound.take() {
            let _ = sound.stop(Tween::default());
        }
    }
}
