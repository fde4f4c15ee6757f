use crate::{AudioError, SoundId};
use glam::Vec3;
use std::path::Path;

/// Where a voice is heard from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// 2D: same volume regardless of listener position.
    NonSpatial,
    /// 3D emitter at a world position.
    Spatial(Vec3),
}

/// Parameters for starting a clip on a voice.
#[derive(Debug, Clone, Copy)]
pub struct PlayRequest<'a, C> {
    pub clip: &'a C,
    pub placement: Placement,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
}

impl<'a, C> PlayRequest<'a, C> {
    pub fn new(clip: &'a C, placement: Placement, volume: f32) -> Self {
        Self {
            clip,
            placement,
            volume,
            pitch: 1.0,
            looping: false,
        }
    }

    pub fn looping(mut self, pitch: f32) -> Self {
        self.looping = true;
        self.pitch = pitch;
        self
    }
}

/// Audio output used by the registry and pool.
///
/// A voice is a reusable emitter that plays one clip at a time. Voices are
/// created once and restarted many times.
pub trait AudioBackend {
    type Clip: Clone;
    type Voice;

    fn load_clip(&mut self, path: &Path) -> Result<Self::Clip, AudioError>;

    fn create_voice(&mut self, id: &SoundId) -> Result<Self::Voice, AudioError>;

    /// Start (or restart) a clip on a voice.
    fn start(
        &mut self,
        voice: &mut Self::Voice,
        request: PlayRequest<'_, Self::Clip>,
    ) -> Result<(), AudioError>;

    fn set_position(&mut self, voice: &mut Self::Voice, position: Vec3);

    fn set_volume(&mut self, voice: &mut Self::Voice, volume: f32);

    fn set_pitch(&mut self, voice: &mut Self::Voice, pitch: f32);

    fn is_playing(&self, voice: &Self::Voice) -> bool;

    fn stop(&mut self, voice: &mut Self::Voice);

    /// Scale every voice's output, `0.0..=1.0`.
    fn set_master_volume(&mut self, _volume: f32) {}

    /// Move the listener. Non-spatial backends ignore it.
    fn set_listener(&mut self, _position: Vec3, _forward: Vec3, _up: Vec3) {}

    /// Advance backend-side state once per frame.
    fn update(&mut self, _dt: f32) {}
}
