//! Playback handle: one pooled emitter and its per-tick state machine.

use crate::{AudioBackend, AudioError, Placement, PlayRequest, SoundId};
use engine_core::{Entity, Transform, World};
use glam::Vec3;

/// Where follow-mode handles look up their target each tick.
pub trait TargetPositions {
    /// Current world position, or `None` once the target is gone.
    fn target_position(&self, target: Entity) -> Option<Vec3>;
}

impl TargetPositions for World {
    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.get::<&Transform>(target).ok().map(|t| t.position)
    }
}

/// Pool membership of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleStatus {
    /// In its id's free list.
    Idle,
    /// Checked out and playing.
    Active,
}

/// What a handle is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    Idle,
    /// Snaps to the target's position every tick.
    Follow { target: Entity },
    /// Placed once at a world point.
    Fixed { point: Vec3 },
    /// Non-spatial, plays the whole clip.
    Flat,
    /// Non-spatial, volume decays linearly every tick.
    Fadeable,
}

/// Result of advancing a handle by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTick {
    Continue,
    /// Playback is over; the handle should go back to the pool.
    Finished,
}

/// A reusable audio emitter bound to one [`SoundId`].
#[derive(Debug)]
pub struct PlaybackHandle<V> {
    id: SoundId,
    voice: V,
    status: HandleStatus,
    state: PlaybackState,
    original_volume: f32,
    volume: f32,
    fade_out_speed: f32,
}

impl<V> PlaybackHandle<V> {
    pub(crate) fn new(id: SoundId, voice: V, volume: f32, fade_out_speed: f32) -> Self {
        Self {
            id,
            voice,
            status: HandleStatus::Idle,
            state: PlaybackState::Idle,
            original_volume: volume,
            volume,
            fade_out_speed,
        }
    }

    pub fn id(&self) -> &SoundId {
        &self.id
    }

    pub fn voice(&self) -> &V {
        &self.voice
    }

    pub fn status(&self) -> HandleStatus {
        self.status
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn original_volume(&self) -> f32 {
        self.original_volume
    }

    /// Check out of the pool. Volume goes back to its original level.
    pub(crate) fn activate<B>(&mut self, backend: &mut B)
    where
        B: AudioBackend<Voice = V>,
    {
        self.status = HandleStatus::Active;
        self.volume = self.original_volume;
        backend.set_volume(&mut self.voice, self.volume);
    }

    /// Return to the pool: playback stops and no further ticks apply.
    pub(crate) fn deactivate<B>(&mut self, backend: &mut B)
    where
        B: AudioBackend<Voice = V>,
    {
        backend.stop(&mut self.voice);
        self.status = HandleStatus::Idle;
        self.state = PlaybackState::Idle;
    }

    /// Play bound to a moving target, starting at `position`.
    pub fn play_follow<B>(
        &mut self,
        backend: &mut B,
        clip: &B::Clip,
        target: Entity,
        position: Vec3,
    ) -> Result<(), AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        self.start(backend, clip, Placement::Spatial(position))?;
        self.state = PlaybackState::Follow { target };
        Ok(())
    }

    /// Play from a fixed world point.
    pub fn play_at_position<B>(
        &mut self,
        backend: &mut B,
        clip: &B::Clip,
        point: Vec3,
    ) -> Result<(), AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        self.start(backend, clip, Placement::Spatial(point))?;
        self.state = PlaybackState::Fixed { point };
        Ok(())
    }

    /// Play non-spatially until the clip ends.
    pub fn play_flat<B>(&mut self, backend: &mut B, clip: &B::Clip) -> Result<(), AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        self.start(backend, clip, Placement::NonSpatial)?;
        self.state = PlaybackState::Flat;
        Ok(())
    }

    /// Play non-spatially at full volume, fading out over time.
    pub fn play_one_shot<B>(&mut self, backend: &mut B, clip: &B::Clip) -> Result<(), AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        self.start(backend, clip, Placement::NonSpatial)?;
        self.state = PlaybackState::Fadeable;
        Ok(())
    }

    fn start<B>(&mut self, backend: &mut B, clip: &B::Clip, placement: Placement) -> Result<(), AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        backend.start(
            &mut self.voice,
            PlayRequest::new(clip, placement, self.volume),
        )
    }

    /// Advance one tick.
    pub fn tick<B>(&mut self, dt: f32, backend: &mut B, targets: &dyn TargetPositions) -> HandleTick
    where
        B: AudioBackend<Voice = V>,
    {
        match self.state {
            PlaybackState::Idle => HandleTick::Finished,
            PlaybackState::Follow { target } => {
                let Some(position) = targets.target_position(target) else {
                    return HandleTick::Finished;
                };
                backend.set_position(&mut self.voice, position);
                if backend.is_playing(&self.voice) {
                    HandleTick::Continue
                } else {
                    HandleTick::Finished
                }
            }
            PlaybackState::Fixed { .. } | PlaybackState::Flat => {
                if backend.is_playing(&self.voice) {
                    HandleTick::Continue
                } else {
                    HandleTick::Finished
                }
            }
            PlaybackState::Fadeable => {
                self.volume = (self.volume - self.fade_out_speed * dt).clamp(0.0, 1.0);
                backend.set_volume(&mut self.voice, self.volume);
                if self.volume <= 0.0 || !backend.is_playing(&self.voice) {
                    HandleTick::Finished
                } else {
                    HandleTick::Continue
                }
            }
        }
    }
}
