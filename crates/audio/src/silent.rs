//! Headless backend: voices keep time but make no sound.

use crate::{AudioBackend, AudioError, Placement, PlayRequest, SoundId};
use glam::Vec3;
use std::path::Path;

/// A clip with a length and nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilentClip {
    pub duration: f32,
}

impl SilentClip {
    pub fn new(duration: f32) -> Self {
        Self { duration }
    }
}

/// Index of a voice inside [`SilentBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SilentVoice(usize);

/// Observable state of a silent voice.
#[derive(Debug, Clone, PartialEq)]
pub struct SilentVoiceState {
    pub id: SoundId,
    pub clip: Option<SilentClip>,
    pub playing: bool,
    pub looping: bool,
    pub elapsed: f32,
    pub volume: f32,
    pub pitch: f32,
    pub position: Option<Vec3>,
    pub starts: u32,
}

/// Backend for headless sessions.
#[derive(Debug)]
pub struct SilentBackend {
    voices: Vec<SilentVoiceState>,
    clip_duration: f32,
    master_volume: f32,
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SilentBackend {
    /// `clip_duration` is the length given to clips loaded from disk.
    pub fn new(clip_duration: f32) -> Self {
        Self {
            voices: Vec::new(),
            clip_duration,
            master_volume: 1.0,
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn voice_state(&self, voice: &SilentVoice) -> Option<&SilentVoiceState> {
        self.voices.get(voice.0)
    }

    /// Number of voices ever created.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of clip starts across all voices.
    pub fn total_starts(&self) -> u32 {
        self.voices.iter().map(|v| v.starts).sum()
    }

    /// Voices currently playing.
    pub fn playing_count(&self) -> usize {
        self.voices.iter().filter(|v| v.playing).count()
    }

    /// End playback on a voice as if its clip ran out.
    pub fn finish(&mut self, voice: &SilentVoice) {
        if let Some(state) = self.voices.get_mut(voice.0) {
            state.playing = false;
        }
    }
}

impl AudioBackend for SilentBackend {
    type Clip = SilentClip;
    type Voice = SilentVoice;

    fn load_clip(&mut self, path: &Path) -> Result<SilentClip, AudioError> {
        log::debug!("Silent backend: {:?} stands in as a {}s clip", path, self.clip_duration);
        Ok(SilentClip::new(self.clip_duration))
    }

    fn create_voice(&mut self, id: &SoundId) -> Result<SilentVoice, AudioError> {
        self.voices.push(SilentVoiceState {
            id: id.clone(),
            clip: None,
            playing: false,
            looping: false,
            elapsed: 0.0,
            volume: 1.0,
            pitch: 1.0,
            position: None,
            starts: 0,
        });
        Ok(SilentVoice(self.voices.len() - 1))
    }

    fn start(
        &mut self,
        voice: &mut SilentVoice,
        request: PlayRequest<'_, SilentClip>,
    ) -> Result<(), AudioError> {
        let state = self
            .voices
            .get_mut(voice.0)
            .ok_or_else(|| AudioError::Backend(format!("unknown silent voice {}", voice.0)))?;
        state.clip = Some(*request.clip);
        state.playing = true;
        state.looping = request.looping;
        state.elapsed = 0.0;
        state.volume = request.volume;
        state.pitch = request.pitch;
        state.position = match request.placement {
            Placement::NonSpatial => None,
            Placement::Spatial(p) => Some(p),
        };
        state.starts += 1;
        Ok(())
    }

    fn set_position(&mut self, voice: &mut SilentVoice, position: Vec3) {
        if let Some(state) = self.voices.get_mut(voice.0) {
            state.position = Some(position);
        }
    }

    fn set_volume(&mut self, voice: &mut SilentVoice, volume: f32) {
        if let Some(state) = self.voices.get_mut(voice.0) {
            state.volume = volume;
        }
    }

    fn set_pitch(&mut self, voice: &mut SilentVoice, pitch: f32) {
        if let Some(state) = self.voices.get_mut(voice.0) {
            state.pitch = pitch;
        }
    }

    fn is_playing(&self, voice: &SilentVoice) -> bool {
        self.voices.get(voice.0).is_some_and(|v| v.playing)
    }

    fn stop(&mut self, voice: &mut SilentVoice) {
        self.finish(voice);
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    fn update(&mut self, dt: f32) {
        for state in self.voices.iter_mut().filter(|v| v.playing) {
            // Playback rate scales clip time; reversed playback still runs out.
            state.elapsed += dt * state.pitch.abs();
            let duration = state.clip.map(|c| c.duration).unwrap_or(0.0);
            if state.elapsed >= duration {
                if state.looping && duration > 0.0 {
                    state.elapsed %= duration;
                } else {
                    state.playing = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_stops_after_duration() {
        let mut backend = SilentBackend::default();
        let mut voice = backend.create_voice(&SoundId::from("laser")).unwrap();
        let clip = SilentClip::new(0.5);
        backend
            .start(&mut voice, PlayRequest::new(&clip, Placement::NonSpatial, 1.0))
            .unwrap();
        backend.update(0.25);
        assert!(backend.is_playing(&voice));
        backend.update(0.25);
        assert!(!backend.is_playing(&voice));
    }

    #[test]
    fn looping_clip_keeps_playing() {
        let mut backend = SilentBackend::default();
        let mut voice = backend.create_voice(&SoundId::from("engine")).unwrap();
        let clip = SilentClip::new(0.5);
        backend
            .start(&mut voice, PlayRequest::new(&clip, Placement::NonSpatial, 1.0).looping(1.0))
            .unwrap();
        backend.update(2.0);
        assert!(backend.is_playing(&voice));
    }

    #[test]
    fn master_volume_is_clamped() {
        let mut backend = SilentBackend::default();
        assert_eq!(backend.master_volume(), 1.0);
        backend.set_master_volume(0.4);
        assert_eq!(backend.master_volume(), 0.4);
        backend.set_master_volume(3.0);
        assert_eq!(backend.master_volume(), 1.0);
    }
}
