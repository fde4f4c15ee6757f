//! Pooled positional audio.
//!
//! Sounds are registered by [`SoundId`] in a [`SoundRegistry`]. Every
//! `play*` call checks a reusable [`PlaybackHandle`] out of the
//! [`AudioPlaybackPool`]; the handle follows an entity, sits at a fixed
//! point, or fades out, and goes back to its id's free list when done.
//! Output goes through an [`AudioBackend`]: [`KiraBackend`] for a real
//! device, [`SilentBackend`] for headless runs.

mod backend;
mod error;
mod handle;
mod kira_backend;
mod manifest;
mod pool;
mod registry;
mod silent;
mod sound_id;

pub use backend::{AudioBackend, Placement, PlayRequest};
pub use error::AudioError;
pub use handle::{HandleStatus, HandleTick, PlaybackHandle, PlaybackState, TargetPositions};
pub use kira_backend::{KiraBackend, KiraVoice};
pub use manifest::{AudioManifest, EffectEntry, LoopEntry};
pub use pool::{AudioPlaybackPool, HandleKey, VoiceSettings};
pub use registry::{SoundRegistry, MAX_PITCH, MIN_PITCH};
pub use silent::{SilentBackend, SilentClip, SilentVoice, SilentVoiceState};
pub use sound_id::SoundId;

/// Default linear fade-out rate for one-shot handles, in volume per second.
pub const DEFAULT_FADE_OUT_SPEED: f32 = 10.0;

// Re-export for convenience
pub use kira;
