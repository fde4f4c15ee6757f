//! Arena of playback handles with a free list per sound id.

use crate::{
    AudioBackend, AudioError, HandleStatus, HandleTick, PlaybackHandle, SoundId, TargetPositions,
};
use std::collections::HashMap;

/// Index of a handle in the pool arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleKey(usize);

/// Settings applied when the pool has to create a new handle.
#[derive(Debug, Clone, Copy)]
pub struct VoiceSettings {
    pub volume: f32,
    pub fade_out_speed: f32,
}

/// Reusable playback handles. Each handle is either checked out
/// ([`HandleStatus::Active`]) or sits in exactly one id's free list.
#[derive(Debug)]
pub struct AudioPlaybackPool<V> {
    handles: Vec<PlaybackHandle<V>>,
    free: HashMap<SoundId, Vec<HandleKey>>,
}

impl<V> Default for AudioPlaybackPool<V> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
            free: HashMap::new(),
        }
    }
}

impl<V> AudioPlaybackPool<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out a handle for `id`, reusing the most recently released one.
    pub fn acquire<B>(
        &mut self,
        id: &SoundId,
        settings: VoiceSettings,
        backend: &mut B,
    ) -> Result<HandleKey, AudioError>
    where
        B: AudioBackend<Voice = V>,
    {
        let reused = self.free.get_mut(id).and_then(|list| list.pop());
        let key = match reused {
            Some(key) => {
                log::debug!(
                    "Reusing pooled handle for {} ({} left in free list)",
                    id,
                    self.free_count(id)
                );
                key
            }
            None => {
                log::debug!("Pool empty for {}, creating a new handle", id);
                let voice = backend.create_voice(id)?;
                self.handles.push(PlaybackHandle::new(
                    id.clone(),
                    voice,
                    settings.volume,
                    settings.fade_out_speed,
                ));
                HandleKey(self.handles.len() - 1)
            }
        };
        self.handles[key.0].activate(backend);
        Ok(key)
    }

    /// Stop a checked-out handle and push it onto its id's free list.
    /// Returns false (and changes nothing) if the handle is unknown or already idle.
    pub fn release<B>(&mut self, key: HandleKey, backend: &mut B) -> bool
    where
        B: AudioBackend<Voice = V>,
    {
        let Some(handle) = self.handles.get_mut(key.0) else {
            log::warn!("Release of unknown audio handle {:?}", key);
            return false;
        };
        if handle.status() == HandleStatus::Idle {
            log::warn!("Audio handle {:?} for {} released twice", key, handle.id());
            return false;
        }
        handle.deactivate(backend);
        log::debug!("{} returned to pool", handle.id());
        self.free.entry(handle.id().clone()).or_default().push(key);
        true
    }

    /// Tick every checked-out handle and release the finished ones.
    /// Returns how many were released.
    pub fn tick<B>(&mut self, dt: f32, backend: &mut B, targets: &dyn TargetPositions) -> usize
    where
        B: AudioBackend<Voice = V>,
    {
        let finished: Vec<HandleKey> = self
            .handles
            .iter_mut()
            .enumerate()
            .filter(|(_, h)| h.status() == HandleStatus::Active)
            .filter_map(|(i, h)| {
                (h.tick(dt, backend, targets) == HandleTick::Finished).then_some(HandleKey(i))
            })
            .collect();
        for key in &finished {
            self.release(*key, backend);
        }
        finished.len()
    }

    pub fn get(&self, key: HandleKey) -> Option<&PlaybackHandle<V>> {
        self.handles.get(key.0)
    }

    pub fn get_mut(&mut self, key: HandleKey) -> Option<&mut PlaybackHandle<V>> {
        self.handles.get_mut(key.0)
    }

    pub fn status(&self, key: HandleKey) -> Option<HandleStatus> {
        self.get(key).map(|h| h.status())
    }

    /// Idle handles waiting in `id`'s free list.
    pub fn free_count(&self, id: &SoundId) -> usize {
        self.free.get(id).map_or(0, |list| list.len())
    }

    /// Handles currently checked out.
    pub fn active_count(&self) -> usize {
        self.handles
            .iter()
            .filter(|h| h.status() == HandleStatus::Active)
            .count()
    }

    /// Total handles ever created.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Check that every handle is in exactly one place: checked out, or in
    /// the free list of its own id (and only once).
    pub fn check_invariants(&self) -> bool {
        let mut seen = vec![0usize; self.handles.len()];
        for (id, list) in &self.free {
            for key in list {
                let Some(handle) = self.handles.get(key.0) else {
                    return false;
                };
                if handle.id() != id || handle.status() != HandleStatus::Idle {
                    return false;
                }
                seen[key.0] += 1;
            }
        }
        self.handles.iter().zip(&seen).all(|(h, &count)| match h.status() {
            HandleStatus::Active => count == 0,
            HandleStatus::Idle => count == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SilentBackend, SilentClip, SilentVoice};
    use engine_core::World;

    const SETTINGS: VoiceSettings = VoiceSettings {
        volume: 0.8,
        fade_out_speed: 1.0,
    };

    fn setup() -> (AudioPlaybackPool<SilentVoice>, SilentBackend) {
        (AudioPlaybackPool::new(), SilentBackend::default())
    }

    #[test]
    fn acquire_creates_then_reuses() {
        let (mut pool, mut backend) = setup();
        let id = SoundId::from("laser");
        let a = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        assert_eq!(pool.len(), 1);
        assert!(pool.release(a, &mut backend));
        assert_eq!(pool.free_count(&id), 1);
        let b = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.free_count(&id), 0);
        assert_eq!(backend.voice_count(), 1);
    }

    #[test]
    fn concurrent_playbacks_get_distinct_handles() {
        let (mut pool, mut backend) = setup();
        let id = SoundId::from("laser");
        let a = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        let b = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.check_invariants());
    }

    #[test]
    fn free_lists_are_per_id() {
        let (mut pool, mut backend) = setup();
        let laser = SoundId::from("laser");
        let boom = SoundId::from("boom");
        let a = pool.acquire(&laser, SETTINGS, &mut backend).unwrap();
        pool.release(a, &mut backend);
        let b = pool.acquire(&boom, SETTINGS, &mut backend).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.free_count(&laser), 1);
        assert_eq!(pool.get(b).unwrap().id(), &boom);
        assert!(pool.check_invariants());
    }

    #[test]
    fn double_release_is_rejected() {
        let (mut pool, mut backend) = setup();
        let id = SoundId::from("laser");
        let a = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        assert!(pool.release(a, &mut backend));
        assert!(!pool.release(a, &mut backend));
        assert_eq!(pool.free_count(&id), 1);
        assert!(pool.check_invariants());
    }

    #[test]
    fn invariants_hold_across_mixed_acquire_release() {
        let (mut pool, mut backend) = setup();
        let ids = [SoundId::from("a"), SoundId::from("b"), SoundId::from("c")];
        let mut out = Vec::new();
        for round in 0..20 {
            let id = &ids[round % ids.len()];
            out.push(pool.acquire(id, SETTINGS, &mut backend).unwrap());
            if round % 3 == 2 {
                let key = out.remove(0);
                pool.release(key, &mut backend);
            }
            assert!(pool.check_invariants());
        }
        let mut unique = out.clone();
        unique.sort_by_key(|k| k.0);
        unique.dedup();
        assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn faded_handle_gets_original_volume_on_reuse() {
        let (mut pool, mut backend) = setup();
        let world = World::new();
        let id = SoundId::from("hum");
        let key = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        pool.get_mut(key)
            .unwrap()
            .play_one_shot(&mut backend, &SilentClip::new(10.0))
            .unwrap();
        pool.tick(0.3, &mut backend, &world);
        assert!(pool.get(key).unwrap().volume() < SETTINGS.volume);
        pool.release(key, &mut backend);

        let again = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        assert_eq!(again, key);
        assert_eq!(pool.get(again).unwrap().volume(), SETTINGS.volume);
    }

    #[test]
    fn tick_releases_finished_handles() {
        let (mut pool, mut backend) = setup();
        let world = World::new();
        let id = SoundId::from("blip");
        let key = pool.acquire(&id, SETTINGS, &mut backend).unwrap();
        pool.get_mut(key)
            .unwrap()
            .play_at_position(&mut backend, &SilentClip::new(0.1), glam::Vec3::ZERO)
            .unwrap();
        assert_eq!(pool.tick(0.0, &mut backend, &world), 0);
        backend.update(0.2);
        assert_eq!(pool.tick(0.0, &mut backend, &world), 1);
        assert_eq!(pool.status(key), Some(HandleStatus::Idle));
        assert_eq!(pool.free_count(&id), 1);
    }
}
