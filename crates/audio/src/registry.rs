//! Sound registry: id lookup, variant groups, loop channels and the pool.

use crate::{
    AudioBackend, AudioManifest, AudioPlaybackPool, HandleKey, Placement, PlayRequest, SoundId,
    TargetPositions, VoiceSettings, DEFAULT_FADE_OUT_SPEED,
};
use engine_core::Entity;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use std::path::Path;

pub const MIN_PITCH: f32 = -3.0;
pub const MAX_PITCH: f32 = 3.0;

struct SoundSource<C> {
    clip: C,
    volume: f32,
}

struct LoopChannel<C, V> {
    clip: C,
    voice: V,
    volume: f32,
    pitch: f32,
}

enum Mode {
    Flat,
    Fading,
    Follow(Entity, Vec3),
    At(Vec3),
}

/// All registered sounds of a session plus the handle pool that plays them.
pub struct SoundRegistry<B: AudioBackend> {
    backend: B,
    effects: HashMap<SoundId, SoundSource<B::Clip>>,
    variants: HashMap<SoundId, Vec<B::Clip>>,
    loops: HashMap<SoundId, LoopChannel<B::Clip, B::Voice>>,
    pool: AudioPlaybackPool<B::Voice>,
    fade_out_speed: f32,
    rng: StdRng,
}

impl<B: AudioBackend> SoundRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self::with_rng(backend, StdRng::from_entropy())
    }

    /// Registry with a deterministic variant picker.
    pub fn with_seed(backend: B, seed: u64) -> Self {
        Self::with_rng(backend, StdRng::seed_from_u64(seed))
    }

    /// Reseed the variant picker.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn with_rng(backend: B, rng: StdRng) -> Self {
        Self {
            backend,
            effects: HashMap::new(),
            variants: HashMap::new(),
            loops: HashMap::new(),
            pool: AudioPlaybackPool::new(),
            fade_out_speed: DEFAULT_FADE_OUT_SPEED,
            rng,
        }
    }

    /// Build a registry from a manifest. Clips that fail to load are skipped.
    pub fn from_manifest(backend: B, manifest: &AudioManifest, base_dir: &Path) -> Self {
        let mut registry = Self::new(backend);
        registry.fade_out_speed = manifest.fade_out_speed;

        for entry in &manifest.effects {
            let clip = match registry.backend.load_clip(&base_dir.join(&entry.path)) {
                Ok(clip) => clip,
                Err(e) => {
                    log::warn!("Skipping sound {}: {}", entry.id, e);
                    continue;
                }
            };
            registry.register_effect(entry.id.clone(), clip, entry.volume);

            if let Some(paths) = &entry.variants {
                let mut clips = Vec::with_capacity(paths.len());
                for path in paths {
                    match registry.backend.load_clip(&base_dir.join(path)) {
                        Ok(clip) => clips.push(clip),
                        Err(e) => log::warn!("Skipping variant of {}: {}", entry.id, e),
                    }
                }
                registry.register_variants(entry.id.clone(), clips);
            }
        }

        for entry in &manifest.loops {
            let loaded = registry.backend.load_clip(&base_dir.join(&entry.path));
            match loaded {
                Ok(clip) => registry.register_loop(entry.id.clone(), clip, entry.volume),
                Err(e) => log::warn!("Skipping loop {}: {}", entry.id, e),
            }
        }

        log::info!(
            "Audio registry ready: {} effects, {} loops",
            registry.effects.len(),
            registry.loops.len()
        );
        registry
    }

    pub fn register_effect(&mut self, id: impl Into<SoundId>, clip: B::Clip, volume: f32) {
        let id = id.into();
        if self.effects.contains_key(&id) {
            log::warn!("Sound {} registered twice, keeping the latest", id);
        }
        self.effects.insert(id, SoundSource { clip, volume });
    }

    /// Attach a variant group to an effect id.
    pub fn register_variants(&mut self, id: impl Into<SoundId>, clips: Vec<B::Clip>) {
        self.variants.insert(id.into(), clips);
    }

    /// Register a loop channel. A voice that cannot be created is logged and skipped.
    pub fn register_loop(&mut self, id: impl Into<SoundId>, clip: B::Clip, volume: f32) {
        let id = id.into();
        match self.backend.create_voice(&id) {
            Ok(voice) => {
                self.loops.insert(
                    id,
                    LoopChannel {
                        clip,
                        voice,
                        volume,
                        pitch: 1.0,
                    },
                );
            }
            Err(e) => log::warn!("Could not create loop voice for {}: {}", id, e),
        }
    }

    pub fn set_fade_out_speed(&mut self, speed: f32) {
        self.fade_out_speed = speed;
    }

    /// Play non-spatially; the handle returns to the pool when the clip ends.
    pub fn play(&mut self, id: &str) -> Option<HandleKey> {
        self.play_mode(id, Mode::Flat)
    }

    /// Play non-spatially, fading out at the registry's fade-out speed.
    pub fn play_fading(&mut self, id: &str) -> Option<HandleKey> {
        self.play_mode(id, Mode::Fading)
    }

    /// Play attached to an entity until the clip ends or the entity is gone.
    pub fn play_follow(
        &mut self,
        id: &str,
        target: Entity,
        targets: &dyn TargetPositions,
    ) -> Option<HandleKey> {
        if !self.effects.contains_key(id) {
            log::warn!("No sound with ID {}", id);
            return None;
        }
        let Some(position) = targets.target_position(target) else {
            log::warn!("No target to follow for {}", id);
            return None;
        };
        self.play_mode(id, Mode::Follow(target, position))
    }

    /// Play from a fixed world position.
    pub fn play_at(&mut self, id: &str, point: Vec3) -> Option<HandleKey> {
        self.play_mode(id, Mode::At(point))
    }

    fn play_mode(&mut self, id: &str, mode: Mode) -> Option<HandleKey> {
        let (sound_id, clip, volume) = self.resolve(id)?;
        let settings = VoiceSettings {
            volume,
            fade_out_speed: self.fade_out_speed,
        };
        let key = match self.pool.acquire(&sound_id, settings, &mut self.backend) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("Could not get a voice for {}: {}", id, e);
                return None;
            }
        };

        let handle = self.pool.get_mut(key)?;
        let started = match mode {
            Mode::Flat => handle.play_flat(&mut self.backend, &clip),
            Mode::Fading => handle.play_one_shot(&mut self.backend, &clip),
            Mode::Follow(target, position) => {
                handle.play_follow(&mut self.backend, &clip, target, position)
            }
            Mode::At(point) => handle.play_at_position(&mut self.backend, &clip, point),
        };
        if let Err(e) = started {
            log::warn!("Could not play {}: {}", id, e);
            self.pool.release(key, &mut self.backend);
            return None;
        }
        Some(key)
    }

    /// Look up the id and pick the clip to play.
    fn resolve(&mut self, id: &str) -> Option<(SoundId, B::Clip, f32)> {
        let Some((sound_id, source)) = self.effects.get_key_value(id) else {
            log::warn!("No sound with ID {}", id);
            return None;
        };
        let mut clip = source.clip.clone();
        if let Some(group) = self.variants.get(id) {
            log::debug!("randomizing: {}", id);
            if group.is_empty() {
                log::warn!("Randomizer has no clips to pick from, ID: {}", id);
                return None;
            }
            clip = group[self.rng.gen_range(0..group.len())].clone();
        }
        Some((sound_id.clone(), clip, source.volume))
    }

    /// Start a loop unless it is already playing.
    pub fn play_loop(&mut self, id: &str) {
        let Some(channel) = self.loops.get_mut(id) else {
            log::warn!("No sound with ID {}", id);
            return;
        };
        if self.backend.is_playing(&channel.voice) {
            return;
        }
        let request = PlayRequest::new(&channel.clip, Placement::NonSpatial, channel.volume)
            .looping(channel.pitch);
        if let Err(e) = self.backend.start(&mut channel.voice, request) {
            log::warn!("Could not start loop {}: {}", id, e);
        }
    }

    pub fn stop_loop(&mut self, id: &str) {
        let Some(channel) = self.loops.get_mut(id) else {
            log::warn!("No sound with ID {}", id);
            return;
        };
        self.backend.stop(&mut channel.voice);
    }

    /// Set a loop's pitch, clamped to `[MIN_PITCH, MAX_PITCH]`.
    pub fn adjust_pitch(&mut self, id: &str, pitch: f32) {
        let Some(channel) = self.loops.get_mut(id) else {
            log::warn!("No sound with ID {}", id);
            return;
        };
        channel.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        self.backend.set_pitch(&mut channel.voice, channel.pitch);
    }

    pub fn loop_pitch(&self, id: &str) -> Option<f32> {
        self.loops.get(id).map(|c| c.pitch)
    }

    pub fn is_loop_playing(&self, id: &str) -> bool {
        self.loops
            .get(id)
            .is_some_and(|c| self.backend.is_playing(&c.voice))
    }

    /// Advance backend and handles; finished handles go back to the pool.
    pub fn update(&mut self, dt: f32, targets: &dyn TargetPositions) {
        self.backend.update(dt);
        self.pool.tick(dt, &mut self.backend, targets);
    }

    /// Registered effect ids, sorted.
    pub fn loaded_ids(&self) -> Vec<&SoundId> {
        let mut ids: Vec<_> = self.effects.keys().collect();
        ids.sort();
        ids
    }

    pub fn pool(&self) -> &AudioPlaybackPool<B::Voice> {
        &self.pool
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandleStatus, PlaybackState, SilentBackend, SilentClip};
    use engine_core::{Transform, World};

    fn registry() -> SoundRegistry<SilentBackend> {
        let mut registry = SoundRegistry::with_seed(SilentBackend::default(), 7);
        registry.register_effect("laser", SilentClip::new(0.5), 0.8);
        registry.register_loop("engine", SilentClip::new(2.0), 0.4);
        registry
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let mut registry = registry();
        assert!(registry.play("nope").is_none());
        assert!(registry.play_at("nope", Vec3::ZERO).is_none());
        registry.play_loop("nope");
        registry.stop_loop("nope");
        registry.adjust_pitch("nope", 2.0);
        assert!(registry.pool().is_empty());
        assert_eq!(registry.backend().total_starts(), 0);
    }

    #[test]
    fn play_modes_select_handle_state() {
        let mut registry = registry();
        let mut world = World::new();
        let ship = world.spawn((Transform::from_position(Vec3::X),));

        let flat = registry.play("laser").unwrap();
        let fading = registry.play_fading("laser").unwrap();
        let fixed = registry.play_at("laser", Vec3::Y).unwrap();
        let follow = registry.play_follow("laser", ship, &world).unwrap();

        let pool = registry.pool();
        assert_eq!(pool.get(flat).unwrap().state(), PlaybackState::Flat);
        assert_eq!(pool.get(fading).unwrap().state(), PlaybackState::Fadeable);
        assert_eq!(pool.get(fixed).unwrap().state(), PlaybackState::Fixed { point: Vec3::Y });
        assert_eq!(pool.get(follow).unwrap().state(), PlaybackState::Follow { target: ship });
        assert_eq!(pool.active_count(), 4);

        let voice = pool.get(follow).unwrap().voice();
        assert_eq!(registry.backend().voice_state(voice).unwrap().position, Some(Vec3::X));
    }

    #[test]
    fn plain_play_outlasts_the_fade_window() {
        let mut registry = registry();
        let world = World::new();
        let whole = registry.play("laser").unwrap();
        let fading = registry.play_fading("laser").unwrap();

        registry.update(0.2, &world);
        assert_eq!(registry.pool().status(whole), Some(HandleStatus::Active));
        assert_eq!(registry.pool().status(fading), Some(HandleStatus::Idle));

        registry.update(0.4, &world);
        assert_eq!(registry.pool().status(whole), Some(HandleStatus::Idle));
        assert!(registry.pool().check_invariants());
    }

    #[test]
    fn follow_without_target_is_a_no_op() {
        let mut registry = registry();
        let mut world = World::new();
        let gone = world.spawn((Transform::default(),));
        world.despawn(gone).unwrap();
        assert!(registry.play_follow("laser", gone, &world).is_none());
        assert!(registry.pool().is_empty());
    }

    #[test]
    fn empty_variant_group_plays_nothing() {
        let mut registry = registry();
        let world = World::new();
        let key = registry.play_at("laser", Vec3::ZERO).unwrap();
        registry.backend_mut().update(1.0);
        registry.update(0.0, &world);
        assert_eq!(registry.pool().free_count(&SoundId::from("laser")), 1);

        registry.register_variants("laser", Vec::new());
        let starts = registry.backend().total_starts();
        assert!(registry.play("laser").is_none());
        assert_eq!(registry.backend().total_starts(), starts);
        assert_eq!(registry.pool().free_count(&SoundId::from("laser")), 1);
        assert_eq!(registry.pool().status(key), Some(HandleStatus::Idle));
    }

    #[test]
    fn variants_replace_the_base_clip() {
        let mut registry = registry();
        let variants = vec![SilentClip::new(3.0), SilentClip::new(4.0)];
        registry.register_variants("laser", variants.clone());
        for _ in 0..10 {
            let key = registry.play("laser").unwrap();
            let voice = registry.pool().get(key).unwrap().voice();
            let clip = registry.backend().voice_state(voice).unwrap().clip.unwrap();
            assert!(variants.contains(&clip));
        }
    }

    #[test]
    fn finished_sounds_return_to_pool_and_are_reused() {
        let mut registry = registry();
        let world = World::new();
        let first = registry.play_at("laser", Vec3::ZERO).unwrap();
        registry.update(0.6, &world);
        assert_eq!(registry.pool().status(first), Some(HandleStatus::Idle));
        let second = registry.play_at("laser", Vec3::ONE).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.pool().len(), 1);
    }

    #[test]
    fn loop_starts_once_and_stops() {
        let mut registry = registry();
        registry.play_loop("engine");
        registry.play_loop("engine");
        assert!(registry.is_loop_playing("engine"));
        assert_eq!(registry.backend().total_starts(), 1);
        registry.stop_loop("engine");
        assert!(!registry.is_loop_playing("engine"));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut registry = registry();
        registry.adjust_pitch("engine", 7.5);
        assert_eq!(registry.loop_pitch("engine"), Some(MAX_PITCH));
        registry.adjust_pitch("engine", -10.0);
        assert_eq!(registry.loop_pitch("engine"), Some(MIN_PITCH));
        registry.adjust_pitch("engine", 1.5);
        assert_eq!(registry.loop_pitch("engine"), Some(1.5));
    }

    #[test]
    fn manifest_registers_effects_and_loops() {
        let manifest = AudioManifest::from_ron(
            r#"(
                fade_out_speed: 4.0,
                effects: [(id: "b", path: "b.ogg"), (id: "a", path: "a.ogg", variants: Some([]))],
                loops: [(id: "engine", path: "engine.ogg")],
            )"#,
        )
        .unwrap();
        let mut registry =
            SoundRegistry::from_manifest(SilentBackend::new(0.5), &manifest, Path::new("assets"));
        let ids: Vec<&str> = registry.loaded_ids().into_iter().map(SoundId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(registry.play("a").is_none());
        assert!(registry.play("b").is_some());
        registry.play_loop("engine");
        assert!(registry.is_loop_playing("engine"));
    }
}
