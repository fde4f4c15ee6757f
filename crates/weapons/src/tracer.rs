//! Beam tracers drawn from a muzzle to where the shot ended.

use engine_core::{Transform, Vec3, World};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Longest fade applied at the end of a tracer's life.
pub const MAX_TRACER_FADE: f32 = 0.25;

/// Which way a curved tracer bows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ArcDirection {
    /// Owner's local up.
    #[default]
    Up,
    /// Owner's local right.
    Right,
    /// Fixed world-space direction.
    World(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerArc {
    pub height: f32,
    pub direction: ArcDirection,
    /// Per-shot random offset of the control point, per axis.
    pub jitter: f32,
}

impl Default for TracerArc {
    fn default() -> Self {
        Self {
            height: 0.5,
            direction: ArcDirection::Up,
            jitter: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerStyle {
    pub width: f32,
    pub lifetime: f32,
    /// Straight beam when `None`, quadratic Bézier otherwise.
    pub arc: Option<TracerArc>,
}

impl Default for TracerStyle {
    fn default() -> Self {
        Self {
            width: 0.08,
            lifetime: 0.1,
            arc: None,
        }
    }
}

/// Tracer component. Lives on its own entity and is despawned once faded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    pub start: Vec3,
    pub end: Vec3,
    /// Bézier control point for arcing tracers.
    pub control: Option<Vec3>,
    pub base_width: f32,
    pub width: f32,
    pub alpha: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Tracer {
    pub fn straight(start: Vec3, end: Vec3, width: f32, lifetime: f32) -> Self {
        Self {
            start,
            end,
            control: None,
            base_width: width,
            width,
            alpha: 1.0,
            age: 0.0,
            lifetime,
        }
    }

    pub fn new(
        start: Vec3,
        end: Vec3,
        style: &TracerStyle,
        owner: &Transform,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut tracer = Self::straight(start, end, style.width, style.lifetime);
        if let Some(arc) = style.arc {
            let bow = match arc.direction {
                ArcDirection::Up => owner.up(),
                ArcDirection::Right => owner.right(),
                ArcDirection::World(dir) => dir.normalize_or_zero(),
            };
            let mut control = (start + end) * 0.5 + bow * arc.height;
            if arc.jitter > 0.0 {
                let j = arc.jitter;
                control += Vec3::new(
                    rng.gen_range(-j..=j),
                    rng.gen_range(-j..=j),
                    rng.gen_range(-j..=j),
                );
            }
            tracer.control = Some(control);
        }
        tracer
    }

    /// Length of the closing fade.
    pub fn fade_duration(&self) -> f32 {
        MAX_TRACER_FADE.min(self.lifetime * 0.5)
    }

    /// Point on the tracer path at `t` in `0..=1`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match self.control {
            None => self.start.lerp(self.end, t),
            Some(c) => {
                let u = 1.0 - t;
                self.start * (u * u) + c * (2.0 * u * t) + self.end * (t * t)
            }
        }
    }

    /// Evenly spaced path samples for line rendering; at least the endpoints.
    pub fn samples(&self, segments: usize) -> Vec<Vec3> {
        let segments = if self.control.is_some() { segments.max(1) } else { 1 };
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Age the tracer. Returns true once it should be removed.
    pub fn update(&mut self, dt: f32) -> bool {
        self.age += dt;
        if self.age >= self.lifetime {
            self.alpha = 0.0;
            self.width = 0.0;
            return true;
        }
        let fade = self.fade_duration();
        let fade_start = self.lifetime - fade;
        if fade > 0.0 && self.age > fade_start {
            self.alpha = (1.0 - (self.age - fade_start) / fade).clamp(0.0, 1.0);
            self.width = self.base_width * self.alpha;
        }
        false
    }
}

/// Fade all tracers and despawn the finished ones.
pub fn update_tracers(world: &mut World, dt: f32) {
    let mut finished = Vec::new();
    for (entity, tracer) in world.query_mut::<&mut Tracer>() {
        if tracer.update(dt) {
            finished.push(entity);
        }
    }
    for entity in finished {
        world.despawn(entity).ok();
    }
}
