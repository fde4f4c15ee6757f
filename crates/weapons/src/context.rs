//! Per-shot world access and fire outcomes.

use engine_core::{AimSource, Entity, Transform, Vec3, World};
use physics::{Raycaster, RigidBodyHandle};
use rand::RngCore;

/// The ship (or turret) a weapon is mounted on.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponOwner {
    pub transform: Transform,
    /// Inherited by projectiles.
    pub velocity: Vec3,
    /// Colliders of this body are never hit by the owner's own shots.
    pub body: Option<RigidBodyHandle>,
}

/// Everything a weapon touches while firing.
pub struct FireContext<'a> {
    /// Seconds since session start; drives cooldowns.
    pub now: f32,
    pub world: &'a mut World,
    pub raycaster: &'a dyn Raycaster,
    pub aim: Option<&'a dyn AimSource>,
    pub owner: WeaponOwner,
    pub rng: &'a mut dyn RngCore,
}

/// What a hitscan ray struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    Hit {
        point: Vec3,
        normal: Vec3,
        target: Option<Entity>,
    },
    Miss {
        endpoint: Vec3,
    },
}

impl HitResult {
    /// Where the tracer for this result ends.
    pub fn end_point(&self) -> Vec3 {
        match *self {
            HitResult::Hit { point, .. } => point,
            HitResult::Miss { endpoint } => endpoint,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, HitResult::Hit { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotResult {
    Ray(HitResult),
    Spawned(Entity),
}

/// One muzzle's contribution to a fire call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Index of the muzzle in the weapon's muzzle set.
    pub muzzle: usize,
    /// World-space muzzle position.
    pub origin: Vec3,
    pub direction: Vec3,
    pub result: ShotResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// The cooldown gate rejected the call; nothing happened.
    CoolingDown,
    /// The shot was committed. Empty when the weapon has no muzzles.
    Fired(Vec<Shot>),
}

impl FireOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, FireOutcome::Fired(_))
    }

    pub fn shots(&self) -> &[Shot] {
        match self {
            FireOutcome::CoolingDown => &[],
            FireOutcome::Fired(shots) => shots,
        }
    }
}
