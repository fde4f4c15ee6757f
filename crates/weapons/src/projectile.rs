//! Weapons that launch travelling projectiles, and the projectile tick.

use crate::{apply_damage, FireContext, FireOutcome, Shot, ShotResult, WeaponBase};
use engine_core::{Entity, Lifetime, Ray, Transform, Velocity, Vec3, World};
use physics::{HitMask, RayQuery, Raycaster, RigidBodyHandle};

/// Projectiles self-destruct after this long unless configured otherwise.
pub const DEFAULT_MAX_LIFETIME: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct ProjectileWeapon {
    pub base: WeaponBase,
    pub projectile_speed: f32,
    /// Distance ahead of the muzzle where projectiles appear.
    pub spawn_offset: f32,
    pub damage: f32,
    pub max_lifetime: f32,
    /// How long a detonated projectile lingers before despawning.
    pub effect_duration: f32,
}

impl ProjectileWeapon {
    pub fn new(base: WeaponBase, projectile_speed: f32, damage: f32) -> Self {
        Self {
            base,
            projectile_speed,
            spawn_offset: 0.5,
            damage,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            effect_duration: 0.0,
        }
    }

    pub fn fire(&mut self, aim: Ray, ctx: &mut FireContext) -> FireOutcome {
        let Some(selected) = self.base.commit(ctx.now) else {
            return FireOutcome::CoolingDown;
        };

        let mut shots = Vec::with_capacity(selected.len());
        for index in selected {
            let Some(muzzle) = self.base.muzzles.get(index).copied() else {
                continue;
            };
            let direction = muzzle.aim_ray(aim, ctx.aim).direction;
            let muzzle_pose = muzzle.world_transform(&ctx.owner.transform);
            let spawn = muzzle_pose.position + muzzle_pose.forward() * self.spawn_offset;
            let velocity = direction * self.projectile_speed + ctx.owner.velocity;

            let entity = ctx.world.spawn((
                Transform::looking_along(spawn, direction),
                Velocity::new(velocity),
                Projectile {
                    damage: self.damage,
                    mask: self.base.hit_mask,
                    owner_body: ctx.owner.body,
                    effect_duration: self.effect_duration,
                    state: ProjectileState::Flying,
                },
                Lifetime::new(self.max_lifetime),
            ));
            log::debug!("{} launched {:?}", self.base.name, entity);

            shots.push(Shot {
                muzzle: index,
                origin: spawn,
                direction,
                result: ShotResult::Spawned(entity),
            });
        }
        FireOutcome::Fired(shots)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileState {
    Flying,
    /// Stopped at an impact; despawns when `remaining` runs out.
    Detonated { remaining: f32 },
}

/// Projectile component, paired with `Transform`, `Velocity` and `Lifetime`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub damage: f32,
    pub mask: HitMask,
    /// The shooter's body; its colliders are skipped by the sweep.
    pub owner_body: Option<RigidBodyHandle>,
    pub effect_duration: f32,
    pub state: ProjectileState,
}

/// A projectile struck something this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpact {
    pub projectile: Entity,
    pub target: Option<Entity>,
    pub damage: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Fixed-step projectile update: sweep each flying projectile along its
/// path segment, resolve impacts and retire finished projectiles.
pub fn update_projectiles(
    world: &mut World,
    raycaster: &dyn Raycaster,
    dt: f32,
) -> Vec<ProjectileImpact> {
    let mut impacts = Vec::new();
    let mut despawn = Vec::new();

    for (entity, (transform, velocity, projectile, lifetime)) in
        world.query_mut::<(&mut Transform, &mut Velocity, &mut Projectile, &mut Lifetime)>()
    {
        if lifetime.update(dt) {
            despawn.push(entity);
            continue;
        }

        match projectile.state {
            ProjectileState::Flying => {
                let step = velocity.linear * dt;
                let distance = step.length();
                if distance <= f32::EPSILON {
                    continue;
                }
                let query = RayQuery::new(Ray::new(transform.position, step), distance, projectile.mask)
                    .excluding(projectile.owner_body);
                match raycaster.cast(&query) {
                    Some(hit) => {
                        transform.position = hit.point;
                        velocity.linear = Vec3::ZERO;
                        impacts.push(ProjectileImpact {
                            projectile: entity,
                            target: hit.entity,
                            damage: projectile.damage,
                            point: hit.point,
                            normal: hit.normal,
                        });
                        if projectile.effect_duration > 0.0 {
                            projectile.state = ProjectileState::Detonated {
                                remaining: projectile.effect_duration,
                            };
                        } else {
                            despawn.push(entity);
                        }
                    }
                    None => transform.position += step,
                }
            }
            ProjectileState::Detonated { ref mut remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    despawn.push(entity);
                }
            }
        }
    }

    for impact in &impacts {
        if let Some(target) = impact.target {
            apply_damage(world, target, impact.damage);
        }
    }
    for entity in despawn {
        world.despawn(entity).ok();
    }
    impacts
}
