//! Shootable sample targets.

use engine_core::{Entity, Health, Transform, Vec3, World};
use physics::{CollisionGroup, PhysicsWorld, RigidBodyHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub position: Vec3,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_health")]
    pub health: f32,
    #[serde(default = "default_true")]
    pub destroy_on_death: bool,
}

fn default_radius() -> f32 {
    1.5
}
fn default_health() -> f32 {
    50.0
}
fn default_true() -> bool {
    true
}

impl TargetSpec {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: default_radius(),
            health: default_health(),
            destroy_on_death: true,
        }
    }
}

/// A static target; its collider is removed once it dies.
#[derive(Debug, Clone, Copy)]
pub struct SampleEnemy {
    pub destroy_on_death: bool,
    body: Option<RigidBodyHandle>,
}

impl SampleEnemy {
    pub fn is_alive(&self) -> bool {
        self.body.is_some()
    }
}

pub fn spawn_target(world: &mut World, physics: &mut PhysicsWorld, spec: &TargetSpec) -> Entity {
    let entity = world.spawn((Transform::from_position(spec.position), Health::new(spec.health)));
    let body = physics.add_static_body(spec.position);
    physics.add_sphere_collider(body, spec.radius, CollisionGroup::enemy(), Some(entity));
    world
        .insert_one(
            entity,
            SampleEnemy {
                destroy_on_death: spec.destroy_on_death,
                body: Some(body),
            },
        )
        .ok();
    entity
}

/// Retire dead targets: drop their colliders and despawn those flagged
/// `destroy_on_death`. Returns the targets that died this call.
pub fn reap_dead_targets(world: &mut World, physics: &mut PhysicsWorld) -> Vec<Entity> {
    let mut died = Vec::new();
    let mut despawn = Vec::new();
    for (entity, (enemy, health)) in world.query_mut::<(&mut SampleEnemy, &Health)>() {
        if !health.is_dead() {
            continue;
        }
        if let Some(body) = enemy.body.take() {
            physics.remove_body(body);
            died.push(entity);
            if enemy.destroy_on_death {
                despawn.push(entity);
            }
        }
    }
    for entity in despawn {
        world.despawn(entity).ok();
    }
    if !died.is_empty() {
        physics.update_query_pipeline();
    }
    died
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Ray;
    use physics::{HitMask, RayQuery, Raycaster};

    fn ray_hits(physics: &PhysicsWorld) -> bool {
        let query = RayQuery::new(Ray::new(Vec3::ZERO, -Vec3::Z), 100.0, HitMask::ALL);
        physics.cast(&query).is_some()
    }

    #[test]
    fn dead_target_is_despawned_and_stops_blocking() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let target = spawn_target(&mut world, &mut physics, &TargetSpec::new(Vec3::new(0.0, 0.0, -10.0)));
        physics.update_query_pipeline();
        assert!(ray_hits(&physics));

        assert!(reap_dead_targets(&mut world, &mut physics).is_empty());
        weapons::apply_damage(&mut world, target, 60.0);
        assert_eq!(reap_dead_targets(&mut world, &mut physics), vec![target]);
        assert!(!world.contains(target));
        assert!(!ray_hits(&physics));
    }

    #[test]
    fn kept_corpse_dies_once() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let spec = TargetSpec {
            destroy_on_death: false,
            ..TargetSpec::new(Vec3::new(0.0, 0.0, -10.0))
        };
        let target = spawn_target(&mut world, &mut physics, &spec);
        weapons::apply_damage(&mut world, target, 100.0);

        assert_eq!(reap_dead_targets(&mut world, &mut physics).len(), 1);
        assert!(reap_dead_targets(&mut world, &mut physics).is_empty());
        assert!(world.contains(target));
        let alive = world.get::<&SampleEnemy>(target).map(|e| e.is_alive()).unwrap_or(true);
        assert!(!alive);
    }
}
