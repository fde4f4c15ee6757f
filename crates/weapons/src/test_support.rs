//! Shared fixtures for weapon tests.

use crate::{FireContext, WeaponOwner};
use engine_core::{AimCamera, Entity, Health, Vec3, World};
use physics::{CollisionGroup, PhysicsWorld};
use rand::{rngs::StdRng, SeedableRng};

pub(crate) struct Rig {
    pub world: World,
    pub physics: PhysicsWorld,
    pub camera: AimCamera,
    pub rng: StdRng,
    pub owner: WeaponOwner,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            physics: PhysicsWorld::new(),
            camera: AimCamera::new(Vec3::ZERO),
            rng: StdRng::seed_from_u64(42),
            owner: WeaponOwner::default(),
        }
    }

    /// Static sphere target of radius 1 carrying `health`.
    pub fn add_target(&mut self, at: Vec3, health: f32) -> Entity {
        let entity = self.world.spawn((Health::new(health),));
        let body = self.physics.add_static_body(at);
        self.physics
            .add_sphere_collider(body, 1.0, CollisionGroup::enemy(), Some(entity));
        self.physics.update_query_pipeline();
        entity
    }

    /// Give the owner a ship body with a hull around the origin.
    pub fn add_owner_hull(&mut self, radius: f32) {
        let entity = self.world.spawn((Health::new(100.0),));
        let body = self.physics.add_ship_body(Vec3::ZERO);
        self.physics
            .add_sphere_collider(body, radius, CollisionGroup::ship(), Some(entity));
        self.physics.update_query_pipeline();
        self.owner.body = Some(body);
    }

    pub fn health(&self, entity: Entity) -> f32 {
        self.world
            .get::<&Health>(entity)
            .map(|h| h.current)
            .unwrap_or(f32::NAN)
    }

    pub fn ctx(&mut self, now: f32) -> FireContext<'_> {
        FireContext {
            now,
            world: &mut self.world,
            raycaster: &self.physics,
            aim: Some(&self.camera),
            owner: self.owner,
            rng: &mut self.rng,
        }
    }
}
