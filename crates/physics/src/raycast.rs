//! Raycasting for weapon hit detection and projectile sweeps.

use crate::{HitMask, PhysicsWorld};
use engine_core::{Entity, Ray, Vec3};
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Entity attached to the collider, if any.
    pub entity: Option<Entity>,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// A ray test against the world.
#[derive(Debug, Clone, Copy)]
pub struct RayQuery {
    pub ray: Ray,
    pub max_distance: f32,
    pub mask: HitMask,
    /// Body whose colliders are ignored (the shooter).
    pub exclude_body: Option<RigidBodyHandle>,
}

impl RayQuery {
    pub fn new(ray: Ray, max_distance: f32, mask: HitMask) -> Self {
        Self {
            ray,
            max_distance,
            mask,
            exclude_body: None,
        }
    }

    pub fn excluding(mut self, body: Option<RigidBodyHandle>) -> Self {
        self.exclude_body = body;
        self
    }
}

/// Something that answers ray queries.
pub trait Raycaster {
    /// First hit along the ray, sensors ignored.
    fn cast(&self, query: &RayQuery) -> Option<RaycastHit>;
}

impl Raycaster for PhysicsWorld {
    fn cast(&self, query: &RayQuery) -> Option<RaycastHit> {
        let origin = query.ray.origin;
        let direction = query.ray.direction;
        let ray = rapier3d::prelude::Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let mut filter = QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(Group::ALL, query.mask.to_group()));
        if let Some(body) = query.exclude_body {
            filter = filter.exclude_rigid_body(body);
        }

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                query.max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    entity: self.collider_entity(collider),
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionGroup;
    use engine_core::World;

    fn world_with_target(at: Vec3) -> (PhysicsWorld, Entity, RigidBodyHandle) {
        let mut world = World::new();
        let entity = world.spawn(());
        let mut physics = PhysicsWorld::new();
        let body = physics.add_static_body(at);
        physics.add_sphere_collider(body, 1.0, CollisionGroup::enemy(), Some(entity));
        physics.update_query_pipeline();
        (physics, entity, body)
    }

    #[test]
    fn cast_hits_tagged_target() {
        let (physics, entity, _) = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        let query = RayQuery::new(Ray::new(Vec3::ZERO, -Vec3::Z), 100.0, HitMask::ALL);
        let hit = physics.cast(&query).expect("should hit");
        assert_eq!(hit.entity, Some(entity));
        assert!((hit.distance - 9.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::Z).length() < 1e-3);
    }

    #[test]
    fn cast_respects_mask_range_and_exclusion() {
        let (physics, _, body) = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let wrong_mask = HitMask::from_groups(&[CollisionGroup::Environment]);
        assert!(physics.cast(&RayQuery::new(ray, 100.0, wrong_mask)).is_none());
        assert!(physics.cast(&RayQuery::new(ray, 5.0, HitMask::ALL)).is_none());
        let excluded = RayQuery::new(ray, 100.0, HitMask::ALL).excluding(Some(body));
        assert!(physics.cast(&excluded).is_none());
    }
}
