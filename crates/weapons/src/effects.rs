//! Short-lived impact effects spawned where hitscan shots land.

use engine_core::{Entity, Lifetime, Transform, Vec3, World};

/// Default lifetime of an impact effect in seconds.
pub const DEFAULT_IMPACT_LIFETIME: f32 = 2.0;

/// Marker for an impact at a surface; the transform faces along the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEffect {
    pub point: Vec3,
    pub normal: Vec3,
}

pub fn spawn_impact(world: &mut World, point: Vec3, normal: Vec3, lifetime: f32) -> Entity {
    world.spawn((
        ImpactEffect { point, normal },
        Transform::looking_along(point, normal),
        Lifetime::new(lifetime),
    ))
}

/// Count down impact lifetimes and despawn the expired ones.
pub fn update_impacts(world: &mut World, dt: f32) {
    let mut expired = Vec::new();
    for (entity, (_, lifetime)) in world.query_mut::<(&ImpactEffect, &mut Lifetime)>() {
        if lifetime.update(dt) {
            expired.push(entity);
        }
    }
    for entity in expired {
        world.despawn(entity).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_faces_normal_and_expires() {
        let mut world = World::new();
        let impact = spawn_impact(&mut world, Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.5);
        {
            let transform = world.get::<&Transform>(impact).map(|t| *t).unwrap_or_default();
            assert!((transform.forward() - Vec3::Z).length() < 1e-5);
        }

        // Other lifetimes are not touched.
        let other = world.spawn((Lifetime::new(0.1),));

        update_impacts(&mut world, 0.25);
        assert!(world.contains(impact));
        update_impacts(&mut world, 0.25);
        assert!(!world.contains(impact));
        assert!(world.contains(other));
    }
}
