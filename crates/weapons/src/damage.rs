//! Damage delivery to hit entities.

use engine_core::{Damageable, Entity, Health, World};

/// Apply damage to a target entity. Returns true if the target is now dead.
/// Entities without [`Health`] are not damageable and are left alone.
pub fn apply_damage(world: &mut World, target: Entity, amount: f32) -> bool {
    if let Ok(mut health) = world.get::<&mut Health>(target) {
        health.take_damage(amount);
        return health.is_dead();
    }
    false
}
