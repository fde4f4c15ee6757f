//! Collision groups, hit masks and filtering.

use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionGroup {
    /// Static environment (walls, asteroids, mine tunnels)
    Environment = 1 << 0,
    /// The player's ship
    Ship = 1 << 1,
    /// Enemy drones and targets
    Enemy = 1 << 2,
    /// Projectiles fired by the ship
    ShipProjectile = 1 << 3,
    /// Projectiles fired by enemies
    EnemyProjectile = 1 << 4,
    /// Triggers and sensors
    Trigger = 1 << 5,
}

impl CollisionGroup {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Create a collision group that collides with everything.
    pub fn all() -> Group {
        Group::ALL
    }

    /// Membership and filter for static environment.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment.bits());
        (membership, Group::ALL)
    }

    /// Membership and filter for the player ship.
    pub fn ship() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Ship.bits());
        let filter = Group::from_bits_retain(
            Self::Environment.bits() | Self::Enemy.bits() | Self::EnemyProjectile.bits(),
        );
        (membership, filter)
    }

    /// Membership and filter for enemies.
    pub fn enemy() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Enemy.bits());
        let filter = Group::from_bits_retain(
            Self::Environment.bits()
                | Self::Ship.bits()
                | Self::ShipProjectile.bits()
                | Self::Enemy.bits(),
        );
        (membership, filter)
    }

    pub fn interaction_groups((membership, filter): (Group, Group)) -> InteractionGroups {
        InteractionGroups::new(membership, filter)
    }
}

/// Bit mask of [`CollisionGroup`]s a weapon or projectile may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitMask(pub u32);

impl HitMask {
    pub const ALL: HitMask = HitMask(u32::MAX);
    pub const NONE: HitMask = HitMask(0);

    pub fn from_groups(groups: &[CollisionGroup]) -> Self {
        HitMask(groups.iter().fold(0, |acc, g| acc | g.bits()))
    }

    pub fn contains(self, group: CollisionGroup) -> bool {
        self.0 & group.bits() != 0
    }

    pub fn to_group(self) -> Group {
        Group::from_bits_retain(self.0)
    }
}

impl Default for HitMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_mask_from_groups() {
        let mask = HitMask::from_groups(&[CollisionGroup::Enemy, CollisionGroup::Environment]);
        assert!(mask.contains(CollisionGroup::Enemy));
        assert!(mask.contains(CollisionGroup::Environment));
        assert!(!mask.contains(CollisionGroup::Ship));
        assert_eq!(HitMask::from_groups(&[]), HitMask::NONE);
    }
}
