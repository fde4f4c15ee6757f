//! Muzzles: where shots leave the ship, and which of them fire.

use engine_core::{AimSource, Ray, Transform, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A muzzle in the owner's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub local: Transform,
    /// Screen-space aim offset in viewport fractions; `(-0.2, 0)` fans left.
    pub aim_offset: Vec2,
}

impl Muzzle {
    pub fn new(position: Vec3) -> Self {
        Self {
            local: Transform::from_position(position),
            aim_offset: Vec2::ZERO,
        }
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.local = Transform::looking_along(self.local.position, forward);
        self
    }

    pub fn with_aim_offset(mut self, offset: Vec2) -> Self {
        self.aim_offset = offset;
        self
    }

    /// Muzzle pose in world space for an owner at `owner`.
    pub fn world_transform(&self, owner: &Transform) -> Transform {
        owner.mul_transform(&self.local)
    }

    /// The ray this muzzle shoots along. A non-zero offset is re-projected
    /// through the aim source; without one the shared aim ray is used as is.
    pub fn aim_ray(&self, aim: Ray, source: Option<&dyn AimSource>) -> Ray {
        match source {
            Some(source) if self.aim_offset != Vec2::ZERO => source.offset_ray(self.aim_offset),
            _ => aim,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    /// Every muzzle fires on every call.
    #[default]
    Simultaneous,
    /// One muzzle per call, round-robin.
    Sequential,
}

/// Ordered muzzles plus the round-robin cursor for sequential fire.
#[derive(Debug, Clone, PartialEq)]
pub struct MuzzleSet {
    muzzles: Vec<Muzzle>,
    mode: FireMode,
    next: usize,
}

impl MuzzleSet {
    pub fn new(muzzles: Vec<Muzzle>, mode: FireMode) -> Self {
        Self {
            muzzles,
            mode,
            next: 0,
        }
    }

    pub fn single(muzzle: Muzzle) -> Self {
        Self::new(vec![muzzle], FireMode::Simultaneous)
    }

    pub fn mode(&self) -> FireMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.muzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.muzzles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Muzzle> {
        self.muzzles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Muzzle> {
        self.muzzles.iter()
    }

    /// Indices of the muzzles that fire on this call. Advances the
    /// sequential cursor so the k-th call fires muzzle `k mod len`.
    pub fn select(&mut self) -> Vec<usize> {
        if self.muzzles.is_empty() {
            return Vec::new();
        }
        match self.mode {
            FireMode::Simultaneous => (0..self.muzzles.len()).collect(),
            FireMode::Sequential => {
                let index = self.next % self.muzzles.len();
                self.next = (index + 1) % self.muzzles.len();
                vec![index]
            }
        }
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::AimCamera;

    fn three() -> Vec<Muzzle> {
        vec![
            Muzzle::new(Vec3::new(-1.0, 0.0, 0.0)),
            Muzzle::new(Vec3::ZERO),
            Muzzle::new(Vec3::new(1.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn sequential_cycles_round_robin() {
        let mut set = MuzzleSet::new(three(), FireMode::Sequential);
        let picked: Vec<usize> = (0..7).flat_map(|_| set.select()).collect();
        assert_eq!(picked, vec![0, 1, 2, 0, 1, 2, 0]);

        set.reset();
        assert_eq!(set.select(), vec![0]);
    }

    #[test]
    fn simultaneous_fires_all_and_empty_fires_none() {
        let mut set = MuzzleSet::new(three(), FireMode::Simultaneous);
        assert_eq!(set.select(), vec![0, 1, 2]);
        assert_eq!(set.select(), vec![0, 1, 2]);

        let mut empty = MuzzleSet::new(Vec::new(), FireMode::Sequential);
        assert!(empty.select().is_empty());
    }

    #[test]
    fn world_transform_follows_owner() {
        let muzzle = Muzzle::new(Vec3::new(1.0, 0.0, -2.0));
        let owner = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        let world = muzzle.world_transform(&owner);
        assert!((world.position - Vec3::new(1.0, 5.0, -2.0)).length() < 1e-5);
        assert!((world.forward() - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn offset_only_used_with_aim_source() {
        let camera = AimCamera::new(Vec3::ZERO);
        let source: &dyn AimSource = &camera;
        let aim = camera.forward_ray();
        let centred = Muzzle::new(Vec3::ZERO);
        let left = Muzzle::new(Vec3::ZERO).with_aim_offset(Vec2::new(-0.2, 0.0));

        assert_eq!(centred.aim_ray(aim, Some(source)), aim);
        assert_eq!(left.aim_ray(aim, None), aim);
        let fanned = left.aim_ray(aim, Some(source));
        assert!(fanned.direction.x < -0.01);
    }
}
