//! Shared weapon state and the weapon variants.

use crate::{Cooldown, FireContext, FireOutcome, HitScanWeapon, MuzzleSet, ProjectileWeapon};
use engine_core::Ray;
use physics::HitMask;

/// State every weapon carries regardless of how it resolves shots.
#[derive(Debug, Clone)]
pub struct WeaponBase {
    pub name: String,
    pub cooldown: Cooldown,
    pub muzzles: MuzzleSet,
    pub hit_mask: HitMask,
    /// Sound played when a shot commits.
    pub fire_sound: Option<String>,
    active: bool,
}

impl WeaponBase {
    pub fn new(name: impl Into<String>, cooldown: f32, muzzles: MuzzleSet) -> Self {
        Self {
            name: name.into(),
            cooldown: Cooldown::new(cooldown),
            muzzles,
            hit_mask: HitMask::ALL,
            fire_sound: None,
            active: false,
        }
    }

    pub fn with_hit_mask(mut self, mask: HitMask) -> Self {
        self.hit_mask = mask;
        self
    }

    pub fn with_fire_sound(mut self, sound: impl Into<String>) -> Self {
        self.fire_sound = Some(sound.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn can_fire(&self, now: f32) -> bool {
        self.cooldown.can_fire(now)
    }

    /// Pass the cooldown gate and stamp it. Returns the muzzles to fire,
    /// or `None` while cooling down.
    pub(crate) fn commit(&mut self, now: f32) -> Option<Vec<usize>> {
        if !self.cooldown.can_fire(now) {
            return None;
        }
        self.cooldown.note_fire(now);
        let muzzles = self.muzzles.select();
        if muzzles.is_empty() {
            log::debug!("{} fired with no muzzles", self.name);
        }
        Some(muzzles)
    }

    pub fn on_equip(&mut self) {
        self.active = true;
        self.muzzles.reset();
        log::debug!("Equipped {}", self.name);
    }

    pub fn on_unequip(&mut self) {
        self.active = false;
        log::debug!("Unequipped {}", self.name);
    }
}

#[derive(Debug, Clone)]
pub enum Weapon {
    HitScan(HitScanWeapon),
    Projectile(ProjectileWeapon),
}

impl Weapon {
    pub fn base(&self) -> &WeaponBase {
        match self {
            Weapon::HitScan(w) => &w.base,
            Weapon::Projectile(w) => &w.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut WeaponBase {
        match self {
            Weapon::HitScan(w) => &mut w.base,
            Weapon::Projectile(w) => &mut w.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn fire_sound(&self) -> Option<&str> {
        self.base().fire_sound.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.base().is_active()
    }

    pub fn can_fire(&self, now: f32) -> bool {
        self.base().can_fire(now)
    }

    pub fn fire(&mut self, aim: Ray, ctx: &mut FireContext) -> FireOutcome {
        match self {
            Weapon::HitScan(w) => w.fire(aim, ctx),
            Weapon::Projectile(w) => w.fire(aim, ctx),
        }
    }

    pub fn on_equip(&mut self) {
        self.base_mut().on_equip();
    }

    pub fn on_unequip(&mut self) {
        self.base_mut().on_unequip();
    }
}

impl From<HitScanWeapon> for Weapon {
    fn from(weapon: HitScanWeapon) -> Self {
        Weapon::HitScan(weapon)
    }
}

impl From<ProjectileWeapon> for Weapon {
    fn from(weapon: ProjectileWeapon) -> Self {
        Weapon::Projectile(weapon)
    }
}
