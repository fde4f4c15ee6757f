//! Weapon slots, switching and per-frame firing.

use crate::{FireContext, FireOutcome, Weapon};
use engine_core::{Quat, Ray, Vec3};
use input::WeaponInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerSettings {
    /// Aim smoothing rate `k`; zero or negative snaps to the camera.
    pub aim_smoothing: f32,
    /// Fire while the analog level is held instead of on press.
    pub hold_to_fire: bool,
    pub fire_hold_threshold: f32,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            aim_smoothing: 8.0,
            hold_to_fire: true,
            fire_hold_threshold: 0.5,
        }
    }
}

/// Exponentially smoothed aim direction, decoupled from camera sway.
#[derive(Debug, Clone, Copy, Default)]
pub struct AimSmoother {
    pub rate: f32,
    direction: Option<Vec3>,
}

impl AimSmoother {
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            direction: None,
        }
    }

    pub fn direction(&self) -> Option<Vec3> {
        self.direction
    }

    /// Move the smoothed direction toward `raw` by `1 - exp(-k·dt)` along
    /// the unit sphere. The origin always tracks the raw ray.
    /// A zero raw direction holds the last smoothed direction.
    pub fn update(&mut self, raw: Ray, dt: f32) -> Ray {
        let target = raw.direction;
        if target.length_squared() == 0.0 {
            return Ray::new(raw.origin, self.direction.unwrap_or(Vec3::ZERO));
        }
        let smoothed = match self.direction {
            Some(current) if self.rate > 0.0 => {
                let t = 1.0 - (-self.rate * dt).exp();
                let arc = Quat::from_rotation_arc(current, target);
                (Quat::IDENTITY.slerp(arc, t) * current).normalize_or_zero()
            }
            _ => target,
        };
        self.direction = Some(smoothed);
        Ray::new(raw.origin, smoothed)
    }

    pub fn reset(&mut self) {
        self.direction = None;
    }
}

/// Ordered weapon slots with at most one active weapon.
#[derive(Debug, Clone, Default)]
pub struct WeaponManager {
    weapons: Vec<Weapon>,
    current: usize,
    pub settings: ManagerSettings,
    smoother: AimSmoother,
    aim: Option<Ray>,
}

impl WeaponManager {
    pub fn new(settings: ManagerSettings) -> Self {
        Self {
            weapons: Vec::new(),
            current: 0,
            settings,
            smoother: AimSmoother::new(settings.aim_smoothing),
            aim: None,
        }
    }

    /// Build a manager from a loadout; the first weapon starts equipped.
    pub fn with_weapons(settings: ManagerSettings, weapons: Vec<Weapon>) -> Self {
        let mut manager = Self::new(settings);
        for weapon in weapons {
            manager.add_weapon(weapon);
        }
        manager
    }

    pub fn weapon_count(&self) -> usize {
        self.weapons.len()
    }

    /// Index of the active weapon, `None` when there are no weapons.
    pub fn current_index(&self) -> Option<usize> {
        (!self.weapons.is_empty()).then_some(self.current)
    }

    pub fn current_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.current)
    }

    pub fn current_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.current)
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// Last smoothed aim ray.
    pub fn aim(&self) -> Option<Ray> {
        self.aim
    }

    pub fn add_weapon(&mut self, mut weapon: Weapon) {
        if self.weapons.is_empty() {
            self.current = 0;
            weapon.on_equip();
        }
        self.weapons.push(weapon);
    }

    pub fn remove_weapon(&mut self, index: usize) -> Option<Weapon> {
        if index >= self.weapons.len() {
            log::warn!(
                "Cannot remove weapon {index}: only {} equipped",
                self.weapons.len()
            );
            return None;
        }

        let was_active = index == self.current;
        let mut removed = self.weapons.remove(index);
        if was_active {
            removed.on_unequip();
        }

        if index < self.current {
            self.current -= 1;
        } else if self.current >= self.weapons.len() {
            self.current = self.weapons.len().saturating_sub(1);
        }

        if was_active {
            if let Some(next) = self.weapons.get_mut(self.current) {
                next.on_equip();
            }
        }
        Some(removed)
    }

    pub fn switch_to(&mut self, index: usize) {
        if index == self.current && index < self.weapons.len() {
            return;
        }
        if index >= self.weapons.len() {
            log::warn!(
                "Cannot switch to weapon {index}: only {} equipped",
                self.weapons.len()
            );
            return;
        }
        if let Some(current) = self.weapons.get_mut(self.current) {
            current.on_unequip();
        }
        self.current = index;
        self.weapons[index].on_equip();
        log::debug!("Switched to {}", self.weapons[index].name());
    }

    pub fn next_weapon(&mut self) {
        if self.weapons.len() < 2 {
            return;
        }
        self.switch_to((self.current + 1) % self.weapons.len());
    }

    pub fn previous_weapon(&mut self) {
        if self.weapons.len() < 2 {
            return;
        }
        let len = self.weapons.len();
        self.switch_to((self.current + len - 1) % len);
    }

    /// Fire the active weapon along `aim`. `None` when no weapon is equipped.
    pub fn fire_current(&mut self, aim: Ray, ctx: &mut FireContext) -> Option<FireOutcome> {
        let weapon = self.weapons.get_mut(self.current)?;
        Some(weapon.fire(aim, ctx))
    }

    /// Per-frame update: smooth the aim, handle switching, then fire.
    /// Skipped entirely when the context has no aim source.
    pub fn update(
        &mut self,
        dt: f32,
        input: &dyn WeaponInput,
        ctx: &mut FireContext,
    ) -> Option<FireOutcome> {
        let Some(source) = ctx.aim else {
            log::warn!("Weapon manager has no aim source");
            return None;
        };
        self.smoother.rate = self.settings.aim_smoothing;
        let aim = self.smoother.update(source.forward_ray(), dt);
        self.aim = Some(aim);

        if input.next_weapon_performed() {
            self.next_weapon();
        }
        if input.previous_weapon_performed() {
            self.previous_weapon();
        }

        let wants_fire = if self.settings.hold_to_fire {
            input.fire_level() >= self.settings.fire_hold_threshold
        } else {
            input.fire_performed()
        };
        if wants_fire {
            self.fire_current(aim, ctx)
        } else {
            None
        }
    }
}
