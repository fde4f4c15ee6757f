//! Data-driven weapon definitions.

use crate::{
    FireMode, HitScanWeapon, Muzzle, MuzzleSet, ProjectileWeapon, TracerStyle, Weapon, WeaponBase,
    DEFAULT_IMPACT_LIFETIME, DEFAULT_MAX_LIFETIME,
};
use engine_core::{Vec2, Vec3};
use physics::{CollisionGroup, HitMask};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WeaponConfigError {
    #[error("weapon '{name}': cooldown must be a non-negative number, got {value}")]
    InvalidCooldown { name: String, value: f32 },
    #[error("weapon '{name}': range must be positive, got {value}")]
    InvalidRange { name: String, value: f32 },
    #[error("weapon '{name}': projectile speed must be positive, got {value}")]
    InvalidSpeed { name: String, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuzzleSpec {
    pub position: Vec3,
    /// Local forward; defaults to the owner's forward.
    #[serde(default)]
    pub forward: Option<Vec3>,
    #[serde(default)]
    pub aim_offset: Vec2,
}

impl MuzzleSpec {
    pub fn to_muzzle(&self) -> Muzzle {
        let muzzle = Muzzle::new(self.position).with_aim_offset(self.aim_offset);
        match self.forward {
            Some(forward) => muzzle.with_forward(forward),
            None => muzzle,
        }
    }
}

fn default_cooldown() -> f32 {
    0.1
}
fn default_range() -> f32 {
    200.0
}
fn default_hitscan_damage() -> f32 {
    10.0
}
fn default_impact_lifetime() -> Option<f32> {
    Some(DEFAULT_IMPACT_LIFETIME)
}
fn default_speed() -> f32 {
    100.0
}
fn default_spawn_offset() -> f32 {
    0.5
}
fn default_projectile_damage() -> f32 {
    20.0
}
fn default_max_lifetime() -> f32 {
    DEFAULT_MAX_LIFETIME
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponKind {
    HitScan {
        #[serde(default = "default_range")]
        range: f32,
        #[serde(default = "default_hitscan_damage")]
        damage: f32,
        #[serde(default = "default_impact_lifetime")]
        impact_lifetime: Option<f32>,
        #[serde(default)]
        tracer: TracerStyle,
    },
    Projectile {
        #[serde(default = "default_speed")]
        speed: f32,
        #[serde(default = "default_spawn_offset")]
        spawn_offset: f32,
        #[serde(default = "default_projectile_damage")]
        damage: f32,
        #[serde(default = "default_max_lifetime")]
        max_lifetime: f32,
        #[serde(default)]
        effect_duration: f32,
    },
}

/// One weapon template as written in `config.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    #[serde(default = "default_cooldown")]
    pub cooldown: f32,
    /// Groups the weapon may hit; everything when omitted.
    #[serde(default)]
    pub hit_groups: Option<Vec<CollisionGroup>>,
    #[serde(default)]
    pub muzzles: Vec<MuzzleSpec>,
    #[serde(default)]
    pub fire_mode: FireMode,
    #[serde(default)]
    pub fire_sound: Option<String>,
    pub kind: WeaponKind,
}

impl Weapon {
    pub fn from_spec(spec: &WeaponSpec) -> Result<Self, WeaponConfigError> {
        if spec.cooldown.is_nan() || spec.cooldown < 0.0 {
            return Err(WeaponConfigError::InvalidCooldown {
                name: spec.name.clone(),
                value: spec.cooldown,
            });
        }

        let muzzles = MuzzleSet::new(
            spec.muzzles.iter().map(MuzzleSpec::to_muzzle).collect(),
            spec.fire_mode,
        );
        if muzzles.is_empty() {
            log::warn!("Weapon '{}' has no muzzles and will never emit shots", spec.name);
        }
        let mut base = WeaponBase::new(spec.name.clone(), spec.cooldown, muzzles);
        if let Some(groups) = &spec.hit_groups {
            base = base.with_hit_mask(HitMask::from_groups(groups));
        }
        if let Some(sound) = &spec.fire_sound {
            base = base.with_fire_sound(sound.clone());
        }

        match spec.kind {
            WeaponKind::HitScan {
                range,
                damage,
                impact_lifetime,
                tracer,
            } => {
                if range.is_nan() || range <= 0.0 {
                    return Err(WeaponConfigError::InvalidRange {
                        name: spec.name.clone(),
                        value: range,
                    });
                }
                Ok(HitScanWeapon::new(base, range, damage)
                    .with_impact_lifetime(impact_lifetime)
                    .with_tracer(tracer)
                    .into())
            }
            WeaponKind::Projectile {
                speed,
                spawn_offset,
                damage,
                max_lifetime,
                effect_duration,
            } => {
                if speed.is_nan() || speed <= 0.0 {
                    return Err(WeaponConfigError::InvalidSpeed {
                        name: spec.name.clone(),
                        value: speed,
                    });
                }
                let mut weapon = ProjectileWeapon::new(base, speed, damage);
                weapon.spawn_offset = spawn_offset;
                weapon.max_lifetime = max_lifetime;
                weapon.effect_duration = effect_duration;
                Ok(weapon.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADOUT: &str = r#"[
        (
            name: "twin laser",
            cooldown: 0.25,
            hit_groups: Some([Environment, Enemy]),
            muzzles: [
                (position: (-1.0, 0.0, 0.0), aim_offset: (-0.2, 0.0)),
                (position: (1.0, 0.0, 0.0), aim_offset: (0.2, 0.0)),
            ],
            fire_mode: Sequential,
            fire_sound: Some("laser"),
            kind: HitScan(range: 150.0, tracer: (arc: Some((height: 1.0)))),
        ),
        (
            name: "concussion",
            muzzles: [(position: (0.0, -0.5, 0.0))],
            kind: Projectile(speed: 60.0),
        ),
    ]"#;

    #[test]
    fn parses_loadout_with_defaults() {
        let specs: Vec<WeaponSpec> = ron::from_str(LOADOUT).unwrap();
        let weapons: Vec<Weapon> = specs.iter().map(|s| Weapon::from_spec(s).unwrap()).collect();

        match &weapons[0] {
            Weapon::HitScan(w) => {
                assert_eq!(w.range, 150.0);
                assert_eq!(w.damage, 10.0);
                assert_eq!(w.impact_lifetime, Some(2.0));
                assert_eq!(w.tracer.arc.map(|a| a.height), Some(1.0));
                assert_eq!(w.base.muzzles.len(), 2);
                assert_eq!(w.base.muzzles.mode(), FireMode::Sequential);
                assert!(w.base.hit_mask.contains(CollisionGroup::Enemy));
                assert!(!w.base.hit_mask.contains(CollisionGroup::Ship));
                assert_eq!(w.base.cooldown.duration(), 0.25);
            }
            other => panic!("expected hitscan, got {other:?}"),
        }
        assert_eq!(weapons[0].fire_sound(), Some("laser"));

        match &weapons[1] {
            Weapon::Projectile(w) => {
                assert_eq!(w.projectile_speed, 60.0);
                assert_eq!(w.max_lifetime, 10.0);
                assert_eq!(w.spawn_offset, 0.5);
                assert_eq!(w.base.cooldown.duration(), 0.1);
                assert_eq!(w.base.hit_mask, HitMask::ALL);
            }
            other => panic!("expected projectile, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_numbers() {
        let mut spec = WeaponSpec {
            name: "bad".into(),
            cooldown: -1.0,
            hit_groups: None,
            muzzles: Vec::new(),
            fire_mode: FireMode::Simultaneous,
            fire_sound: None,
            kind: WeaponKind::HitScan {
                range: 0.0,
                damage: 1.0,
                impact_lifetime: None,
                tracer: TracerStyle::default(),
            },
        };
        assert!(matches!(
            Weapon::from_spec(&spec),
            Err(WeaponConfigError::InvalidCooldown { .. })
        ));
        spec.cooldown = 0.0;
        assert!(matches!(
            Weapon::from_spec(&spec),
            Err(WeaponConfigError::InvalidRange { .. })
        ));
        spec.kind = WeaponKind::Projectile {
            speed: -5.0,
            spawn_offset: 0.0,
            damage: 1.0,
            max_lifetime: 1.0,
            effect_duration: 0.0,
        };
        let err = Weapon::from_spec(&spec).unwrap_err();
        assert_eq!(err.to_string(), "weapon 'bad': projectile speed must be positive, got -5");
    }
}
