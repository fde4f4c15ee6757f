//! Sandbox configuration. Loaded from config.ron at startup.

use crate::camera_sway::SwaySettings;
use crate::enemy::TargetSpec;
use crate::script::ScriptStep;
use crate::ship::FlightSettings;
use engine_core::{Vec2, Vec3};
use physics::CollisionGroup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use weapons::{
    FireMode, ManagerSettings, MuzzleSpec, TracerArc, TracerStyle, WeaponKind, WeaponSpec,
};

/// Persistent sandbox settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Aim viewport in pixels.
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Frames simulated by the headless run.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Seconds per headless frame.
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    #[serde(default)]
    pub manager: ManagerSettings,
    /// Loadout, in slot order.
    #[serde(default = "default_weapons")]
    pub weapons: Vec<WeaponSpec>,
    #[serde(default)]
    pub flight: FlightSettings,
    #[serde(default)]
    pub sway: SwaySettings,
    /// RON sound manifest; paths inside are relative to the manifest.
    #[serde(default)]
    pub audio_manifest: Option<PathBuf>,
    /// Fixed seed for tracer jitter and sound variants; random when omitted.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Open the audio device instead of running silent.
    #[serde(default)]
    pub use_audio_device: bool,
    /// Output level for every sound, `0.0..=1.0`.
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
    /// Loop whose pitch follows ship speed.
    #[serde(default)]
    pub engine_loop: Option<String>,
    /// Played at every point a shot lands.
    #[serde(default)]
    pub impact_sound: Option<String>,
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetSpec>,
    /// Input played back by the headless run.
    #[serde(default = "default_script")]
    pub script: Vec<ScriptStep>,
}

fn default_viewport() -> (u32, u32) {
    (1280, 720)
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_master_volume() -> f32 {
    1.0
}

fn default_frames() -> u32 {
    600
}
fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

fn default_weapons() -> Vec<WeaponSpec> {
    vec![
        WeaponSpec {
            name: "Vulcan".into(),
            cooldown: 0.1,
            hit_groups: Some(vec![CollisionGroup::Environment, CollisionGroup::Enemy]),
            muzzles: vec![
                MuzzleSpec {
                    position: Vec3::new(-1.2, -0.3, -1.0),
                    forward: None,
                    aim_offset: Vec2::new(-0.2, 0.0),
                },
                MuzzleSpec {
                    position: Vec3::new(0.0, -0.4, -1.2),
                    forward: None,
                    aim_offset: Vec2::ZERO,
                },
                MuzzleSpec {
                    position: Vec3::new(1.2, -0.3, -1.0),
                    forward: None,
                    aim_offset: Vec2::new(0.2, 0.0),
                },
            ],
            fire_mode: FireMode::Simultaneous,
            fire_sound: Some("vulcan".into()),
            kind: WeaponKind::HitScan {
                range: 200.0,
                damage: 10.0,
                impact_lifetime: Some(2.0),
                tracer: TracerStyle {
                    arc: Some(TracerArc {
                        height: 0.6,
                        jitter: 0.2,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            },
        },
        WeaponSpec {
            name: "Concussion".into(),
            cooldown: 0.5,
            hit_groups: Some(vec![CollisionGroup::Environment, CollisionGroup::Enemy]),
            muzzles: vec![
                MuzzleSpec {
                    position: Vec3::new(-0.8, -0.5, -1.0),
                    forward: None,
                    aim_offset: Vec2::ZERO,
                },
                MuzzleSpec {
                    position: Vec3::new(0.8, -0.5, -1.0),
                    forward: None,
                    aim_offset: Vec2::ZERO,
                },
            ],
            fire_mode: FireMode::Sequential,
            fire_sound: Some("missile".into()),
            kind: WeaponKind::Projectile {
                speed: 80.0,
                spawn_offset: 0.5,
                damage: 30.0,
                max_lifetime: 10.0,
                effect_duration: 0.5,
            },
        },
    ]
}

fn default_targets() -> Vec<TargetSpec> {
    vec![
        TargetSpec::new(Vec3::new(0.0, 0.0, -40.0)),
        TargetSpec::new(Vec3::new(-12.0, 3.0, -60.0)),
        TargetSpec::new(Vec3::new(15.0, -4.0, -80.0)),
    ]
}

fn default_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep {
            frames: 60,
            translate: Vec2::new(0.0, 1.0),
            ..Default::default()
        },
        ScriptStep {
            frames: 120,
            fire: 1.0,
            ..Default::default()
        },
        ScriptStep {
            frames: 1,
            next_weapon: true,
            ..Default::default()
        },
        ScriptStep {
            frames: 180,
            fire: 1.0,
            rotate: Vec2::new(0.2, 0.0),
            ..Default::default()
        },
        ScriptStep {
            frames: 120,
            ..Default::default()
        },
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: default_viewport(),
            sensitivity: default_sensitivity(),
            frames: default_frames(),
            frame_dt: default_frame_dt(),
            manager: ManagerSettings::default(),
            weapons: default_weapons(),
            flight: FlightSettings::default(),
            sway: SwaySettings::default(),
            audio_manifest: None,
            seed: None,
            use_audio_device: false,
            master_volume: default_master_volume(),
            engine_loop: None,
            impact_sound: None,
            targets: default_targets(),
            script: default_script(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_ron(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::warn!("No config at {:?} ({}), using defaults", path, e),
        }
        Self::default()
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}
