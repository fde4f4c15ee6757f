//! The sandbox session: owns every system and runs one frame at a time.

use crate::camera_sway::CameraSway;
use crate::config::GameConfig;
use crate::enemy::{reap_dead_targets, spawn_target, SampleEnemy};
use crate::script::ScriptedInput;
use crate::ship::ShipController;
use anyhow::{Context, Result};
use audio::{AudioBackend, SoundRegistry};
use engine_core::{AimCamera, Entity, Health, Time, Transform, Vec3, Velocity, World};
use input::{FlightInput, WeaponInput};
use physics::{CollisionGroup, PhysicsWorld};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use weapons::{
    update_impacts, update_projectiles, update_tracers, FireContext, FireOutcome, HitResult,
    ShotResult, Weapon, WeaponManager, WeaponOwner,
};

/// Camera position in ship space.
const COCKPIT_MOUNT: Vec3 = Vec3::new(0.0, 0.3, 0.0);
const SHIP_RADIUS: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u32,
    pub shots: u32,
    pub hits: u32,
    pub projectile_impacts: u32,
    pub kills: u32,
}

pub struct GameSession<B: AudioBackend> {
    pub config: GameConfig,
    pub time: Time,
    pub world: World,
    pub physics: PhysicsWorld,
    pub camera: AimCamera,
    pub sway: CameraSway,
    pub ship: ShipController,
    pub ship_entity: Entity,
    pub weapons: WeaponManager,
    pub audio: SoundRegistry<B>,
    pub stats: SessionStats,
    rng: StdRng,
}

impl<B: AudioBackend> GameSession<B> {
    pub fn new(config: GameConfig, mut audio: SoundRegistry<B>) -> Result<Self> {
        let loadout = config
            .weapons
            .iter()
            .map(Weapon::from_spec)
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid weapon loadout")?;
        let weapons = WeaponManager::with_weapons(config.manager, loadout);

        let mut world = World::new();
        let mut physics = PhysicsWorld::new();

        let ship_body = physics.add_ship_body(Vec3::ZERO);
        let ship_entity = world.spawn((
            Transform::default(),
            Velocity::default(),
            Health::new(100.0),
        ));
        physics.add_sphere_collider(ship_body, SHIP_RADIUS, CollisionGroup::ship(), Some(ship_entity));
        let mut ship = ShipController::new(config.flight, ship_body);
        ship.sensitivity = config.sensitivity;

        for spec in &config.targets {
            spawn_target(&mut world, &mut physics, spec);
        }
        physics.update_query_pipeline();

        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let mut camera = AimCamera::new(COCKPIT_MOUNT);
        camera.set_viewport(config.viewport.0, config.viewport.1);

        audio.backend_mut().set_master_volume(config.master_volume);
        if let Some(id) = &config.engine_loop {
            audio.play_loop(id);
        }

        log::info!(
            "Session ready: {} weapons, {} targets",
            weapons.weapon_count(),
            config.targets.len()
        );

        Ok(Self {
            sway: CameraSway::new(config.sway, COCKPIT_MOUNT),
            config,
            time: Time::new(),
            world,
            physics,
            camera,
            ship,
            ship_entity,
            weapons,
            audio,
            stats: SessionStats::default(),
            rng,
        })
    }

    /// Targets still standing.
    pub fn targets_alive(&self) -> usize {
        self.world
            .query::<&SampleEnemy>()
            .iter()
            .filter(|(_, enemy)| enemy.is_alive())
            .count()
    }

    /// Run one frame: fixed physics steps, camera, weapons, effects, audio.
    pub fn frame<I: WeaponInput + FlightInput>(&mut self, dt: f32, input: &I) -> Option<FireOutcome> {
        self.time.advance(Duration::from_secs_f32(dt.max(0.0)));
        self.stats.frames += 1;

        while self.time.should_fixed_update() {
            self.fixed_step(input);
        }

        let ship_transform = self.ship.transform(&self.physics);
        let linear = self.physics.body_linear_velocity(self.ship.body);
        let angular = self.physics.body_angular_velocity(self.ship.body);
        self.camera.transform = self.sway.update(dt, &ship_transform, linear, angular);

        let mut ctx = FireContext {
            now: self.time.elapsed_seconds(),
            world: &mut self.world,
            raycaster: &self.physics,
            aim: Some(&self.camera),
            owner: WeaponOwner {
                transform: ship_transform,
                velocity: linear,
                body: Some(self.ship.body),
            },
            rng: &mut self.rng,
        };
        let outcome = self.weapons.update(dt, input, &mut ctx);

        if let Some(FireOutcome::Fired(shots)) = &outcome {
            self.stats.shots += 1;
            for shot in shots {
                if let ShotResult::Ray(HitResult::Hit { point, .. }) = shot.result {
                    self.stats.hits += 1;
                    if let Some(id) = &self.config.impact_sound {
                        self.audio.play_at(id, point);
                    }
                }
            }
            let sound = self
                .weapons
                .current_weapon()
                .and_then(Weapon::fire_sound)
                .map(str::to_owned);
            if let Some(sound) = sound {
                self.audio.play_follow(&sound, self.ship_entity, &self.world);
            }
        }

        update_tracers(&mut self.world, dt);
        update_impacts(&mut self.world, dt);
        self.reap();

        if let Some(id) = &self.config.engine_loop {
            let top_speed = self.config.flight.max_forward_speed.max(1.0);
            self.audio.adjust_pitch(id, 1.0 + linear.length() / top_speed * 0.5);
        }
        self.audio.backend_mut().set_listener(
            self.camera.position(),
            self.camera.forward(),
            self.camera.transform.up(),
        );
        self.audio.update(dt, &self.world);

        outcome
    }

    fn fixed_step(&mut self, input: &dyn FlightInput) {
        let dt = self.time.fixed_timestep_seconds();
        self.ship.fixed_update(input, &mut self.physics, dt);
        self.physics.step(dt);

        let transform = self.ship.transform(&self.physics);
        let linear = self.physics.body_linear_velocity(self.ship.body);
        if let Ok((t, v)) = self
            .world
            .query_one_mut::<(&mut Transform, &mut Velocity)>(self.ship_entity)
        {
            *t = transform;
            v.linear = linear;
        }

        let impacts = update_projectiles(&mut self.world, &self.physics, dt);
        for impact in &impacts {
            log::debug!("Projectile hit {:?} at {}", impact.target, impact.point);
            if let Some(id) = &self.config.impact_sound {
                self.audio.play_at(id, impact.point);
            }
        }
        self.stats.projectile_impacts += impacts.len() as u32;
        self.reap();
    }

    fn reap(&mut self) {
        for target in reap_dead_targets(&mut self.world, &mut self.physics) {
            log::info!("Target {:?} destroyed", target);
            self.stats.kills += 1;
        }
    }

    /// Play a script for `frames` frames of `dt` seconds.
    pub fn run(&mut self, script: &mut ScriptedInput, frames: u32, dt: f32) -> SessionStats {
        for frame in 0..frames {
            self.frame(dt, &*script);
            script.advance();
            if script.is_finished() && frame + 1 < frames {
                log::debug!("Script ended at frame {}, idling", frame + 1);
            }
        }
        log::info!(
            "Ran {} frames ({:.2}s): {} shots, {} hits, {} projectile impacts, {} kills, {} targets left",
            self.stats.frames,
            self.time.elapsed_seconds(),
            self.stats.shots,
            self.stats.hits,
            self.stats.projectile_impacts,
            self.stats.kills,
            self.targets_alive()
        );
        self.stats
    }
}
