//! Six-degrees-of-freedom ship controller driving a gravity-free rapier body.

use engine_core::{Transform, Vec3};
use input::{apply_deadzone, FlightInput};
use physics::{PhysicsWorld, RigidBodyHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSettings {
    pub max_forward_speed: f32,
    pub max_strafe_speed: f32,
    pub max_vertical_speed: f32,
    /// Change of local velocity toward the target, units/s².
    pub acceleration: f32,
    /// Velocity bleed-off with no translation input, units/s².
    pub drift_decay: f32,
    pub deadzone: f32,
    /// Degrees per second at full stick.
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub roll_speed: f32,
    /// Degrees per second².
    pub angular_acceleration: f32,
    pub invert_pitch: bool,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            max_forward_speed: 30.0,
            max_strafe_speed: 30.0,
            max_vertical_speed: 30.0,
            acceleration: 30.0,
            drift_decay: 40.0,
            deadzone: 0.1,
            yaw_speed: 120.0,
            pitch_speed: 120.0,
            roll_speed: 120.0,
            angular_acceleration: 600.0,
            invert_pitch: false,
        }
    }
}

/// Step `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Flight controller for the player's ship.
pub struct ShipController {
    pub settings: FlightSettings,
    /// Multiplier on rotation input.
    pub sensitivity: f32,
    pub body: RigidBodyHandle,
    local_velocity: Vec3,
    had_translation: bool,
}

impl ShipController {
    pub fn new(settings: FlightSettings, body: RigidBodyHandle) -> Self {
        Self {
            settings,
            sensitivity: 1.0,
            body,
            local_velocity: Vec3::ZERO,
            had_translation: false,
        }
    }

    /// Target velocity in ship space; forward is -Z.
    fn target_local_velocity(&self, input: &dyn FlightInput) -> Vec3 {
        let s = &self.settings;
        let stick = input.translate();
        let strafe = apply_deadzone(stick.x, s.deadzone);
        let throttle = apply_deadzone(stick.y, s.deadzone);
        let vertical = apply_deadzone(input.up(), s.deadzone) - apply_deadzone(input.down(), s.deadzone);
        Vec3::new(
            strafe * s.max_strafe_speed,
            vertical * s.max_vertical_speed,
            -throttle * s.max_forward_speed,
        )
    }

    /// Target angular velocity in ship space, radians per second.
    fn target_local_angular(&self, input: &dyn FlightInput) -> Vec3 {
        let s = &self.settings;
        let stick = input.rotate() * self.sensitivity;
        let pitch = if s.invert_pitch { -stick.y } else { stick.y };
        Vec3::new(
            pitch * s.pitch_speed,
            -stick.x * s.yaw_speed,
            -input.roll() * s.roll_speed,
        ) * std::f32::consts::PI
            / 180.0
    }

    /// Apply one fixed step of input to the body's velocities.
    pub fn fixed_update(&mut self, input: &dyn FlightInput, physics: &mut PhysicsWorld, dt: f32) {
        let Some(transform) = physics.get_body_transform(self.body) else {
            log::warn!("Ship body is missing");
            return;
        };
        let target = self.target_local_velocity(input);
        let has_translation = target.abs().max_element() > 1e-4;

        let world_velocity = if has_translation {
            self.local_velocity = if self.had_translation {
                move_towards(self.local_velocity, target, self.settings.acceleration * dt)
            } else {
                // Snap on the first frame of input.
                target
            };
            transform.transform_direction(self.local_velocity)
        } else {
            let current = physics.body_linear_velocity(self.body);
            let decayed = move_towards(current, Vec3::ZERO, self.settings.drift_decay * dt);
            self.local_velocity = transform.inverse_transform_direction(decayed);
            decayed
        };
        self.had_translation = has_translation;
        physics.set_body_linear_velocity(self.body, world_velocity);

        let target_angular = transform.transform_direction(self.target_local_angular(input));
        let angular = move_towards(
            physics.body_angular_velocity(self.body),
            target_angular,
            self.settings.angular_acceleration.to_radians() * dt,
        );
        physics.set_body_angular_velocity(self.body, angular);
    }

    pub fn transform(&self, physics: &PhysicsWorld) -> Transform {
        physics.get_body_transform(self.body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Vec2;

    #[derive(Default)]
    struct Stick {
        translate: Vec2,
        rotate: Vec2,
        roll: f32,
    }

    impl FlightInput for Stick {
        fn translate(&self) -> Vec2 {
            self.translate
        }
        fn rotate(&self) -> Vec2 {
            self.rotate
        }
        fn roll(&self) -> f32 {
            self.roll
        }
        fn up(&self) -> f32 {
            0.0
        }
        fn down(&self) -> f32 {
            0.0
        }
    }

    fn ship() -> (PhysicsWorld, ShipController) {
        let mut physics = PhysicsWorld::new();
        let body = physics.add_ship_body(Vec3::ZERO);
        (physics, ShipController::new(FlightSettings::default(), body))
    }

    #[test]
    fn move_towards_clamps_step() {
        assert_eq!(move_towards(Vec3::ZERO, Vec3::X * 10.0, 4.0), Vec3::X * 4.0);
        assert_eq!(move_towards(Vec3::ZERO, Vec3::X, 4.0), Vec3::X);
    }

    #[test]
    fn first_input_snaps_then_accelerates() {
        let (mut physics, mut ship) = ship();
        let forward = Stick {
            translate: Vec2::new(0.0, 0.5),
            ..Default::default()
        };
        ship.fixed_update(&forward, &mut physics, 0.1);
        let v = physics.body_linear_velocity(ship.body);
        assert!((v - Vec3::new(0.0, 0.0, -15.0)).length() < 1e-3);

        let full = Stick {
            translate: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        ship.fixed_update(&full, &mut physics, 0.1);
        let v = physics.body_linear_velocity(ship.body);
        assert!((v - Vec3::new(0.0, 0.0, -18.0)).length() < 1e-3);
    }

    #[test]
    fn drifts_to_rest_without_input() {
        let (mut physics, mut ship) = ship();
        let forward = Stick {
            translate: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        ship.fixed_update(&forward, &mut physics, 0.1);
        let idle = Stick::default();
        ship.fixed_update(&idle, &mut physics, 0.25);
        let v = physics.body_linear_velocity(ship.body);
        assert!((v.length() - 20.0).abs() < 1e-3);
        ship.fixed_update(&idle, &mut physics, 1.0);
        assert!(physics.body_linear_velocity(ship.body).length() < 1e-4);
    }

    #[test]
    fn deadzone_and_rotation_targets() {
        let (mut physics, mut ship) = ship();
        let drift = Stick {
            translate: Vec2::new(0.05, 0.0),
            rotate: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        ship.fixed_update(&drift, &mut physics, 1.0);
        assert!(physics.body_linear_velocity(ship.body).length() < 1e-4);

        // Stick right yaws right (negative about +Y), capped at yaw speed.
        let w = physics.body_angular_velocity(ship.body);
        assert!((w.y + 120f32.to_radians()).abs() < 1e-3);

        let mut inverted = ShipController::new(
            FlightSettings {
                invert_pitch: true,
                ..Default::default()
            },
            ship.body,
        );
        let up = Stick {
            rotate: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        assert!(ship.target_local_angular(&up).x > 0.0);
        assert!(inverted.target_local_angular(&up).x < 0.0);
        inverted.sensitivity = 0.5;
        assert!((inverted.target_local_angular(&up).x + 60f32.to_radians()).abs() < 1e-4);
    }
}
