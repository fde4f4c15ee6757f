//! Cockpit camera motion: idle sway plus roll that leans into turns and strafes.

use engine_core::{Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwaySettings {
    pub amount_x: f32,
    pub amount_y: f32,
    pub speed: f32,
    /// Degrees of roll from yaw rate at most.
    pub max_turn_roll: f32,
    /// Degrees of roll from lateral speed at most.
    pub max_strafe_roll: f32,
    /// Higher is snappier.
    pub roll_smoothing: f32,
    pub lateral_speed_for_full_roll: f32,
    /// Roll degrees per degree/second of yaw.
    pub angular_to_roll: f32,
}

impl Default for SwaySettings {
    fn default() -> Self {
        Self {
            amount_x: 0.2,
            amount_y: 0.5,
            speed: 3.0,
            max_turn_roll: 20.0,
            max_strafe_roll: 15.0,
            roll_smoothing: 3.0,
            lateral_speed_for_full_roll: 20.0,
            angular_to_roll: 0.44,
        }
    }
}

/// Shortest signed difference between two angles in degrees.
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let mut delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Critically damped spring toward `target` (degrees), wrapping at 360.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let target = current + delta_angle(current, target);
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // No overshoot.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}

/// Camera rig mounted on the ship.
#[derive(Debug, Clone)]
pub struct CameraSway {
    pub settings: SwaySettings,
    /// Camera position in ship space.
    pub mount: Vec3,
    time: f32,
    /// Visual roll in degrees; positive lifts the right side.
    roll: f32,
    roll_velocity: f32,
}

impl CameraSway {
    pub fn new(settings: SwaySettings, mount: Vec3) -> Self {
        Self {
            settings,
            mount,
            time: 0.0,
            roll: 0.0,
            roll_velocity: 0.0,
        }
    }

    fn target_roll(&self, ship: &Transform, linear: Vec3, angular: Vec3) -> f32 {
        let s = &self.settings;
        let local_linear = ship.inverse_transform_direction(linear);
        let local_angular = ship.inverse_transform_direction(angular);

        let from_yaw = local_angular.y.to_degrees() * s.angular_to_roll;
        let lateral = if s.lateral_speed_for_full_roll > 1e-5 {
            (local_linear.x / s.lateral_speed_for_full_roll).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let from_strafe = -lateral * s.max_strafe_roll;
        let limit = s.max_turn_roll + s.max_strafe_roll;
        (from_yaw + from_strafe).clamp(-limit, limit)
    }

    /// Advance sway and roll, returning the camera's world transform.
    pub fn update(&mut self, dt: f32, ship: &Transform, linear: Vec3, angular: Vec3) -> Transform {
        self.time += dt;
        let s = self.settings;
        let sway = Vec3::new(
            (self.time * s.speed).sin() * s.amount_x,
            (self.time * s.speed).cos() * s.amount_y,
            0.0,
        );

        let target = self.target_roll(ship, linear, angular);
        let smooth_time = 1.0 / s.roll_smoothing.max(1e-4);
        self.roll = smooth_damp_angle(self.roll, target, &mut self.roll_velocity, smooth_time, dt);

        let local = Transform::from_position_rotation(
            self.mount + sway,
            Quat::from_rotation_z(self.roll.to_radians()),
        );
        ship.mul_transform(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_angle_wraps() {
        assert_eq!(delta_angle(350.0, 10.0), 20.0);
        assert_eq!(delta_angle(10.0, 350.0), -20.0);
    }

    #[test]
    fn smooth_damp_approaches_without_overshoot() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        let mut previous = value;
        for _ in 0..240 {
            value = smooth_damp_angle(value, 30.0, &mut velocity, 1.0 / 3.0, 1.0 / 60.0);
            assert!(value >= previous - 1e-4);
            assert!(value <= 30.0 + 1e-4);
            previous = value;
        }
        assert!((value - 30.0).abs() < 0.05);
    }

    #[test]
    fn leans_into_right_turn_and_strafe() {
        let mut sway = CameraSway::new(SwaySettings::default(), Vec3::ZERO);
        let ship = Transform::default();
        // Yaw right at 45 deg/s while strafing right.
        let angular = Vec3::new(0.0, -45f32.to_radians(), 0.0);
        let linear = Vec3::new(10.0, 0.0, 0.0);
        assert!((sway.target_roll(&ship, linear, angular) - (-19.8 - 7.5)).abs() < 1e-3);

        for _ in 0..120 {
            sway.update(1.0 / 60.0, &ship, linear, angular);
        }
        assert!(sway.roll < -20.0);
    }

    #[test]
    fn roll_target_is_clamped() {
        let sway = CameraSway::new(SwaySettings::default(), Vec3::ZERO);
        let spin = Vec3::new(0.0, 10.0, 0.0);
        let slide = Vec3::new(-100.0, 0.0, 0.0);
        assert_eq!(sway.target_roll(&Transform::default(), slide, spin), 35.0);
    }

    #[test]
    fn camera_rides_the_mount_with_sway() {
        let mut sway = CameraSway::new(SwaySettings::default(), Vec3::new(0.0, 1.0, 0.0));
        let ship = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        let camera = sway.update(0.0, &ship, Vec3::ZERO, Vec3::ZERO);
        // At t = 0 the sway is (0, amount_y).
        assert!((camera.position - Vec3::new(5.0, 1.5, 0.0)).length() < 1e-5);
    }
}
