//! Gameplay-facing input actions, independent of the device that drives them.

use glam::Vec2;

/// Weapon controls polled once per frame.
pub trait WeaponInput {
    /// Analog fire level in `0..=1` (trigger or held button).
    fn fire_level(&self) -> f32;
    /// Fire was pressed this frame.
    fn fire_performed(&self) -> bool;
    fn next_weapon_performed(&self) -> bool;
    fn previous_weapon_performed(&self) -> bool;
}

/// Six-degrees-of-freedom flight controls.
pub trait FlightInput {
    /// x = strafe (left/right), y = throttle (forward/back), each in `-1..=1`.
    fn translate(&self) -> Vec2;
    /// x = yaw, y = pitch, each in `-1..=1`.
    fn rotate(&self) -> Vec2;
    /// Roll in `-1..=1` (left shoulder = -1).
    fn roll(&self) -> f32;
    /// Vertical strafe up in `0..=1`.
    fn up(&self) -> f32;
    /// Vertical strafe down in `0..=1`.
    fn down(&self) -> f32;
}

/// Zero out a value whose magnitude is below `deadzone`.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_clears_small_values() {
        assert_eq!(apply_deadzone(0.05, 0.1), 0.0);
        assert_eq!(apply_deadzone(-0.05, 0.1), 0.0);
        assert_eq!(apply_deadzone(-0.5, 0.1), -0.5);
        assert_eq!(apply_deadzone(0.1, 0.1), 0.1);
    }
}
