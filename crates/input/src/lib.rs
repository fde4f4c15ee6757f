//! Input actions exposed to gameplay as [`WeaponInput`] and [`FlightInput`].
//!
//! Devices (or the sandbox's scripted input) implement these traits; weapon
//! and flight code never sees raw keys.

mod actions;

pub use actions::*;
