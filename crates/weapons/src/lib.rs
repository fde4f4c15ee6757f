//! Descent-style weapon framework: cooldown-gated hitscan and projectile
//! weapons firing from multiple muzzles, with tracers, impacts and damage.

pub mod config;
pub mod context;
pub mod cooldown;
pub mod damage;
pub mod effects;
pub mod hitscan;
pub mod manager;
pub mod muzzle;
pub mod projectile;
pub mod tracer;
pub mod weapon;

pub use config::*;
pub use context::*;
pub use cooldown::*;
pub use damage::*;
pub use effects::*;
pub use hitscan::*;
pub use manager::*;
pub use muzzle::*;
pub use projectile::*;
pub use tracer::*;
pub use weapon::*;

#[cfg(test)]
pub(crate) mod test_support;
