//! Projectiles and damage

pub mod projectile;
pub mod system;

pub use projectile::{Projectile, ProjectileSource};
pub use system::{CombatReport, CombatSystem};
