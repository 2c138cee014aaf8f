use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Who launched a projectile. Projectiles never hit the one who fired them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Hostile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds left before the projectile disappears
    pub life: f32,
    pub damage: f32,
    pub source: ProjectileSource,
}

impl Projectile {
    pub fn new(position: Vec3, velocity: Vec3, damage: f32, life: f32, source: ProjectileSource) -> Self {
        Self {
            position,
            velocity,
            life,
            damage,
            source,
        }
    }

    /// Move forward by `dt`, returning the segment travelled
    pub fn advance(&mut self, dt: f32) -> (Vec3, Vec3) {
        let start = self.position;
        self.position += self.velocity * dt;
        self.life -= dt;
        (start, self.position)
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_and_ages() {
        let mut p = Projectile::new(Vec3::ZERO, Vec3::new(15.0, 0.0, 0.0), 2.0, 0.1, ProjectileSource::Hostile);
        let (start, end) = p.advance(0.05);
        assert_eq!(start, Vec3::ZERO);
        assert!((end.x - 0.75).abs() < 1e-6);
        assert!(!p.is_expired());
        p.advance(0.05);
        assert!(p.is_expired());
    }
}
