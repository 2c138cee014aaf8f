use glam::Vec3;

use super::projectile::{Projectile, ProjectileSource};
use crate::constants::combat::{KNOCKBACK_FACTOR, PROJECTILE_DAMAGE, PROJECTILE_LIFE, PROJECTILE_SPEED};
use crate::physics::aabb::{aabb_at_block, aabb_contains_point};
use crate::physics::{aabb_segment_intersection, block_collision_boxes};
use crate::player::Player;
use crate::world::{VoxelPos, World};

/// What happened during one combat step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatReport {
    pub hits: u32,
    pub damage_dealt: f32,
    /// Projectiles removed by hitting terrain or running out of life
    pub expired: u32,
}

/// Owns every live projectile and resolves them against the player
#[derive(Debug, Default)]
pub struct CombatSystem {
    projectiles: Vec<Projectile>,
}

fn hits_terrain(world: &World, point: Vec3) -> bool {
    let cell = VoxelPos::from_world(point);
    // Tall shapes reach into the cell above
    [cell, cell.below()].iter().any(|&pos| {
        world.block_at(pos).map_or(false, |block| {
            block_collision_boxes(&block)
                .iter()
                .any(|b| aabb_contains_point(&aabb_at_block(b, pos.to_vec3()), point))
        })
    })
}

impl CombatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Add a hostile projectile
    pub fn spawn_projectile(&mut self, origin: Vec3, velocity: Vec3, damage: f32, life: f32) {
        self.spawn(Projectile::new(origin, velocity, damage, life, ProjectileSource::Hostile));
    }

    pub fn spawn(&mut self, projectile: Projectile) {
        log::debug!(
            "[Combat] Spawned {:?} projectile at {:?}",
            projectile.source,
            projectile.position
        );
        self.projectiles.push(projectile);
    }

    /// Launch a projectile from the player's eyes along their look direction
    pub fn fire_from_player(&mut self, player: &Player) {
        let direction = player.look_direction().normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        self.spawn(Projectile::new(
            player.eye_position(),
            direction * PROJECTILE_SPEED,
            PROJECTILE_DAMAGE,
            PROJECTILE_LIFE,
            ProjectileSource::Player,
        ));
    }

    /// Advance every projectile by `dt` and resolve hits.
    ///
    /// Runs after the player's physics step. For each projectile: move and
    /// age it, then test the swept segment against the player's box. A hit
    /// applies damage and knockback once and removes the projectile, even if
    /// it would have expired this step. Otherwise it is removed on entering
    /// solid terrain or when its life runs out.
    pub fn update(&mut self, dt: f32, player: &mut Player, world: &World) -> CombatReport {
        let mut report = CombatReport::default();

        self.projectiles.retain_mut(|projectile| {
            let (start, end) = projectile.advance(dt);

            if projectile.source != ProjectileSource::Player && !player.is_dead() {
                let target = player.aabb();
                if aabb_segment_intersection(&target, start, end).is_some() {
                    player.apply_damage(projectile.damage);
                    player.apply_knockback(projectile.velocity * KNOCKBACK_FACTOR);
                    report.hits += 1;
                    report.damage_dealt += projectile.damage;
                    log::debug!("[Combat] Projectile hit player for {}", projectile.damage);
                    return false;
                }
            }

            if hits_terrain(world, end) || projectile.is_expired() {
                report.expired += 1;
                return false;
            }
            true
        });

        report
    }
}
