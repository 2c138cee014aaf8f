use glam::Vec3;
use std::collections::BTreeSet;

use super::input::PlayerInput;
use super::inventory::{Inventory, InventoryResult};
use crate::constants::player::*;
use crate::item::ItemId;
use crate::physics::{aabb_from_feet, move_and_collide, AABB};
use crate::world::World;

/// Pitch stays just short of straight up/down
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
/// Fraction of knockback velocity lost per second
const KNOCKBACK_DAMPING: f32 = 8.0;

/// Summary of one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTickReport {
    pub landed: bool,
    pub fall_damage: f32,
    pub fell_into_void: bool,
}

/// Player position, motion, stance, health and inventory.
///
/// `position` is the centre of the feet; the collision box extends
/// `width / 2` to each side and `height` upwards.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    health: f32,
    max_health: f32,
    height: f32,
    width: f32,
    on_ground: bool,
    fall_distance: f32,
    knockback: Vec3,
    spawn_point: Vec3,
    pub inventory: Inventory,
    discovered: BTreeSet<ItemId>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec3::from(DEFAULT_SPAWN))
    }
}

impl Player {
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            position: spawn_point,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            height: STANDING_HEIGHT,
            width: WIDTH,
            on_ground: false,
            fall_distance: 0.0,
            knockback: Vec3::ZERO,
            spawn_point,
            inventory: Inventory::new(),
            discovered: BTreeSet::new(),
        }
    }

    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health.max(1.0);
        self.health = self.max_health;
        self
    }

    // Stance and geometry

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_crouching(&self) -> bool {
        self.height < STANDING_HEIGHT
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn fall_distance(&self) -> f32 {
        self.fall_distance
    }

    pub fn aabb(&self) -> AABB {
        aabb_from_feet(self.position, self.width, self.height)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.height * EYE_HEIGHT_FACTOR, 0.0)
    }

    /// Unit look vector. Yaw 0 looks along +x, yaw pi/2 along +z.
    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Restore a saved kinematic state
    pub fn restore_state(&mut self, position: Vec3, velocity: Vec3, yaw: f32, pitch: f32, health: f32) {
        self.position = position;
        self.velocity = velocity;
        self.yaw = yaw;
        self.pitch = pitch;
        self.health = health.clamp(0.0, self.max_health);
        self.knockback = Vec3::ZERO;
        self.fall_distance = 0.0;
        self.on_ground = false;
        self.height = STANDING_HEIGHT;
    }

    // Health

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Subtract health, never going below zero
    pub fn apply_damage(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health == 0.0 {
            log::info!("[Player] Died at {:?}", self.position);
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 && !self.is_dead() {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Horizontal push, e.g. from a projectile hit
    pub fn apply_knockback(&mut self, impulse: Vec3) {
        let push = Vec3::new(impulse.x, 0.0, impulse.z);
        self.knockback += push;
        self.velocity += push;
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn set_spawn_point(&mut self, spawn: Vec3) {
        self.spawn_point = spawn;
    }

    /// Back to full health at the spawn point. The inventory is kept.
    pub fn respawn(&mut self) {
        self.position = self.spawn_point;
        self.velocity = Vec3::ZERO;
        self.knockback = Vec3::ZERO;
        self.health = self.max_health;
        self.fall_distance = 0.0;
        self.on_ground = false;
        self.height = STANDING_HEIGHT;
        log::info!("[Player] Respawned at {:?}", self.spawn_point);
    }

    // Recipe discovery

    pub fn discovered_items(&self) -> &BTreeSet<ItemId> {
        &self.discovered
    }

    pub fn set_discovered_items(&mut self, items: BTreeSet<ItemId>) {
        self.discovered = items;
    }

    /// Record every item currently in the inventory as discovered
    pub fn record_held_items(&mut self) {
        self.discovered.extend(self.inventory.held_items());
    }

    /// Add items to the inventory and mark them discovered. Returns the count that did not fit.
    pub fn pick_up(&mut self, item: ItemId, count: u32) -> InventoryResult<u32> {
        let leftover = self.inventory.add_item(item, count)?;
        if leftover < count {
            self.discovered.insert(item);
        }
        Ok(leftover)
    }

    // Simulation

    fn horizontal_speed(&self, input: &PlayerInput) -> f32 {
        let mut speed = WALK_SPEED;
        if self.is_crouching() {
            speed *= CROUCH_SPEED_FACTOR;
        } else if input.sprint && self.on_ground {
            speed *= SPRINT_SPEED_FACTOR;
        }
        speed
    }

    /// Advance the player by `dt` seconds.
    ///
    /// Order: stance, horizontal velocity, jump and gravity, collision
    /// (X, Z, then Y), fall damage, void check. Stance is always recomputed;
    /// a dead player or a zero step moves nothing.
    pub fn update(&mut self, dt: f32, input: &PlayerInput, world: &World) -> PlayerTickReport {
        let mut report = PlayerTickReport::default();
        self.height = if input.sneak && self.on_ground {
            CROUCH_HEIGHT
        } else {
            STANDING_HEIGHT
        };
        if self.is_dead() || dt <= 0.0 {
            return report;
        }

        let (forward, strafe) = input.movement_axes();
        let speed = self.horizontal_speed(input);
        let (sin, cos) = self.yaw.sin_cos();
        let walk_x = (forward * cos - strafe * sin) * speed;
        let walk_z = (forward * sin + strafe * cos) * speed;
        self.velocity.x = walk_x + self.knockback.x;
        self.velocity.z = walk_z + self.knockback.z;
        self.knockback *= (1.0 - KNOCKBACK_DAMPING * dt).max(0.0);

        if input.jump && self.on_ground {
            self.velocity.y = JUMP_VELOCITY;
            self.on_ground = false;
        }
        self.velocity.y -= GRAVITY * dt;

        let delta = self.velocity * dt;
        let moved = move_and_collide(world, self.aabb(), delta);
        self.position += moved.offset;

        if moved.blocked[0] {
            self.velocity.x = 0.0;
            self.knockback.x = 0.0;
        }
        if moved.blocked[2] {
            self.velocity.z = 0.0;
            self.knockback.z = 0.0;
        }

        if moved.landed(delta) {
            if !self.on_ground {
                report.landed = true;
                let damage = (self.fall_distance - SAFE_FALL_DISTANCE).floor();
                if damage > 0.0 {
                    report.fall_damage = damage;
                    self.apply_damage(damage);
                }
            }
            self.on_ground = true;
            self.fall_distance = 0.0;
            self.velocity.y = 0.0;
        } else {
            if moved.blocked[1] {
                // Head hit a ceiling
                self.velocity.y = 0.0;
            }
            self.on_ground = false;
            if moved.offset.y < 0.0 {
                self.fall_distance -= moved.offset.y;
            } else {
                self.fall_distance = 0.0;
            }
        }

        if self.position.y < VOID_Y {
            report.fell_into_void = true;
            self.health = 0.0;
            log::info!("[Player] Fell out of the world");
        }

        report
    }
}
