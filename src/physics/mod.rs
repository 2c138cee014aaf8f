//! Collision geometry for the player and projectiles

pub mod aabb;
pub mod collision;

pub use aabb::{aabb_from_feet, aabb_overlaps, aabb_segment_intersection, AABB};
pub use collision::{block_collision_boxes, is_colliding, is_solid_block, move_and_collide, MoveResult};
