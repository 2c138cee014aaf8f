//! Block collision shapes and axis-separated movement against the world.

use glam::Vec3;

use super::aabb::{aabb_at_block, aabb_overlaps, create_aabb, AABB};
use crate::world::orientation::{is_open, is_top, Facing};
use crate::world::{Block, BlockShape, VoxelPos, World};

/// Gap kept between a moving body and the surface it stops against
const CONTACT_EPSILON: f32 = 1e-4;

const POST_MIN: f32 = 0.375;
const POST_MAX: f32 = 0.625;
const FENCE_HEIGHT: f32 = 1.5;
const TRAPDOOR_THICKNESS: f32 = 0.2;

fn unit_box(min: [f32; 3], max: [f32; 3]) -> AABB {
    create_aabb(Vec3::from(min), Vec3::from(max))
}

/// Collision boxes of a block in its own unit-cube space. Boxes may extend
/// above the cell (fences and closed gates are 1.5 tall).
pub fn block_collision_boxes(block: &Block) -> Vec<AABB> {
    let meta = block.metadata;
    match block.shape() {
        BlockShape::Empty | BlockShape::Liquid | BlockShape::Cross => Vec::new(),
        BlockShape::Cube => vec![unit_box([0.0; 3], [1.0; 3])],
        BlockShape::Slab => {
            if is_top(meta) {
                vec![unit_box([0.0, 0.5, 0.0], [1.0, 1.0, 1.0])]
            } else {
                vec![unit_box([0.0, 0.0, 0.0], [1.0, 0.5, 1.0])]
            }
        }
        BlockShape::Stairs => {
            let step = match Facing::from_metadata(meta) {
                Facing::East => unit_box([0.5, 0.5, 0.0], [1.0, 1.0, 1.0]),
                Facing::West => unit_box([0.0, 0.5, 0.0], [0.5, 1.0, 1.0]),
                Facing::South => unit_box([0.0, 0.5, 0.5], [1.0, 1.0, 1.0]),
                Facing::North => unit_box([0.0, 0.5, 0.0], [1.0, 1.0, 0.5]),
            };
            vec![unit_box([0.0, 0.0, 0.0], [1.0, 0.5, 1.0]), step]
        }
        BlockShape::Fence => vec![unit_box([POST_MIN, 0.0, POST_MIN], [POST_MAX, FENCE_HEIGHT, POST_MAX])],
        BlockShape::FenceGate => {
            if is_open(meta) {
                Vec::new()
            } else if meta & 1 == 1 {
                vec![unit_box([POST_MIN, 0.0, 0.0], [POST_MAX, FENCE_HEIGHT, 1.0])]
            } else {
                vec![unit_box([0.0, 0.0, POST_MIN], [1.0, FENCE_HEIGHT, POST_MAX])]
            }
        }
        BlockShape::Pane => vec![unit_box([POST_MIN, 0.0, POST_MIN], [POST_MAX, 1.0, POST_MAX])],
        BlockShape::Door => {
            if is_open(meta) {
                Vec::new()
            } else {
                vec![unit_box([0.0; 3], [1.0; 3])]
            }
        }
        BlockShape::Trapdoor => {
            if is_open(meta) {
                Vec::new()
            } else if is_top(meta) {
                vec![unit_box([0.0, 1.0 - TRAPDOOR_THICKNESS, 0.0], [1.0, 1.0, 1.0])]
            } else {
                vec![unit_box([0.0, 0.0, 0.0], [1.0, TRAPDOOR_THICKNESS, 1.0])]
            }
        }
    }
}

/// Whether a block has any collision volume at all
pub fn is_solid_block(block: &Block) -> bool {
    !block_collision_boxes(block).is_empty()
}

/// World-space collision boxes of every generated block touching `region`.
/// Ungenerated chunks and cells outside the world contribute nothing.
pub fn collect_world_boxes(world: &World, region: &AABB) -> Vec<AABB> {
    let min = VoxelPos::from_world(region.min);
    let max = VoxelPos::from_world(region.max);
    let mut boxes = Vec::new();

    // One extra cell below catches shapes taller than a block
    for x in min.x..=max.x {
        for z in min.z..=max.z {
            for y in (min.y - 1)..=max.y {
                let pos = VoxelPos::new(x, y, z);
                if let Some(block) = world.block_at(pos) {
                    let origin = pos.to_vec3();
                    boxes.extend(block_collision_boxes(&block).iter().map(|b| aabb_at_block(b, origin)));
                }
            }
        }
    }
    boxes
}

/// Whether a body currently overlaps any block
pub fn is_colliding(world: &World, body: &AABB) -> bool {
    collect_world_boxes(world, body).iter().any(|b| aabb_overlaps(b, body))
}

/// Outcome of moving a body through the world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveResult {
    /// Distance actually travelled
    pub offset: Vec3,
    /// Per axis, whether movement was cut short
    pub blocked: [bool; 3],
}

impl MoveResult {
    /// Stopped while moving down: the body is standing on something
    pub fn landed(&self, requested: Vec3) -> bool {
        self.blocked[1] && requested.y < 0.0
    }
}

fn overlaps_on_other_axes(a: &AABB, b: &AABB, axis: usize) -> bool {
    (0..3)
        .filter(|&i| i != axis)
        .all(|i| a.min[i] < b.max[i] && a.max[i] > b.min[i])
}

/// Clip a movement along one axis so the body stops at the first box in its way
fn clip_axis(body: &AABB, boxes: &[AABB], axis: usize, mut delta: f32) -> f32 {
    for b in boxes {
        if !overlaps_on_other_axes(body, b, axis) {
            continue;
        }
        if delta > 0.0 && b.min[axis] >= body.max[axis] - CONTACT_EPSILON {
            delta = delta.min(b.min[axis] - body.max[axis] - CONTACT_EPSILON).max(0.0);
        } else if delta < 0.0 && b.max[axis] <= body.min[axis] + CONTACT_EPSILON {
            delta = delta.max(b.max[axis] - body.min[axis] + CONTACT_EPSILON).min(0.0);
        }
    }
    delta
}

fn axis_vec(axis: usize, value: f32) -> Vec3 {
    let mut v = Vec3::ZERO;
    v[axis] = value;
    v
}

/// Move a body by `delta`, resolving X, then Z, then Y against solid block
/// shapes. Landing on a surface leaves the body resting on its top.
pub fn move_and_collide(world: &World, body: AABB, delta: Vec3) -> MoveResult {
    let swept = AABB {
        min: body.min.min(body.min + delta),
        max: body.max.max(body.max + delta),
    };
    let boxes = collect_world_boxes(world, &swept);

    let mut current = body;
    let mut result = MoveResult::default();

    for axis in [0usize, 2, 1] {
        let requested = delta[axis];
        if requested == 0.0 {
            continue;
        }
        let allowed = clip_axis(&current, &boxes, axis, requested);
        if (allowed - requested).abs() > f32::EPSILON {
            result.blocked[axis] = true;
        }
        let step = axis_vec(axis, allowed);
        current.min += step;
        current.max += step;
        result.offset[axis] = allowed;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::aabb::aabb_from_feet;
    use crate::world::orientation::{OPEN_BIT, TOP_BIT};
    use crate::world::{BlockId, ChunkPos};

    fn empty_world() -> World {
        // High altitude in a generated chunk is plain air
        let mut world = World::new(21);
        world.ensure_chunk(ChunkPos::new(0, 0));
        world
    }

    fn top_of(block: Block) -> f32 {
        block_collision_boxes(&block).iter().map(|b| b.max.y).fold(0.0, f32::max)
    }

    #[test]
    fn test_shape_heights() {
        assert_eq!(top_of(Block::new(BlockId::STONE)), 1.0);
        assert_eq!(top_of(Block::new(BlockId::SLAB_STONE)), 0.5);
        assert_eq!(top_of(Block::new(BlockId::FENCE)), 1.5);
        assert_eq!(top_of(Block::new(BlockId::FENCE_GATE)), 1.5);
        assert!((top_of(Block::new(BlockId::TRAPDOOR)) - 0.2).abs() < 1e-6);
        assert_eq!(top_of(Block::with_metadata(BlockId::TRAPDOOR, TOP_BIT)), 1.0);
    }

    #[test]
    fn test_open_hinged_blocks_pass_through() {
        assert!(is_solid_block(&Block::new(BlockId::DOOR_WOOD_BOTTOM)));
        assert!(!is_solid_block(&Block::with_metadata(BlockId::DOOR_WOOD_BOTTOM, OPEN_BIT)));
        assert!(!is_solid_block(&Block::with_metadata(BlockId::TRAPDOOR, OPEN_BIT)));
        assert!(!is_solid_block(&Block::with_metadata(BlockId::FENCE_GATE, OPEN_BIT | 1)));
        assert!(!is_solid_block(&Block::new(BlockId::WATER)));
        assert!(!is_solid_block(&Block::new(BlockId::TORCH)));
    }

    #[test]
    fn test_stairs_quadrant_follows_facing() {
        let east = block_collision_boxes(&Block::with_metadata(BlockId::STAIRS_WOOD, Facing::East.bits()));
        assert_eq!(east.len(), 2);
        assert_eq!(east[1].min.x, 0.5);
        let north = block_collision_boxes(&Block::with_metadata(BlockId::STAIRS_WOOD, Facing::North.bits()));
        assert_eq!(north[1].max.z, 0.5);
    }

    #[test]
    fn test_falling_body_lands_on_block_top() {
        let mut world = empty_world();
        world.set_block(VoxelPos::new(4, 80, 4), BlockId::STONE).unwrap();

        let body = aabb_from_feet(Vec3::new(4.5, 82.0, 4.5), 0.6, 1.8);
        let delta = Vec3::new(0.0, -5.0, 0.0);
        let result = move_and_collide(&world, body, delta);

        assert!(result.landed(delta));
        assert!((body.min.y + result.offset.y - 81.0).abs() < 1e-3);
    }

    #[test]
    fn test_walls_stop_horizontal_motion_independently() {
        let mut world = empty_world();
        world.set_block(VoxelPos::new(6, 80, 4), BlockId::STONE).unwrap();
        world.set_block(VoxelPos::new(6, 81, 4), BlockId::STONE).unwrap();

        let body = aabb_from_feet(Vec3::new(5.0, 80.0, 4.5), 0.6, 1.8);
        let result = move_and_collide(&world, body, Vec3::new(2.0, 0.0, 0.3));

        assert!(result.blocked[0]);
        assert!(!result.blocked[2]);
        assert!(body.max.x + result.offset.x <= 6.0);
        assert!((result.offset.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_open_door_lets_body_through() {
        let mut world = empty_world();
        let door = VoxelPos::new(6, 80, 4);
        world.place_block(door, BlockId::DOOR_WOOD_BOTTOM, 0.0, 0.0).unwrap();
        world.interact(door).unwrap();

        let body = aabb_from_feet(Vec3::new(5.0, 80.0, 4.5), 0.6, 1.8);
        let result = move_and_collide(&world, body, Vec3::new(2.0, 0.0, 0.0));
        assert!(!result.blocked[0]);
        assert!(!is_colliding(&world, &aabb_from_feet(Vec3::new(6.5, 80.0, 4.5), 0.6, 1.8)));
    }
}
