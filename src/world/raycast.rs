use glam::Vec3;

use super::block::{Block, BlockShape};
use super::position::VoxelPos;
use super::world::World;

/// Result of a successful block raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The block that was hit
    pub position: VoxelPos,
    pub block: Block,
    /// Unit normal of the face the ray entered through, zero if the ray started inside the block
    pub normal: [i32; 3],
    pub distance: f32,
    /// Where the ray touched the block, relative to its minimum corner
    pub local_hit: Vec3,
}

impl RaycastHit {
    /// Cell adjacent to the hit face, where a placed block would go
    pub fn adjacent(&self) -> VoxelPos {
        self.position.offset(self.normal[0], self.normal[1], self.normal[2])
    }
}

fn is_targetable(block: &Block) -> bool {
    !matches!(block.shape(), BlockShape::Empty | BlockShape::Liquid)
}

/// Walk the voxel grid along a ray (Amanatides & Woo) and return the first
/// targetable block. Ungenerated chunks and out-of-bounds cells are passed through.
pub fn raycast(world: &World, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
    let dir = direction.try_normalize()?;
    let mut cell = VoxelPos::from_world(origin);

    let step = [
        if dir.x > 0.0 { 1 } else { -1 },
        if dir.y > 0.0 { 1 } else { -1 },
        if dir.z > 0.0 { 1 } else { -1 },
    ];
    let axis_delta = |d: f32| if d == 0.0 { f32::INFINITY } else { (1.0 / d).abs() };
    let t_delta = [axis_delta(dir.x), axis_delta(dir.y), axis_delta(dir.z)];

    let boundary = |o: f32, c: i32, d: f32| -> f32 {
        if d > 0.0 {
            (c as f32 + 1.0 - o) / d
        } else if d < 0.0 {
            (c as f32 - o) / d
        } else {
            f32::INFINITY
        }
    };
    let mut t_max = [
        boundary(origin.x, cell.x, dir.x),
        boundary(origin.y, cell.y, dir.y),
        boundary(origin.z, cell.z, dir.z),
    ];

    let mut normal = [0i32; 3];
    let mut t = 0.0f32;

    while t <= max_distance {
        if let Some(block) = world.block_at(cell) {
            if is_targetable(&block) {
                let point = origin + dir * t;
                return Some(RaycastHit {
                    position: cell,
                    block,
                    normal,
                    distance: t,
                    local_hit: point - cell.to_vec3(),
                });
            }
        }

        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };

        t = t_max[axis];
        t_max[axis] += t_delta[axis];
        normal = [0, 0, 0];
        normal[axis] = -step[axis];
        match axis {
            0 => cell.x += step[0],
            1 => cell.y += step[1],
            _ => cell.z += step[2],
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::BlockId;
    use crate::world::position::ChunkPos;

    fn world_with_block(pos: VoxelPos, id: BlockId) -> World {
        let mut world = World::new(11);
        world.ensure_chunk(ChunkPos::new(0, 0));
        world.set_block(pos, id).unwrap();
        world
    }

    #[test]
    fn test_hits_block_in_front() {
        let target = VoxelPos::new(8, 100, 8);
        let world = world_with_block(target, BlockId::STONE);
        let hit = raycast(&world, Vec3::new(4.5, 100.5, 8.5), Vec3::X, 10.0).unwrap();

        assert_eq!(hit.position, target);
        assert_eq!(hit.normal, [-1, 0, 0]);
        assert_eq!(hit.adjacent(), VoxelPos::new(7, 100, 8));
        assert!((hit.distance - 3.5).abs() < 1e-4);
        assert!((hit.local_hit.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_respects_max_distance() {
        let world = world_with_block(VoxelPos::new(8, 100, 8), BlockId::STONE);
        assert!(raycast(&world, Vec3::new(4.5, 100.5, 8.5), Vec3::X, 2.0).is_none());
    }

    #[test]
    fn test_liquids_are_skipped_and_torches_targeted() {
        let mut world = world_with_block(VoxelPos::new(6, 100, 8), BlockId::WATER);
        world.set_block(VoxelPos::new(7, 100, 8), BlockId::TORCH).unwrap();
        let hit = raycast(&world, Vec3::new(4.5, 100.5, 8.5), Vec3::X, 10.0).unwrap();
        assert_eq!(hit.position, VoxelPos::new(7, 100, 8));
    }

    #[test]
    fn test_zero_direction_returns_none() {
        let world = World::new(1);
        assert!(raycast(&world, Vec3::ZERO, Vec3::ZERO, 5.0).is_none());
    }
}
