use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::core::{CHUNK_SIZE_I32, WORLD_HEIGHT_I32};

/// Position of a chunk column in the world (chunk coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the given world block column
    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        Self::new(world_x.div_euclid(CHUNK_SIZE_I32), world_z.div_euclid(CHUNK_SIZE_I32))
    }

    /// World block coordinates of this chunk's (0, 0) corner
    pub fn origin(&self) -> (i32, i32) {
        (self.x * CHUNK_SIZE_I32, self.z * CHUNK_SIZE_I32)
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Chebyshev distance in chunks, the metric used for load radii
    pub fn chebyshev_distance(&self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// All chunk positions within `radius` of this one, nearest rings first
    pub fn square_around(&self, radius: i32) -> Vec<ChunkPos> {
        let mut out = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)).max(0) as usize);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                out.push(self.offset(dx, dz));
            }
        }
        out.sort_by_key(|p| p.chebyshev_distance(*self));
        out
    }
}

/// Position of a voxel in the world (world block coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Voxel containing a world-space point
    pub fn from_world(point: Vec3) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32, point.z.floor() as i32)
    }

    pub fn chunk_pos(&self) -> ChunkPos {
        ChunkPos::from_world(self.x, self.z)
    }

    /// Position inside the owning chunk, each axis in `0..CHUNK_SIZE`
    pub fn local(&self) -> (u32, u32, u32) {
        (
            self.x.rem_euclid(CHUNK_SIZE_I32) as u32,
            self.y as u32,
            self.z.rem_euclid(CHUNK_SIZE_I32) as u32,
        )
    }

    /// Whether y lies inside the world's vertical extent
    pub fn in_vertical_bounds(&self) -> bool {
        (0..WORLD_HEIGHT_I32).contains(&self.y)
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn above(&self) -> Self {
        self.offset(0, 1, 0)
    }

    pub fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Minimum corner in world space
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl From<(i32, i32, i32)> for VoxelPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinates_use_euclidean_division() {
        let pos = VoxelPos::new(-1, 5, -17);
        assert_eq!(pos.chunk_pos(), ChunkPos::new(-1, -2));
        assert_eq!(pos.local(), (15, 5, 15));

        let pos = VoxelPos::new(16, 0, 0);
        assert_eq!(pos.chunk_pos(), ChunkPos::new(1, 0));
        assert_eq!(pos.local(), (0, 0, 0));
    }

    #[test]
    fn test_vertical_bounds() {
        assert!(VoxelPos::new(0, 0, 0).in_vertical_bounds());
        assert!(VoxelPos::new(0, 127, 0).in_vertical_bounds());
        assert!(!VoxelPos::new(0, 128, 0).in_vertical_bounds());
        assert!(!VoxelPos::new(0, -1, 0).in_vertical_bounds());
    }

    #[test]
    fn test_from_world_floors() {
        assert_eq!(VoxelPos::from_world(Vec3::new(-0.5, 1.9, 3.0)), VoxelPos::new(-1, 1, 3));
    }

    #[test]
    fn test_square_around_is_sorted_by_ring() {
        let center = ChunkPos::new(2, -3);
        let ring = center.square_around(1);
        assert_eq!(ring.len(), 9);
        assert_eq!(ring[0], center);
        assert!(ring.iter().all(|p| p.chebyshev_distance(center) <= 1));
    }
}
