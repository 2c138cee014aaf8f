use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::core::{CHUNK_SIZE, WORLD_HEIGHT_I32};
use crate::constants::terrain::*;
use crate::world::block::BlockId;
use crate::world::chunk::Chunk;
use crate::world::position::ChunkPos;

/// Local x/z range where trees and cacti may be rooted so that they never
/// reach past the chunk border.
const FEATURE_MIN: u32 = 2;
const FEATURE_MAX: u32 = CHUNK_SIZE - 3;

/// Deterministic terrain generator. Output depends only on `(seed, ChunkPos)`.
pub struct TerrainGenerator {
    height_noise: Perlin,
    detail_noise: Perlin,
    cave_noise: Perlin,
    seed: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            height_noise: Perlin::new(seed),
            detail_noise: Perlin::new(seed.wrapping_add(1)),
            cave_noise: Perlin::new(seed.wrapping_add(2)),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Surface height of a world column
    pub fn get_height(&self, world_x: i32, world_z: i32) -> i32 {
        let x = world_x as f64;
        let z = world_z as f64;
        let base = self.height_noise.get([x * HEIGHT_SCALE, z * HEIGHT_SCALE]) * HEIGHT_AMPLITUDE;
        let detail = self.detail_noise.get([x * DETAIL_SCALE, z * DETAIL_SCALE]) * DETAIL_AMPLITUDE;
        let height = (BASE_HEIGHT + base + detail).floor() as i32;
        height.clamp(1, WORLD_HEIGHT_I32 - 16)
    }

    fn is_cave(&self, world_x: i32, y: i32, world_z: i32) -> bool {
        let sample = self.cave_noise.get([
            world_x as f64 * CAVE_SCALE,
            y as f64 * CAVE_SCALE,
            world_z as f64 * CAVE_SCALE,
        ]);
        sample > CAVE_THRESHOLD
    }

    /// RNG seed for a chunk's ores and decorations
    pub fn chunk_seed(&self, pos: ChunkPos) -> u64 {
        let mut h = self.seed as u64 ^ 0x9E37_79B9_7F4A_7C15;
        h = h.wrapping_mul(0x100_0000_01B3) ^ (pos.x as u32 as u64);
        h = h.wrapping_mul(0x100_0000_01B3) ^ ((pos.z as u32 as u64) << 32);
        h ^ (h >> 29)
    }

    /// Generate the full contents of a chunk
    pub fn generate_chunk(&self, pos: ChunkPos) -> Chunk {
        let mut chunk = Chunk::new(pos);
        let mut rng = StdRng::seed_from_u64(self.chunk_seed(pos));
        let (origin_x, origin_z) = pos.origin();

        let mut heights = [[0i32; CHUNK_SIZE as usize]; CHUNK_SIZE as usize];

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let wx = origin_x + lx as i32;
                let wz = origin_z + lz as i32;
                let height = self.get_height(wx, wz);
                heights[lx as usize][lz as usize] = height;
                self.fill_column(&mut chunk, &mut rng, lx, lz, wx, wz, height);
            }
        }

        for lx in FEATURE_MIN..=FEATURE_MAX {
            for lz in FEATURE_MIN..=FEATURE_MAX {
                let height = heights[lx as usize][lz as usize];
                let surface = chunk.get_block(lx, height as u32, lz);
                if surface == BlockId::GRASS && rng.gen::<f64>() < TREE_CHANCE {
                    Self::place_tree(&mut chunk, &mut rng, lx, height as u32 + 1, lz);
                } else if surface == BlockId::SAND
                    && height > WATER_LEVEL
                    && height < BEACH_LEVEL
                    && rng.gen::<f64>() < CACTUS_CHANCE
                {
                    Self::place_cactus(&mut chunk, &mut rng, lx, height as u32 + 1, lz);
                }
            }
        }

        chunk.clear_dirty();
        chunk
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_column(
        &self,
        chunk: &mut Chunk,
        rng: &mut StdRng,
        lx: u32,
        lz: u32,
        wx: i32,
        wz: i32,
        height: i32,
    ) {
        let beach = height < BEACH_LEVEL;

        for y in 0..=height {
            let block = if y == 0 {
                BlockId::BEDROCK
            } else if y < height - 3 {
                if y > 1 && self.is_cave(wx, y, wz) {
                    BlockId::AIR
                } else {
                    Self::stone_or_ore(rng, y)
                }
            } else if y < height {
                if beach {
                    BlockId::SAND
                } else {
                    BlockId::DIRT
                }
            } else if beach {
                BlockId::SAND
            } else {
                BlockId::GRASS
            };
            chunk.set_block(lx, y as u32, lz, block);
        }

        for y in (height + 1)..=WATER_LEVEL {
            chunk.set_block(lx, y as u32, lz, BlockId::WATER);
        }
    }

    fn stone_or_ore(rng: &mut StdRng, y: i32) -> BlockId {
        let roll: f64 = rng.gen();
        if roll < COAL_CHANCE {
            BlockId::COAL_ORE
        } else if y < 20 && roll < COAL_CHANCE + IRON_CHANCE {
            BlockId::IRON_ORE
        } else if y < 10 && roll < COAL_CHANCE + IRON_CHANCE + DIAMOND_CHANCE {
            BlockId::DIAMOND_ORE
        } else {
            BlockId::STONE
        }
    }

    fn place_tree(chunk: &mut Chunk, rng: &mut StdRng, lx: u32, base_y: u32, lz: u32) {
        let trunk_height: u32 = rng.gen_range(4..=6);
        let top = base_y + trunk_height;
        if top as i32 + 2 >= WORLD_HEIGHT_I32 {
            return;
        }

        for dy in (top - 2)..=(top + 1) {
            let radius: i32 = if dy > top { 1 } else { 2 };
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    let x = (lx as i32 + dx) as u32;
                    let z = (lz as i32 + dz) as u32;
                    if chunk.get_block(x, dy, z).is_air() {
                        chunk.set_block(x, dy, z, BlockId::LEAVES);
                    }
                }
            }
        }

        for y in base_y..top {
            chunk.set_block(lx, y, lz, BlockId::WOOD);
        }
    }

    fn place_cactus(chunk: &mut Chunk, rng: &mut StdRng, lx: u32, base_y: u32, lz: u32) {
        let height: u32 = rng.gen_range(1..=3);
        for y in base_y..base_y + height {
            chunk.set_block(lx, y, lz, BlockId::CACTUS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = TerrainGenerator::new(12345);
        let b = TerrainGenerator::new(12345);
        for pos in [ChunkPos::new(0, 0), ChunkPos::new(-3, 7), ChunkPos::new(100, -100)] {
            assert_eq!(a.generate_chunk(pos), b.generate_chunk(pos));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = TerrainGenerator::new(1).generate_chunk(ChunkPos::new(0, 0));
        let b = TerrainGenerator::new(2).generate_chunk(ChunkPos::new(0, 0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_bedrock_floor_and_water_level() {
        let generator = TerrainGenerator::new(42);
        let chunk = generator.generate_chunk(ChunkPos::new(1, 2));
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                assert_eq!(chunk.get_block(x, 0, z), BlockId::BEDROCK);
                // Low columns are flooded up to the water line
                let top = chunk.highest_block(x, z).unwrap_or(0) as i32;
                assert!(top >= WATER_LEVEL, "column ({x},{z}) top {top} below water level");
            }
        }
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn test_height_stays_in_world() {
        let generator = TerrainGenerator::new(7);
        for x in -200..200 {
            let h = generator.get_height(x * 13, x * 7);
            assert!(h >= 1 && h < WORLD_HEIGHT_I32);
        }
    }

    #[test]
    fn test_chunk_seed_varies_by_position() {
        let generator = TerrainGenerator::new(9);
        let a = generator.chunk_seed(ChunkPos::new(0, 1));
        let b = generator.chunk_seed(ChunkPos::new(1, 0));
        assert_ne!(a, b);
    }
}
