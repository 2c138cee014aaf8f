use super::block::{Block, BlockId};
use super::position::ChunkPos;
use crate::constants::core::{BLOCKS_PER_CHUNK, CHUNK_SIZE, MAX_METADATA, WORLD_HEIGHT};

/// A 16 x 128 x 16 column of voxels with per-cell metadata
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkPos,
    blocks: Vec<BlockId>,
    metadata: Vec<u8>,
    dirty: bool,
    modified: bool,
}

// Bookkeeping flags are not part of a chunk's contents
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.blocks == other.blocks && self.metadata == other.metadata
    }
}

impl Eq for Chunk {}

impl Chunk {
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            blocks: vec![BlockId::AIR; BLOCKS_PER_CHUNK],
            metadata: vec![0; BLOCKS_PER_CHUNK],
            dirty: true,
            modified: false,
        }
    }

    /// Rebuild a chunk from raw arrays; `None` if either array has the wrong length
    pub fn from_parts(position: ChunkPos, blocks: Vec<BlockId>, metadata: Vec<u8>) -> Option<Self> {
        if blocks.len() != BLOCKS_PER_CHUNK || metadata.len() != BLOCKS_PER_CHUNK {
            return None;
        }
        Some(Self {
            position,
            blocks,
            metadata,
            dirty: true,
            modified: false,
        })
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Index of a local coordinate: x + z*16 + y*256
    #[inline]
    pub fn index(x: u32, y: u32, z: u32) -> usize {
        (x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize
    }

    #[inline]
    fn in_bounds(x: u32, y: u32, z: u32) -> bool {
        x < CHUNK_SIZE && y < WORLD_HEIGHT && z < CHUNK_SIZE
    }

    /// Block type at a local position, air outside the chunk
    pub fn get_block(&self, x: u32, y: u32, z: u32) -> BlockId {
        if !Self::in_bounds(x, y, z) {
            return BlockId::AIR;
        }
        self.blocks.get(Self::index(x, y, z)).copied().unwrap_or(BlockId::AIR)
    }

    pub fn get_metadata(&self, x: u32, y: u32, z: u32) -> u8 {
        if !Self::in_bounds(x, y, z) {
            return 0;
        }
        self.metadata.get(Self::index(x, y, z)).copied().unwrap_or(0)
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> Block {
        Block {
            id: self.get_block(x, y, z),
            metadata: self.get_metadata(x, y, z),
        }
    }

    /// Set a block type; metadata of the cell is reset to 0
    pub fn set_block(&mut self, x: u32, y: u32, z: u32, block: BlockId) {
        self.set(x, y, z, Block::new(block));
    }

    /// Set block type and metadata together
    pub fn set(&mut self, x: u32, y: u32, z: u32, block: Block) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        let index = Self::index(x, y, z);
        if let (Some(id), Some(meta)) = (self.blocks.get_mut(index), self.metadata.get_mut(index)) {
            *id = block.id;
            *meta = block.metadata.min(MAX_METADATA);
            self.dirty = true;
        }
    }

    pub fn set_metadata(&mut self, x: u32, y: u32, z: u32, value: u8) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        if let Some(meta) = self.metadata.get_mut(Self::index(x, y, z)) {
            *meta = value.min(MAX_METADATA);
            self.dirty = true;
        }
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    /// Topmost non-air local y in a column
    pub fn highest_block(&self, x: u32, z: u32) -> Option<u32> {
        (0..WORLD_HEIGHT).rev().find(|&y| !self.get_block(x, y, z).is_air())
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    /// Needs re-meshing by a presentation layer
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Changed by gameplay since generation or load
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new(ChunkPos::new(0, 0));
        assert_eq!(chunk.get_block(0, 0, 0), BlockId::AIR);
        assert_eq!(chunk.non_air_count(), 0);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_index_layout() {
        assert_eq!(Chunk::index(0, 0, 0), 0);
        assert_eq!(Chunk::index(1, 0, 0), 1);
        assert_eq!(Chunk::index(0, 0, 1), 16);
        assert_eq!(Chunk::index(0, 1, 0), 256);
        assert_eq!(Chunk::index(15, 127, 15), BLOCKS_PER_CHUNK - 1);
    }

    #[test]
    fn test_set_block_resets_metadata() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set(3, 10, 4, Block::with_metadata(BlockId::STAIRS_WOOD, 3));
        assert_eq!(chunk.get_metadata(3, 10, 4), 3);

        chunk.set_block(3, 10, 4, BlockId::STONE);
        assert_eq!(chunk.get(3, 10, 4), Block::new(BlockId::STONE));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set_block(16, 0, 0, BlockId::STONE);
        chunk.set_block(0, 128, 0, BlockId::STONE);
        assert_eq!(chunk.non_air_count(), 0);
        assert_eq!(chunk.get_block(0, 200, 0), BlockId::AIR);
    }

    #[test]
    fn test_from_parts_checks_length() {
        let pos = ChunkPos::new(1, 1);
        assert!(Chunk::from_parts(pos, vec![BlockId::AIR; 10], vec![0; 10]).is_none());
        let chunk = Chunk::from_parts(pos, vec![BlockId::STONE; BLOCKS_PER_CHUNK], vec![0; BLOCKS_PER_CHUNK]);
        assert_eq!(chunk.map(|c| c.highest_block(0, 0)), Some(Some(WORLD_HEIGHT - 1)));
    }
}
