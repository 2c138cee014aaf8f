use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use super::block::{Block, BlockId, BlockShape};
use super::chunk::Chunk;
use super::error::{WorldError, WorldResult};
use super::generation::{GenerationQueue, TerrainGenerator};
use super::orientation::{self, Facing, TOP_BIT};
use super::position::{ChunkPos, VoxelPos};
use super::registry::{block_definition, is_registered};
use crate::constants::core::{CHUNK_SIZE, MAX_METADATA, WORLD_HEIGHT_I32};

/// Chunks beyond the load radius are kept for this many extra rings before unloading
const UNLOAD_MARGIN: i32 = 2;

/// The chunked voxel store
pub struct World {
    seed: u32,
    chunks: FxHashMap<ChunkPos, Chunk>,
    generator: Arc<TerrainGenerator>,
    queue: GenerationQueue,
}

impl World {
    /// World that generates chunks on the calling thread
    pub fn new(seed: u32) -> Self {
        let generator = Arc::new(TerrainGenerator::new(seed));
        Self {
            seed,
            chunks: FxHashMap::default(),
            queue: GenerationQueue::synchronous(Arc::clone(&generator)),
            generator,
        }
    }

    /// World whose streamed chunks are generated on a background thread
    pub fn with_background_generation(seed: u32) -> Self {
        let generator = Arc::new(TerrainGenerator::new(seed));
        Self {
            seed,
            chunks: FxHashMap::default(),
            queue: GenerationQueue::background(Arc::clone(&generator)),
            generator,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn check_bounds(pos: VoxelPos) -> WorldResult<()> {
        if pos.in_vertical_bounds() {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds(pos))
        }
    }

    fn check_type(id: BlockId) -> WorldResult<()> {
        if is_registered(id) {
            Ok(())
        } else {
            Err(WorldError::UnknownBlockType(id))
        }
    }

    // Chunk management

    /// Make a chunk resident. A generation request already outstanding for
    /// it is taken over rather than duplicated.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        match self.chunks.entry(pos) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let chunk = match self.queue.claim(pos) {
                    Some(chunk) => chunk,
                    None => {
                        log::debug!("[World] Generating chunk {:?}", pos);
                        self.generator.generate_chunk(pos)
                    }
                };
                entry.insert(chunk)
            }
        }
    }

    /// Synchronously generate every chunk within `radius` of `center`.
    /// Returns how many chunks were newly generated.
    pub fn ensure_area(&mut self, center: ChunkPos, radius: i32) -> usize {
        let mut generated = 0;
        for pos in center.square_around(radius) {
            if !self.chunks.contains_key(&pos) {
                self.ensure_chunk(pos);
                generated += 1;
            }
        }
        generated
    }

    /// Queue generation of missing chunks around `center` without blocking.
    /// Returns how many new requests were issued.
    pub fn request_area(&mut self, center: ChunkPos, radius: i32) -> usize {
        let mut requested = 0;
        for pos in center.square_around(radius) {
            if !self.chunks.contains_key(&pos) && self.queue.request(pos) {
                requested += 1;
            }
        }
        requested
    }

    /// Make every chunk within `radius` of `center` resident now. Finished
    /// background chunks are merged first; chunks the worker is still
    /// generating are waited for one by one, and the rest are generated here.
    /// Other outstanding requests are left for later `process_generated` calls.
    /// Returns how many chunks were added.
    pub fn ensure_area_blocking(&mut self, center: ChunkPos, radius: i32) -> usize {
        self.process_generated() + self.ensure_area(center, radius)
    }

    /// Merge finished chunks from the generation queue. Chunks that already
    /// exist are never replaced. Returns how many chunks were added.
    pub fn process_generated(&mut self) -> usize {
        let mut added = 0;
        for chunk in self.queue.drain_completed() {
            let pos = chunk.position();
            if let Entry::Vacant(entry) = self.chunks.entry(pos) {
                entry.insert(chunk);
                added += 1;
            } else {
                log::debug!("[World] Discarding duplicate generation of {:?}", pos);
            }
        }
        added
    }

    pub fn generation_queue(&self) -> &GenerationQueue {
        &self.queue
    }

    pub fn generation_queue_mut(&mut self) -> &mut GenerationQueue {
        &mut self.queue
    }

    /// Drop unmodified chunks farther than `radius + 2` from `center`; they
    /// regenerate identically from the seed. Edited chunks stay resident.
    /// Returns how many were dropped.
    pub fn unload_far_chunks(&mut self, center: ChunkPos, radius: i32) -> usize {
        let limit = radius + UNLOAD_MARGIN;
        let before = self.chunks.len();
        self.chunks
            .retain(|pos, chunk| chunk.is_modified() || pos.chebyshev_distance(center) <= limit);
        let dropped = before - self.chunks.len();
        if dropped > 0 {
            log::debug!("[World] Unloaded {} chunks around {:?}", dropped, center);
        }
        dropped
    }

    pub fn is_chunk_generated(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Insert a chunk, replacing any existing one at its position
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position(), chunk);
    }

    // Block access

    /// Read a block, generating its chunk on demand
    pub fn get_block(&mut self, pos: VoxelPos) -> WorldResult<Block> {
        Self::check_bounds(pos)?;
        let (x, y, z) = pos.local();
        Ok(self.ensure_chunk(pos.chunk_pos()).get(x, y, z))
    }

    /// Read a block without generating. `None` means the chunk is not generated yet.
    pub fn peek_block(&self, pos: VoxelPos) -> WorldResult<Option<Block>> {
        Self::check_bounds(pos)?;
        let (x, y, z) = pos.local();
        Ok(self.chunks.get(&pos.chunk_pos()).map(|chunk| chunk.get(x, y, z)))
    }

    /// Block at a position if it is in bounds and generated
    pub fn block_at(&self, pos: VoxelPos) -> Option<Block> {
        self.peek_block(pos).ok().flatten()
    }

    pub fn get_metadata(&mut self, pos: VoxelPos) -> WorldResult<u8> {
        self.get_block(pos).map(|block| block.metadata)
    }

    /// Set a block type. Metadata of the cell is reset to 0.
    pub fn set_block(&mut self, pos: VoxelPos, id: BlockId) -> WorldResult<()> {
        self.write_block(pos, Block::new(id))
    }

    /// Set the metadata of an existing block
    pub fn set_metadata(&mut self, pos: VoxelPos, value: u8) -> WorldResult<()> {
        if value > MAX_METADATA {
            return Err(WorldError::InvalidMetadata(value));
        }
        Self::check_bounds(pos)?;
        let (x, y, z) = pos.local();
        let chunk = self.chunks.get_mut(&pos.chunk_pos()).ok_or(WorldError::NoBlock(pos))?;
        if chunk.get_block(x, y, z).is_air() {
            return Err(WorldError::NoBlock(pos));
        }
        chunk.set_metadata(x, y, z, value);
        chunk.mark_modified();
        Ok(())
    }

    fn write_block(&mut self, pos: VoxelPos, block: Block) -> WorldResult<()> {
        Self::check_bounds(pos)?;
        Self::check_type(block.id)?;
        if block.metadata > MAX_METADATA {
            return Err(WorldError::InvalidMetadata(block.metadata));
        }

        let (x, y, z) = pos.local();
        let chunk = self.ensure_chunk(pos.chunk_pos());
        chunk.set(x, y, z, block);
        chunk.mark_modified();
        self.mark_border_neighbors_dirty(pos);
        Ok(())
    }

    /// Cells on a chunk edge affect how the neighbouring chunk is drawn
    fn mark_border_neighbors_dirty(&mut self, pos: VoxelPos) {
        let (x, _, z) = pos.local();
        let chunk_pos = pos.chunk_pos();
        let mut neighbors = Vec::with_capacity(2);
        if x == 0 {
            neighbors.push(chunk_pos.offset(-1, 0));
        } else if x == CHUNK_SIZE - 1 {
            neighbors.push(chunk_pos.offset(1, 0));
        }
        if z == 0 {
            neighbors.push(chunk_pos.offset(0, -1));
        } else if z == CHUNK_SIZE - 1 {
            neighbors.push(chunk_pos.offset(0, 1));
        }
        for neighbor in neighbors {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
    }

    /// Topmost non-air block y of a world column
    pub fn highest_block_y(&mut self, x: i32, z: i32) -> Option<i32> {
        let pos = VoxelPos::new(x, 0, z);
        let (lx, _, lz) = pos.local();
        self.ensure_chunk(pos.chunk_pos())
            .highest_block(lx, lz)
            .map(|y| y as i32)
    }

    // Gameplay placement rules

    /// Place a block as a player would, deriving orientation metadata from
    /// the placer's yaw and where on the face they clicked (`hit_fraction_y`
    /// in `0..1`, measured from the bottom of the clicked face).
    ///
    /// Doors occupy two cells and are written as a bottom and top half that
    /// share the same facing.
    pub fn place_block(&mut self, pos: VoxelPos, id: BlockId, yaw: f32, hit_fraction_y: f32) -> WorldResult<()> {
        Self::check_type(id)?;
        let shape = block_definition(id).map(|def| def.shape).unwrap_or(BlockShape::Empty);
        let facing = Facing::from_yaw(yaw);
        let upper_half = hit_fraction_y > 0.5;

        match shape {
            BlockShape::Door => {
                let above = pos.above();
                Self::check_bounds(pos)?;
                Self::check_bounds(above)?;
                let metadata = facing.bits();
                self.write_block(pos, Block::with_metadata(BlockId::DOOR_WOOD_BOTTOM, metadata))?;
                self.write_block(above, Block::with_metadata(BlockId::DOOR_WOOD_TOP, metadata))
            }
            BlockShape::Stairs => self.write_block(pos, Block::with_metadata(id, facing.bits())),
            BlockShape::FenceGate => {
                self.write_block(pos, Block::with_metadata(id, orientation::gate_axis_from_yaw(yaw)))
            }
            BlockShape::Trapdoor => {
                let top = if upper_half { TOP_BIT } else { 0 };
                self.write_block(pos, Block::with_metadata(id, facing.bits() | top))
            }
            BlockShape::Slab => {
                let top = if upper_half { TOP_BIT } else { 0 };
                self.write_block(pos, Block::with_metadata(id, top))
            }
            _ => self.write_block(pos, Block::new(id)),
        }
    }

    /// Remove a block, returning what was there. Breaking either door half
    /// removes the whole door.
    pub fn break_block(&mut self, pos: VoxelPos) -> WorldResult<Block> {
        let block = self.get_block(pos)?;
        if block.is_air() {
            return Err(WorldError::NoBlock(pos));
        }
        self.write_block(pos, Block::AIR)?;

        if let Some(other) = Self::door_partner(pos, block.id) {
            if let Ok(Some(partner)) = self.peek_block(other) {
                if partner.shape() == BlockShape::Door {
                    self.write_block(other, Block::AIR)?;
                }
            }
        }
        Ok(block)
    }

    fn door_partner(pos: VoxelPos, id: BlockId) -> Option<VoxelPos> {
        match id {
            BlockId::DOOR_WOOD_BOTTOM if pos.y + 1 < WORLD_HEIGHT_I32 => Some(pos.above()),
            BlockId::DOOR_WOOD_TOP if pos.y > 0 => Some(pos.below()),
            _ => None,
        }
    }

    /// Toggle the OPEN flag of a door, trapdoor or fence gate.
    ///
    /// Returns the new metadata, or `None` if the block does not open.
    /// Both halves of a door are toggled together.
    pub fn interact(&mut self, pos: VoxelPos) -> WorldResult<Option<u8>> {
        let block = self.get_block(pos)?;
        if block.is_air() {
            return Err(WorldError::NoBlock(pos));
        }
        if !block.shape().is_hinged() {
            return Ok(None);
        }

        let toggled = orientation::toggle_open(block.metadata);
        self.set_metadata(pos, toggled)?;

        if let Some(other) = Self::door_partner(pos, block.id) {
            if let Ok(Some(partner)) = self.peek_block(other) {
                if partner.shape() == BlockShape::Door {
                    let partner_meta = if orientation::is_open(toggled) {
                        partner.metadata | orientation::OPEN_BIT
                    } else {
                        partner.metadata & !orientation::OPEN_BIT
                    };
                    self.set_metadata(other, partner_meta)?;
                }
            }
        }

        log::debug!("[World] Toggled {} at {:?} -> metadata {}", block.id, pos, toggled);
        Ok(Some(toggled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::orientation::{is_open, OPEN_BIT};

    fn flat_world() -> World {
        let mut world = World::new(1);
        world.ensure_chunk(ChunkPos::new(0, 0));
        world
    }

    #[test]
    fn test_set_then_get_returns_type_with_zero_metadata() {
        let mut world = flat_world();
        let pos = VoxelPos::new(3, 60, 3);
        world.set_block(pos, BlockId::BRICK).unwrap();
        assert_eq!(world.get_block(pos).unwrap(), Block::new(BlockId::BRICK));

        world.set_metadata(pos, 7).unwrap();
        assert_eq!(world.get_metadata(pos).unwrap(), 7);

        world.set_block(pos, BlockId::STONE).unwrap();
        assert_eq!(world.get_metadata(pos).unwrap(), 0);
    }

    #[test]
    fn test_bounds_and_validation() {
        let mut world = flat_world();
        assert_eq!(
            world.get_block(VoxelPos::new(0, 128, 0)),
            Err(WorldError::OutOfBounds(VoxelPos::new(0, 128, 0)))
        );
        assert_eq!(
            world.set_block(VoxelPos::new(0, -1, 0), BlockId::STONE),
            Err(WorldError::OutOfBounds(VoxelPos::new(0, -1, 0)))
        );
        assert_eq!(
            world.set_block(VoxelPos::new(0, 50, 0), BlockId(999)),
            Err(WorldError::UnknownBlockType(BlockId(999)))
        );

        let pos = VoxelPos::new(1, 50, 1);
        world.set_block(pos, BlockId::STONE).unwrap();
        assert_eq!(world.set_metadata(pos, 16), Err(WorldError::InvalidMetadata(16)));
        assert_eq!(world.get_metadata(pos).unwrap(), 0);
    }

    #[test]
    fn test_set_metadata_on_air_or_ungenerated_is_no_block() {
        let mut world = flat_world();
        let air = VoxelPos::new(2, 120, 2);
        assert_eq!(world.set_metadata(air, 1), Err(WorldError::NoBlock(air)));

        let far = VoxelPos::new(10_000, 5, 10_000);
        assert_eq!(world.set_metadata(far, 1), Err(WorldError::NoBlock(far)));
        assert!(!world.is_chunk_generated(far.chunk_pos()));
    }

    #[test]
    fn test_peek_does_not_generate() {
        let mut world = World::new(5);
        let pos = VoxelPos::new(-40, 10, 70);
        assert_eq!(world.peek_block(pos), Ok(None));
        assert_eq!(world.chunk_count(), 0);

        let block = world.get_block(pos).unwrap();
        assert_eq!(world.peek_block(pos), Ok(Some(block)));
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn test_generation_is_lazy_and_deterministic() {
        let mut a = World::new(99);
        let mut b = World::new(99);
        let pos = VoxelPos::new(-5, 12, 33);
        assert_eq!(a.get_block(pos).unwrap(), b.get_block(pos).unwrap());
        assert_eq!(a.chunk(pos.chunk_pos()), b.chunk(pos.chunk_pos()));
    }

    #[test]
    fn test_door_placement_writes_both_halves() {
        let mut world = flat_world();
        let bottom = VoxelPos::new(5, 100, 5);
        world.place_block(bottom, BlockId::DOOR_WOOD_BOTTOM, 0.0, 0.0).unwrap();

        assert_eq!(world.get_block(bottom).unwrap(), Block::new(BlockId::DOOR_WOOD_BOTTOM));
        assert_eq!(world.get_block(bottom.above()).unwrap(), Block::new(BlockId::DOOR_WOOD_TOP));

        // Metadata was fixed at placement and ignores later yaw
        assert_eq!(world.get_metadata(bottom).unwrap(), 0);
        assert_eq!(world.get_metadata(bottom.above()).unwrap(), 0);
    }

    #[test]
    fn test_interact_toggles_both_door_halves() {
        let mut world = flat_world();
        let bottom = VoxelPos::new(5, 100, 5);
        world
            .place_block(bottom, BlockId::DOOR_WOOD_BOTTOM, std::f32::consts::PI, 0.0)
            .unwrap();

        let meta = world.interact(bottom.above()).unwrap().unwrap();
        assert!(is_open(meta));
        assert_eq!(world.get_metadata(bottom).unwrap(), Facing::West.bits() | OPEN_BIT);

        world.interact(bottom).unwrap();
        assert_eq!(world.get_metadata(bottom).unwrap(), Facing::West.bits());
        assert_eq!(world.get_metadata(bottom.above()).unwrap(), Facing::West.bits());
    }

    #[test]
    fn test_interact_with_plain_block_does_nothing() {
        let mut world = flat_world();
        let pos = VoxelPos::new(1, 90, 1);
        world.set_block(pos, BlockId::STONE).unwrap();
        assert_eq!(world.interact(pos), Ok(None));
        assert_eq!(world.interact(pos.above()), Err(WorldError::NoBlock(pos.above())));
    }

    #[test]
    fn test_placement_orientation_rules() {
        let mut world = flat_world();
        let stairs = VoxelPos::new(1, 90, 1);
        world
            .place_block(stairs, BlockId::STAIRS_WOOD, std::f32::consts::FRAC_PI_2, 0.0)
            .unwrap();
        assert_eq!(world.get_metadata(stairs).unwrap(), Facing::South.bits());

        let gate = VoxelPos::new(2, 90, 1);
        world
            .place_block(gate, BlockId::FENCE_GATE, std::f32::consts::FRAC_PI_2, 0.0)
            .unwrap();
        assert_eq!(world.get_metadata(gate).unwrap(), 1);

        let trapdoor = VoxelPos::new(3, 90, 1);
        world.place_block(trapdoor, BlockId::TRAPDOOR, 0.0, 0.75).unwrap();
        assert_eq!(world.get_metadata(trapdoor).unwrap(), TOP_BIT);

        let slab = VoxelPos::new(4, 90, 1);
        world.place_block(slab, BlockId::SLAB_STONE, 1.0, 0.25).unwrap();
        assert_eq!(world.get_metadata(slab).unwrap(), 0);
    }

    #[test]
    fn test_break_door_removes_both_halves() {
        let mut world = flat_world();
        let bottom = VoxelPos::new(6, 100, 6);
        world.place_block(bottom, BlockId::DOOR_WOOD_BOTTOM, 0.0, 0.0).unwrap();

        let removed = world.break_block(bottom.above()).unwrap();
        assert_eq!(removed.id, BlockId::DOOR_WOOD_TOP);
        assert!(world.get_block(bottom).unwrap().is_air());
        assert_eq!(world.break_block(bottom), Err(WorldError::NoBlock(bottom)));
    }

    #[test]
    fn test_process_generated_never_overwrites() {
        let mut world = World::new(8);
        let pos = ChunkPos::new(0, 0);
        assert_eq!(world.request_area(pos, 0), 1);

        // Edit the chunk synchronously while the request is outstanding
        let voxel = VoxelPos::new(0, 100, 0);
        world.set_block(voxel, BlockId::GLASS).unwrap();

        assert_eq!(world.process_generated(), 0);
        assert_eq!(world.get_block(voxel).unwrap().id, BlockId::GLASS);
    }

    #[test]
    fn test_unload_far_chunks() {
        let mut world = World::new(2);
        world.ensure_area(ChunkPos::new(0, 0), 1);
        world.ensure_chunk(ChunkPos::new(10, 10));
        assert_eq!(world.chunk_count(), 10);

        assert_eq!(world.unload_far_chunks(ChunkPos::new(0, 0), 1), 1);
        assert_eq!(world.chunk_count(), 9);

        world.set_block(VoxelPos::new(160, 64, 160), BlockId::STONE).unwrap();
        assert_eq!(world.unload_far_chunks(ChunkPos::new(0, 0), 1), 0);
        assert!(world.is_chunk_generated(ChunkPos::new(10, 10)));
    }

    #[test]
    fn test_ensure_area_blocking_with_background_worker() {
        let mut world = World::with_background_generation(8);
        let center = ChunkPos::new(2, -2);
        world.request_area(center, 3);

        let added = world.ensure_area_blocking(center, 1);
        assert!(added >= 9);
        for pos in center.square_around(1) {
            assert!(world.is_chunk_generated(pos));
            assert!(!world.generation_queue().is_in_flight(pos));
        }
        assert_eq!(world.chunk(center), Some(&TerrainGenerator::new(8).generate_chunk(center)));

        // The outer rings arrive through the normal merge path
        while world.generation_queue().in_flight_count() > 0 {
            world.process_generated();
            std::thread::yield_now();
        }
        assert_eq!(world.chunk_count(), 49);
    }

    #[test]
    fn test_sync_read_takes_over_pending_request() {
        let mut world = World::new(8);
        let pos = ChunkPos::new(5, 5);
        assert_eq!(world.request_area(pos, 0), 1);

        world.get_block(VoxelPos::new(80, 10, 80)).unwrap();
        assert!(world.is_chunk_generated(pos));
        assert!(!world.generation_queue().is_in_flight(pos));
        assert_eq!(world.process_generated(), 0);
    }

    #[test]
    fn test_sync_read_waits_for_background_request() {
        let mut world = World::with_background_generation(8);
        let pos = ChunkPos::new(5, 5);
        assert_eq!(world.request_area(pos, 0), 1);

        let voxel = VoxelPos::new(80, 100, 80);
        world.set_block(voxel, BlockId::GLASS).unwrap();
        assert!(!world.generation_queue().is_in_flight(pos));
        assert_eq!(world.generation_queue().in_flight_count(), 0);

        // Nothing is left to arrive and replace the edited chunk
        assert_eq!(world.process_generated(), 0);
        assert_eq!(world.get_block(voxel).unwrap().id, BlockId::GLASS);
        assert!(world.chunk(pos).map_or(false, |chunk| chunk.is_modified()));
    }

    #[test]
    fn test_highest_block_y_is_above_water() {
        let mut world = World::new(4);
        let top = world.highest_block_y(8, 8).unwrap();
        assert!(top >= crate::constants::terrain::WATER_LEVEL);
    }
}
