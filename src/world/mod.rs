//! Chunked voxel world: blocks, metadata, generation and placement rules

pub mod block;
pub mod chunk;
pub mod error;
pub mod generation;
pub mod orientation;
pub mod position;
pub mod raycast;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod world;

pub use block::{Block, BlockDefinition, BlockId, BlockShape};
pub use chunk::Chunk;
pub use error::{WorldError, WorldResult};
pub use generation::{GenerationQueue, TerrainGenerator};
pub use orientation::Facing;
pub use position::{ChunkPos, VoxelPos};
pub use raycast::{raycast, RaycastHit};
pub use registry::{block_definition, is_registered, BlockRegistry, BLOCK_REGISTRY};
pub use world::World;
