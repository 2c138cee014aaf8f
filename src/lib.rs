//! Voxel sandbox core engine
//!
//! A chunked voxel world with deterministic terrain generation, player
//! physics against the block grid, projectile combat, recipe crafting, a
//! day/night clock and named save slots. [`game::GameSession`] owns one
//! running game and drives everything through a fixed tick order.

pub mod combat;
pub mod config;
pub mod constants;
pub mod crafting;
pub mod error;
pub mod game;
pub mod item;
pub mod persistence;
pub mod physics;
pub mod player;
pub mod time;
pub mod world;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use game::{CommandOutcome, GameCommand, GameSession, TickReport};
pub use player::{Player, PlayerInput};
pub use world::{Block, BlockId, Chunk, ChunkPos, VoxelPos, World};
