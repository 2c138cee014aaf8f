use thiserror::Error;

use super::block::BlockId;
use super::position::VoxelPos;

/// Errors raised by the world store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("Position {0:?} is outside the world's vertical bounds")]
    OutOfBounds(VoxelPos),

    #[error("Unknown block type id {0}")]
    UnknownBlockType(BlockId),

    #[error("Metadata value {0} does not fit in 4 bits")]
    InvalidMetadata(u8),

    #[error("No block at {0:?}")]
    NoBlock(VoxelPos),
}

pub type WorldResult<T> = Result<T, WorldError>;
