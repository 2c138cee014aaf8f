use thiserror::Error;

use crate::config::ConfigError;
use crate::crafting::CraftingError;
use crate::persistence::PersistenceError;
use crate::player::InventoryError;
use crate::world::WorldError;

/// Any failure surfaced through the game session
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Crafting(#[from] CraftingError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    InvalidCommand(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
