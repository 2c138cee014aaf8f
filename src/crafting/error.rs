use thiserror::Error;

use crate::item::ItemId;

/// Errors raised when crafting or smelting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftingError {
    #[error("Unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("Insufficient materials: need {required} {item}, have {available}")]
    InsufficientMaterials { item: ItemId, required: u32, available: u32 },

    #[error("No room in inventory for the output of '{0}'")]
    InventoryFull(String),

    #[error("{0} cannot be smelted")]
    NotSmeltable(ItemId),

    #[error("{0} is not a furnace fuel")]
    NotFuel(ItemId),
}

pub type CraftingResult<T> = Result<T, CraftingError>;
