//! Player state, movement input and inventory

pub mod input;
pub mod inventory;
#[allow(clippy::module_inception)]
pub mod player;

pub use input::PlayerInput;
pub use inventory::{Inventory, InventoryError, InventoryResult, ToolWear};
pub use player::{Player, PlayerTickReport};
