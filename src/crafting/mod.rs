//! Recipe catalog, recipe discovery, crafting and furnace smelting

pub mod book;
pub mod error;
pub mod recipe;
pub mod registry;
pub mod smelting;

pub use book::{available_recipes, craft, CraftOutcome, DiscoveryPolicy, RecipeBook, STARTER_RECIPES};
pub use error::{CraftingError, CraftingResult};
pub use recipe::{Recipe, SmeltingRecipe};
pub use registry::{RecipeRegistry, RECIPE_REGISTRY};
pub use smelting::{is_fuel, smelt, smelting_result};
