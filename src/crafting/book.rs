use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::{CraftingError, CraftingResult};
use super::recipe::Recipe;
use super::registry::RECIPE_REGISTRY;
use crate::item::ItemId;
use crate::player::Inventory;

/// Recipes every player knows under [`DiscoveryPolicy::EverHeld`]
pub const STARTER_RECIPES: [&str; 3] = ["planks", "stick", "furnace"];

/// Rule deciding which recipes are listed to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryPolicy {
    /// Listed when every ingredient is in the inventory right now (any quantity)
    #[default]
    CurrentlyHeld,
    /// Listed when every ingredient has ever been held, plus the starter set
    EverHeld,
}

/// Result of a successful craft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOutcome {
    pub recipe_id: String,
    pub output: ItemId,
    pub count: u32,
}

/// Recipe listing under a discovery policy
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    policy: DiscoveryPolicy,
}

impl RecipeBook {
    pub fn new(policy: DiscoveryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DiscoveryPolicy {
        self.policy
    }

    /// Whether a recipe is listed for a player holding `inventory` who has
    /// ever held the items in `discovered`
    pub fn is_listed(&self, recipe: &Recipe, inventory: &Inventory, discovered: &BTreeSet<ItemId>) -> bool {
        match self.policy {
            DiscoveryPolicy::CurrentlyHeld => recipe.ingredient_items().all(|item| inventory.has_item(item)),
            DiscoveryPolicy::EverHeld => {
                STARTER_RECIPES.contains(&recipe.id.as_str())
                    || recipe
                        .ingredient_items()
                        .all(|item| discovered.contains(&item) || inventory.has_item(item))
            }
        }
    }

    /// Recipes listed for the player, in catalog order
    pub fn available_recipes(&self, inventory: &Inventory, discovered: &BTreeSet<ItemId>) -> Vec<&'static Recipe> {
        RECIPE_REGISTRY
            .recipes()
            .iter()
            .filter(|recipe| self.is_listed(recipe, inventory, discovered))
            .collect()
    }
}

/// Recipes whose every ingredient is currently held, in any quantity
pub fn available_recipes(inventory: &Inventory) -> Vec<&'static Recipe> {
    RecipeBook::default().available_recipes(inventory, &BTreeSet::new())
}

/// Craft a recipe named by id or display name.
///
/// Quantities are checked in full, then ingredients are removed and the
/// output added on a copy of the inventory. The copy replaces the inventory
/// only if every step succeeded, so a failed craft changes nothing.
pub fn craft(recipe_key: &str, inventory: &mut Inventory) -> CraftingResult<CraftOutcome> {
    let recipe = RECIPE_REGISTRY
        .find(recipe_key)
        .ok_or_else(|| CraftingError::UnknownRecipe(recipe_key.to_string()))?;

    for (&item, &required) in &recipe.ingredients {
        let available = inventory.count_of(item);
        if available < required {
            return Err(CraftingError::InsufficientMaterials {
                item,
                required,
                available,
            });
        }
    }

    let mut scratch = inventory.clone();
    for (&item, &required) in &recipe.ingredients {
        scratch
            .remove_item(item, required)
            .map_err(|_| CraftingError::InsufficientMaterials {
                item,
                required,
                available: inventory.count_of(item),
            })?;
    }

    let leftover = scratch
        .add_item(recipe.output, recipe.output_count)
        .map_err(|_| CraftingError::InventoryFull(recipe.id.clone()))?;
    if leftover > 0 {
        return Err(CraftingError::InventoryFull(recipe.id.clone()));
    }

    *inventory = scratch;
    log::info!("[Crafting] Crafted {} x{}", recipe.output, recipe.output_count);

    Ok(CraftOutcome {
        recipe_id: recipe.id.clone(),
        output: recipe.output,
        count: recipe.output_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStack;
    use crate::world::BlockId;

    fn wood_only() -> Inventory {
        let mut inv = Inventory::new();
        inv.add_item(ItemId::from(BlockId::WOOD), 1).unwrap();
        inv
    }

    fn ids(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_wood_lists_planks_but_not_fence() {
        let listed = ids(&available_recipes(&wood_only()));
        assert!(listed.contains(&"planks".to_string()));
        assert!(!listed.contains(&"fence".to_string()));
        assert!(!listed.contains(&"furnace".to_string()));
    }

    #[test]
    fn test_any_quantity_is_enough_to_list() {
        let mut inv = Inventory::new();
        inv.add_item(ItemId::from(BlockId::COBBLESTONE), 1).unwrap();
        let listed = ids(&available_recipes(&inv));
        assert!(listed.contains(&"furnace".to_string()));
    }

    #[test]
    fn test_craft_furnace_without_cobblestone_changes_nothing() {
        let mut inv = wood_only();
        let before = inv.clone();
        let err = craft("Furnace", &mut inv).unwrap_err();
        assert_eq!(
            err,
            CraftingError::InsufficientMaterials {
                item: ItemId::from(BlockId::COBBLESTONE),
                required: 8,
                available: 0,
            }
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_craft_planks_and_sticks() {
        let mut inv = wood_only();
        let outcome = craft("Planks", &mut inv).unwrap();
        assert_eq!(outcome.count, 4);
        assert_eq!(inv.count_of(ItemId::from(BlockId::WOOD)), 0);
        assert_eq!(inv.count_of(ItemId::from(BlockId::PLANKS)), 4);

        craft("stick", &mut inv).unwrap();
        assert_eq!(inv.count_of(ItemId::from(BlockId::PLANKS)), 2);
        assert_eq!(inv.count_of(ItemId::STICK), 4);
    }

    #[test]
    fn test_unknown_recipe() {
        let mut inv = wood_only();
        assert_eq!(craft("Warp Drive", &mut inv), Err(CraftingError::UnknownRecipe("Warp Drive".to_string())));
    }

    #[test]
    fn test_full_inventory_rejects_output() {
        let mut inv = Inventory::new();
        inv.set_slot(0, Some(ItemStack::new(ItemId::from(BlockId::COBBLESTONE), 64))).unwrap();
        for slot in 1..36 {
            inv.set_slot(slot, Some(ItemStack::new(ItemId::SWORD_WOOD, 1))).unwrap();
        }
        let before = inv.clone();

        // Eight cobblestone leave the stack non-empty, so the furnace has nowhere to go
        assert_eq!(craft("furnace", &mut inv), Err(CraftingError::InventoryFull("furnace".to_string())));
        assert_eq!(inv, before);
    }

    #[test]
    fn test_ever_held_policy_remembers_items() {
        let book = RecipeBook::new(DiscoveryPolicy::EverHeld);
        let empty = Inventory::new();
        let mut discovered = BTreeSet::new();

        let listed = ids(&book.available_recipes(&empty, &discovered));
        assert_eq!(listed, vec!["planks", "furnace", "stick"]);

        discovered.insert(ItemId::from(BlockId::DIRT));
        let listed = ids(&book.available_recipes(&empty, &discovered));
        assert!(listed.contains(&"bricks".to_string()));
    }
}
