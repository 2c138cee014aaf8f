use std::collections::BTreeMap;

use crate::item::ItemId;

/// A shapeless crafting recipe: fixed ingredient quantities in, one stack out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Stable identifier, e.g. `"planks"`
    pub id: String,
    /// Name shown to players, e.g. `"Planks"`
    pub name: String,
    pub ingredients: BTreeMap<ItemId, u32>,
    pub output: ItemId,
    pub output_count: u32,
}

impl Recipe {
    pub fn new(id: &str, name: &str, ingredients: &[(ItemId, u32)], output: ItemId, output_count: u32) -> Self {
        let mut map = BTreeMap::new();
        for &(item, count) in ingredients {
            *map.entry(item).or_insert(0) += count;
        }
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ingredients: map,
            output,
            output_count,
        }
    }

    /// Whether `key` names this recipe, by id or display name (case-insensitive)
    pub fn matches_key(&self, key: &str) -> bool {
        self.id.eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }

    pub fn uses(&self, item: ItemId) -> bool {
        self.ingredients.contains_key(&item)
    }

    pub fn ingredient_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ingredients.keys().copied()
    }
}

/// Furnace recipe: one input item becomes an output stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmeltingRecipe {
    pub input: ItemId,
    pub output: ItemId,
    pub output_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlockId;

    #[test]
    fn test_duplicate_ingredients_are_summed() {
        let wood = ItemId::from(BlockId::WOOD);
        let recipe = Recipe::new("x", "X", &[(wood, 1), (wood, 2)], ItemId::STICK, 1);
        assert_eq!(recipe.ingredients.get(&wood), Some(&3));
    }

    #[test]
    fn test_key_matching() {
        let recipe = Recipe::new("fence_gate", "Fence Gate", &[], ItemId::STICK, 1);
        assert!(recipe.matches_key("fence_gate"));
        assert!(recipe.matches_key("Fence Gate"));
        assert!(recipe.matches_key("fence gate"));
        assert!(!recipe.matches_key("Fence"));
    }
}
