use lazy_static::lazy_static;

use super::recipe::{Recipe, SmeltingRecipe};
use crate::item::{ItemId, ToolMaterial, ToolSpec, ToolType};
use crate::world::BlockId;

/// Ordered catalog of crafting and smelting recipes
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
    smelting: Vec<SmeltingRecipe>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
            smelting: Vec::new(),
        }
    }

    /// Register a recipe. Ids are unique; a duplicate replaces the earlier entry.
    pub fn register(&mut self, recipe: Recipe) {
        match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => *existing = recipe,
            None => self.recipes.push(recipe),
        }
    }

    pub fn register_smelting(&mut self, input: ItemId, output: ItemId, output_count: u32) {
        self.smelting.retain(|r| r.input != input);
        self.smelting.push(SmeltingRecipe {
            input,
            output,
            output_count,
        });
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look a recipe up by id or display name
    pub fn find(&self, key: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.matches_key(key))
    }

    pub fn smelting_recipe(&self, input: ItemId) -> Option<&SmeltingRecipe> {
        self.smelting.iter().find(|r| r.input == input)
    }

    pub fn smelting_recipes(&self) -> &[SmeltingRecipe] {
        &self.smelting
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Initialize default recipes
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.init_default_recipes();
        registry
    }

    fn init_default_recipes(&mut self) {
        let wood = ItemId::from(BlockId::WOOD);
        let planks = ItemId::from(BlockId::PLANKS);
        let cobblestone = ItemId::from(BlockId::COBBLESTONE);
        let stick = ItemId::STICK;

        // Basics
        self.register(Recipe::new("planks", "Planks", &[(wood, 1)], planks, 4));
        self.register(Recipe::new("furnace", "Furnace", &[(cobblestone, 8)], ItemId::from(BlockId::FURNACE), 1));
        self.register(Recipe::new("stick", "Stick", &[(planks, 2)], stick, 4));
        self.register(Recipe::new(
            "crafting_table",
            "Crafting Table",
            &[(planks, 4)],
            ItemId::from(BlockId::CRAFTING_TABLE),
            1,
        ));

        // Ingots by hand
        self.register(Recipe::new(
            "iron_ingot",
            "Iron Ingot",
            &[(ItemId::from(BlockId::IRON_ORE), 1)],
            ItemId::IRON_INGOT,
            1,
        ));
        self.register(Recipe::new(
            "gold_ingot",
            "Gold Ingot",
            &[(ItemId::from(BlockId::GOLD_ORE), 1)],
            ItemId::GOLD_INGOT,
            1,
        ));

        // Tools
        for (material, head) in [
            (ToolMaterial::Wood, planks),
            (ToolMaterial::Stone, cobblestone),
            (ToolMaterial::Iron, ItemId::IRON_INGOT),
            (ToolMaterial::Diamond, ItemId::DIAMOND),
        ] {
            for (tool_type, heads, sticks) in [
                (ToolType::Pickaxe, 3, 2),
                (ToolType::Sword, 2, 1),
                (ToolType::Axe, 3, 2),
                (ToolType::Shovel, 1, 2),
            ] {
                let spec = ToolSpec::new(tool_type, material);
                let name = spec.display_name();
                let id = name.to_ascii_lowercase().replace(' ', "_");
                self.register(Recipe::new(&id, &name, &[(head, heads), (stick, sticks)], spec.item_id(), 1));
            }
        }

        // Building blocks
        self.register(Recipe::new("bricks", "Bricks", &[(ItemId::from(BlockId::DIRT), 2)], ItemId::from(BlockId::BRICK), 1));
        self.register(Recipe::new("stone", "Stone", &[(cobblestone, 1)], ItemId::from(BlockId::STONE), 1));
        self.register(Recipe::new(
            "torch",
            "Torch",
            &[(stick, 1), (ItemId::COAL, 1)],
            ItemId::from(BlockId::TORCH),
            4,
        ));
        self.register(Recipe::new("fence", "Fence", &[(wood, 4), (stick, 2)], ItemId::from(BlockId::FENCE), 2));
        self.register(Recipe::new(
            "fence_gate",
            "Fence Gate",
            &[(planks, 2), (stick, 4)],
            ItemId::from(BlockId::FENCE_GATE),
            1,
        ));
        self.register(Recipe::new("door", "Wooden Door", &[(planks, 6)], ItemId::from(BlockId::DOOR_WOOD_BOTTOM), 1));
        self.register(Recipe::new("trapdoor", "Trapdoor", &[(planks, 3)], ItemId::from(BlockId::TRAPDOOR), 2));
        self.register(Recipe::new("stairs", "Wooden Stairs", &[(planks, 6)], ItemId::from(BlockId::STAIRS_WOOD), 4));
        self.register(Recipe::new("slab", "Stone Slab", &[(cobblestone, 3)], ItemId::from(BlockId::SLAB_STONE), 6));
        self.register(Recipe::new(
            "glass_pane",
            "Glass Pane",
            &[(ItemId::from(BlockId::GLASS), 6)],
            ItemId::from(BlockId::GLASS_PANE),
            16,
        ));

        // Furnace
        self.register_smelting(ItemId::from(BlockId::IRON_ORE), ItemId::IRON_INGOT, 1);
        self.register_smelting(ItemId::from(BlockId::GOLD_ORE), ItemId::GOLD_INGOT, 1);
        self.register_smelting(ItemId::from(BlockId::SAND), ItemId::from(BlockId::GLASS), 1);
        self.register_smelting(cobblestone, ItemId::from(BlockId::STONE), 1);
        self.register_smelting(wood, ItemId::COAL, 1);
    }
}

impl Default for RecipeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

lazy_static! {
    /// Process-wide recipe catalog, read-only after initialization
    pub static ref RECIPE_REGISTRY: RecipeRegistry = RecipeRegistry::with_defaults();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::is_known_item;

    #[test]
    fn test_catalog_is_consistent() {
        for recipe in RECIPE_REGISTRY.recipes() {
            assert!(is_known_item(recipe.output), "{} outputs unknown item", recipe.id);
            assert!(recipe.output_count >= 1);
            for item in recipe.ingredient_items() {
                assert!(is_known_item(item), "{} uses unknown item {}", recipe.id, item.0);
            }
        }
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        assert_eq!(RECIPE_REGISTRY.find("Furnace").map(|r| r.id.as_str()), Some("furnace"));
        assert_eq!(RECIPE_REGISTRY.find("iron_pickaxe").map(|r| r.output), Some(ItemId::PICKAXE_IRON));
        assert_eq!(RECIPE_REGISTRY.find("Diamond Sword").map(|r| r.output), Some(ItemId::SWORD_DIAMOND));
        assert!(RECIPE_REGISTRY.find("Rocket").is_none());
    }

    #[test]
    fn test_register_replaces_duplicates() {
        let mut registry = RecipeRegistry::new();
        registry.register(Recipe::new("a", "A", &[], ItemId::STICK, 1));
        registry.register(Recipe::new("a", "A", &[], ItemId::COAL, 1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("a").map(|r| r.output), Some(ItemId::COAL));
    }
}
