use super::error::{CraftingError, CraftingResult};
use super::registry::RECIPE_REGISTRY;
use crate::item::{ItemId, ItemStack};
use crate::player::Inventory;
use crate::world::BlockId;

/// Items a furnace accepts as fuel, one unit per smelt
pub fn is_fuel(item: ItemId) -> bool {
    item == ItemId::COAL
        || item == ItemId::STICK
        || item == ItemId::from(BlockId::WOOD)
        || item == ItemId::from(BlockId::PLANKS)
}

/// What one unit of `input` smelts into
pub fn smelting_result(input: ItemId) -> Option<ItemStack> {
    RECIPE_REGISTRY
        .smelting_recipe(input)
        .map(|recipe| ItemStack::new(recipe.output, recipe.output_count))
}

/// Smelt one unit of `input` using one unit of `fuel`. All-or-nothing like crafting.
pub fn smelt(input: ItemId, fuel: ItemId, inventory: &mut Inventory) -> CraftingResult<ItemStack> {
    let output = smelting_result(input).ok_or(CraftingError::NotSmeltable(input))?;
    if !is_fuel(fuel) {
        return Err(CraftingError::NotFuel(fuel));
    }

    let mut needed = vec![(input, 1u32)];
    if fuel == input {
        needed[0].1 += 1;
    } else {
        needed.push((fuel, 1));
    }
    for &(item, required) in &needed {
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
    for &(item, required) in &needed {
        scratch
            .remove_item(item, required)
            .map_err(|_| CraftingError::InsufficientMaterials {
                item,
                required,
                available: 0,
            })?;
    }
    let leftover = scratch
        .add_stack(output.clone())
        .map_err(|_| CraftingError::InventoryFull(format!("smelt {}", input)))?;
    if leftover > 0 {
        return Err(CraftingError::InventoryFull(format!("smelt {}", input)));
    }

    *inventory = scratch;
    log::debug!("[Crafting] Smelted {} into {}", input, output.item_id);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smelting_table() {
        assert_eq!(
            smelting_result(ItemId::from(BlockId::IRON_ORE)).map(|s| s.item_id),
            Some(ItemId::IRON_INGOT)
        );
        assert_eq!(
            smelting_result(ItemId::from(BlockId::SAND)).map(|s| s.item_id),
            Some(ItemId::from(BlockId::GLASS))
        );
        assert_eq!(smelting_result(ItemId::from(BlockId::WOOD)).map(|s| s.item_id), Some(ItemId::COAL));
        assert!(smelting_result(ItemId::from(BlockId::DIRT)).is_none());
    }

    #[test]
    fn test_smelt_consumes_input_and_fuel() {
        let mut inv = Inventory::new();
        inv.add_item(ItemId::from(BlockId::SAND), 2).unwrap();
        inv.add_item(ItemId::COAL, 1).unwrap();

        smelt(ItemId::from(BlockId::SAND), ItemId::COAL, &mut inv).unwrap();
        assert_eq!(inv.count_of(ItemId::from(BlockId::SAND)), 1);
        assert_eq!(inv.count_of(ItemId::COAL), 0);
        assert_eq!(inv.count_of(ItemId::from(BlockId::GLASS)), 1);

        let before = inv.clone();
        assert_eq!(
            smelt(ItemId::from(BlockId::SAND), ItemId::COAL, &mut inv),
            Err(CraftingError::InsufficientMaterials { item: ItemId::COAL, required: 1, available: 0 })
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_wood_can_fuel_itself() {
        let wood = ItemId::from(BlockId::WOOD);
        let mut inv = Inventory::new();
        inv.add_item(wood, 1).unwrap();
        assert!(matches!(smelt(wood, wood, &mut inv), Err(CraftingError::InsufficientMaterials { required: 2, .. })));

        inv.add_item(wood, 1).unwrap();
        smelt(wood, wood, &mut inv).unwrap();
        assert_eq!(inv.count_of(ItemId::COAL), 1);
        assert_eq!(inv.count_of(wood), 0);
    }

    #[test]
    fn test_rejects_non_fuel_and_non_smeltable() {
        let mut inv = Inventory::new();
        assert_eq!(
            smelt(ItemId::from(BlockId::DIRT), ItemId::COAL, &mut inv),
            Err(CraftingError::NotSmeltable(ItemId::from(BlockId::DIRT)))
        );
        assert_eq!(
            smelt(ItemId::from(BlockId::SAND), ItemId::from(BlockId::DIRT), &mut inv),
            Err(CraftingError::NotFuel(ItemId::from(BlockId::DIRT)))
        );
    }
}
