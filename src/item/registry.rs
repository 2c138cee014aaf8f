use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use super::item_id::ItemId;
use super::tool::{ToolSpec, ALL_TOOL_MATERIALS, ALL_TOOL_TYPES};
use crate::constants::inventory::MAX_STACK_SIZE;
use crate::world::{BlockId, BLOCK_REGISTRY};

/// What kind of thing an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Places a block
    Block(BlockId),
    /// Single-stack tool with durability
    Tool(ToolSpec),
    /// Crafting ingredient only
    Material,
}

#[derive(Debug, Clone)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn max_stack_size(&self) -> u32 {
        match self.kind {
            ItemKind::Tool(_) => 1,
            _ => MAX_STACK_SIZE,
        }
    }

    pub fn max_durability(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Tool(spec) => Some(spec.max_durability()),
            _ => None,
        }
    }

    pub fn is_tool(&self) -> bool {
        matches!(self.kind, ItemKind::Tool(_))
    }
}

/// Registry of every item type
pub struct ItemRegistry {
    items: FxHashMap<ItemId, ItemDefinition>,
    name_to_id: FxHashMap<String, ItemId>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: FxHashMap::default(),
            name_to_id: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, definition: ItemDefinition) {
        self.name_to_id.insert(definition.name.clone(), definition.id);
        self.items.insert(definition.id, definition);
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    pub fn get_id(&self, name: &str) -> Option<ItemId> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Blocks, tools and materials
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for def in BLOCK_REGISTRY.iter() {
            // Air and the upper door half are never held
            if def.id.is_air() || def.id == BlockId::DOOR_WOOD_TOP {
                continue;
            }
            registry.register(ItemDefinition {
                id: ItemId::from_block(def.id),
                name: def.name.to_string(),
                kind: ItemKind::Block(def.id),
            });
        }

        for tool_type in ALL_TOOL_TYPES {
            for material in ALL_TOOL_MATERIALS {
                let spec = ToolSpec::new(tool_type, material);
                registry.register(ItemDefinition {
                    id: spec.item_id(),
                    name: spec.display_name(),
                    kind: ItemKind::Tool(spec),
                });
            }
        }

        let materials = [
            (ItemId::STICK, "Stick"),
            (ItemId::COAL, "Coal"),
            (ItemId::IRON_INGOT, "Iron Ingot"),
            (ItemId::GOLD_INGOT, "Gold Ingot"),
            (ItemId::DIAMOND, "Diamond"),
        ];
        for (id, name) in materials {
            registry.register(ItemDefinition {
                id,
                name: name.to_string(),
                kind: ItemKind::Material,
            });
        }

        registry
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

lazy_static! {
    pub static ref ITEM_REGISTRY: ItemRegistry = ItemRegistry::with_defaults();
}

pub fn item_definition(id: ItemId) -> Option<&'static ItemDefinition> {
    ITEM_REGISTRY.get(id)
}

pub fn is_known_item(id: ItemId) -> bool {
    ITEM_REGISTRY.get(id).is_some()
}

/// Stack limit of an item, 0 for unknown items
pub fn max_stack_size(id: ItemId) -> u32 {
    item_definition(id).map_or(0, |def| def.max_stack_size())
}

pub fn max_durability(id: ItemId) -> Option<u32> {
    item_definition(id).and_then(|def| def.max_durability())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_blocks_tools_and_materials() {
        assert!(is_known_item(ItemId::from(BlockId::WOOD)));
        assert!(is_known_item(ItemId::SHOVEL_DIAMOND));
        assert!(is_known_item(ItemId::STICK));
        assert!(!is_known_item(ItemId::from(BlockId::AIR)));
        assert!(!is_known_item(ItemId::from(BlockId::DOOR_WOOD_TOP)));
        assert!(!is_known_item(ItemId(999)));
        assert_eq!(ITEM_REGISTRY.len(), BLOCK_REGISTRY.len() - 2 + 16 + 5);
    }

    #[test]
    fn test_stack_limits_and_durability() {
        assert_eq!(max_stack_size(ItemId::from(BlockId::DIRT)), 64);
        assert_eq!(max_stack_size(ItemId::STICK), 64);
        assert_eq!(max_stack_size(ItemId::AXE_WOOD), 1);
        assert_eq!(max_stack_size(ItemId(999)), 0);

        assert_eq!(max_durability(ItemId::AXE_WOOD), Some(60));
        assert_eq!(max_durability(ItemId::STICK), None);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(ITEM_REGISTRY.get_id("Iron Ingot"), Some(ItemId::IRON_INGOT));
        assert_eq!(ITEM_REGISTRY.get_id("Stone Sword"), Some(ItemId::SWORD_STONE));
        assert_eq!(ITEM_REGISTRY.get_id("Planks"), Some(ItemId::from(BlockId::PLANKS)));
    }
}
