use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use super::block::{BlockDefinition, BlockId, BlockShape};

/// Registry that stores all block types known to the world
pub struct BlockRegistry {
    blocks: FxHashMap<BlockId, BlockDefinition>,
    name_to_id: FxHashMap<&'static str, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: FxHashMap::default(),
            name_to_id: FxHashMap::default(),
        }
    }

    /// Register a block type; a later registration with the same id replaces the earlier one
    pub fn register(&mut self, definition: BlockDefinition) {
        self.name_to_id.insert(definition.name, definition.id);
        self.blocks.insert(definition.id, definition);
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.blocks.get(&id)
    }

    pub fn get_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.blocks.values()
    }

    /// Registry with every built-in block type
    pub fn with_defaults() -> Self {
        use BlockShape::*;

        let mut registry = Self::new();
        let defs = [
            BlockDefinition::new(BlockId::AIR, "Air", Empty, true),
            BlockDefinition::new(BlockId::DIRT, "Dirt", Cube, false),
            BlockDefinition::new(BlockId::STONE, "Stone", Cube, false),
            BlockDefinition::new(BlockId::GRASS, "Grass", Cube, false),
            BlockDefinition::new(BlockId::WOOD, "Wood", Cube, false),
            BlockDefinition::new(BlockId::LEAVES, "Leaves", Cube, true),
            BlockDefinition::new(BlockId::SAND, "Sand", Cube, false),
            BlockDefinition::new(BlockId::WATER, "Water", Liquid, true),
            BlockDefinition::new(BlockId::GLASS, "Glass", Cube, true),
            BlockDefinition::new(BlockId::BRICK, "Brick", Cube, false),
            BlockDefinition::new(BlockId::PLANKS, "Planks", Cube, false),
            BlockDefinition::new(BlockId::COBBLESTONE, "Cobblestone", Cube, false),
            BlockDefinition::new(BlockId::BEDROCK, "Bedrock", Cube, false),
            BlockDefinition::new(BlockId::COAL_ORE, "Coal Ore", Cube, false),
            BlockDefinition::new(BlockId::IRON_ORE, "Iron Ore", Cube, false),
            BlockDefinition::new(BlockId::GOLD_ORE, "Gold Ore", Cube, false),
            BlockDefinition::new(BlockId::DIAMOND_ORE, "Diamond Ore", Cube, false),
            BlockDefinition::new(BlockId::CACTUS, "Cactus", Cube, true),
            BlockDefinition::new(BlockId::FURNACE, "Furnace", Cube, false),
            BlockDefinition::new(BlockId::CRAFTING_TABLE, "Crafting Table", Cube, false),
            BlockDefinition::new(BlockId::TORCH, "Torch", Cross, true),
            BlockDefinition::new(BlockId::DOOR_WOOD_BOTTOM, "Wooden Door", Door, true),
            BlockDefinition::new(BlockId::DOOR_WOOD_TOP, "Wooden Door (Top)", Door, true),
            BlockDefinition::new(BlockId::FENCE, "Fence", Fence, true),
            BlockDefinition::new(BlockId::FENCE_GATE, "Fence Gate", FenceGate, true),
            BlockDefinition::new(BlockId::GLASS_PANE, "Glass Pane", Pane, true),
            BlockDefinition::new(BlockId::TRAPDOOR, "Trapdoor", Trapdoor, true),
            BlockDefinition::new(BlockId::STAIRS_WOOD, "Wooden Stairs", Stairs, true),
            BlockDefinition::new(BlockId::SLAB_STONE, "Stone Slab", Slab, true),
        ];
        for def in defs {
            registry.register(def);
        }
        registry
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

lazy_static! {
    /// Process-wide block registry, read-only after first access
    pub static ref BLOCK_REGISTRY: BlockRegistry = BlockRegistry::with_defaults();
}

/// Look up a block definition in the global registry
pub fn block_definition(id: BlockId) -> Option<&'static BlockDefinition> {
    BLOCK_REGISTRY.get(id)
}

pub fn is_registered(id: BlockId) -> bool {
    BLOCK_REGISTRY.contains(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        assert!(is_registered(BlockId::AIR));
        assert!(is_registered(BlockId::SLAB_STONE));
        assert!(!is_registered(BlockId(18)));
        assert!(!is_registered(BlockId(999)));

        assert_eq!(BLOCK_REGISTRY.get_id("Stone"), Some(BlockId::STONE));
        assert_eq!(BLOCK_REGISTRY.get_id("Unobtainium"), None);
    }

    #[test]
    fn test_shapes_drive_solidity() {
        assert!(block_definition(BlockId::STONE).map_or(false, |d| d.is_solid()));
        assert!(!block_definition(BlockId::WATER).map_or(true, |d| d.is_solid()));
        assert!(!block_definition(BlockId::TORCH).map_or(true, |d| d.is_solid()));
        assert!(!block_definition(BlockId::AIR).map_or(true, |d| d.is_solid()));
        assert_eq!(
            block_definition(BlockId::FENCE_GATE).map(|d| d.shape),
            Some(BlockShape::FenceGate)
        );
    }

    #[test]
    fn test_display_uses_registered_name() {
        assert_eq!(BlockId::COBBLESTONE.to_string(), "Cobblestone");
        assert_eq!(BlockId(999).to_string(), "Block(999)");
    }
}
