use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::{is_registered, BlockId};

/// Unique identifier for an item type.
///
/// Placeable blocks share their block id (below 100), tools live in
/// `100..116` and plain materials start at 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ItemId(pub u16);

const FIRST_TOOL_ID: u16 = 100;
const FIRST_MATERIAL_ID: u16 = 200;

impl ItemId {
    // Tools
    pub const PICKAXE_WOOD: ItemId = ItemId(100);
    pub const PICKAXE_STONE: ItemId = ItemId(101);
    pub const PICKAXE_IRON: ItemId = ItemId(102);
    pub const PICKAXE_DIAMOND: ItemId = ItemId(103);
    pub const SWORD_WOOD: ItemId = ItemId(104);
    pub const SWORD_STONE: ItemId = ItemId(105);
    pub const SWORD_IRON: ItemId = ItemId(106);
    pub const SWORD_DIAMOND: ItemId = ItemId(107);
    pub const AXE_WOOD: ItemId = ItemId(108);
    pub const AXE_STONE: ItemId = ItemId(109);
    pub const AXE_IRON: ItemId = ItemId(110);
    pub const AXE_DIAMOND: ItemId = ItemId(111);
    pub const SHOVEL_WOOD: ItemId = ItemId(112);
    pub const SHOVEL_STONE: ItemId = ItemId(113);
    pub const SHOVEL_IRON: ItemId = ItemId(114);
    pub const SHOVEL_DIAMOND: ItemId = ItemId(115);

    // Materials
    pub const STICK: ItemId = ItemId(210);
    pub const COAL: ItemId = ItemId(211);
    pub const IRON_INGOT: ItemId = ItemId(212);
    pub const GOLD_INGOT: ItemId = ItemId(213);
    pub const DIAMOND: ItemId = ItemId(214);

    /// Item form of a block
    pub const fn from_block(block: BlockId) -> ItemId {
        ItemId(block.0)
    }

    /// The block this item places, if it is a registered placeable block
    pub fn as_block(self) -> Option<BlockId> {
        let block = BlockId(self.0);
        if self.0 < FIRST_TOOL_ID && !block.is_air() && is_registered(block) {
            Some(block)
        } else {
            None
        }
    }

    pub fn is_tool_range(self) -> bool {
        (FIRST_TOOL_ID..FIRST_MATERIAL_ID).contains(&self.0)
    }
}

impl From<BlockId> for ItemId {
    fn from(block: BlockId) -> Self {
        ItemId::from_block(block)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::registry::item_definition(*self) {
            Some(def) => write!(f, "{}", def.name),
            None => write!(f, "Item({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_share_item_ids() {
        assert_eq!(ItemId::from(BlockId::PLANKS), ItemId(10));
        assert_eq!(ItemId::from(BlockId::PLANKS).as_block(), Some(BlockId::PLANKS));
        assert_eq!(ItemId::STICK.as_block(), None);
        assert_eq!(ItemId::PICKAXE_IRON.as_block(), None);
        assert_eq!(ItemId(0).as_block(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemId::STICK.to_string(), "Stick");
        assert_eq!(ItemId::from(BlockId::FURNACE).to_string(), "Furnace");
        assert_eq!(ItemId(4242).to_string(), "Item(4242)");
    }
}
