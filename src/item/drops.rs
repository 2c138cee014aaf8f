use super::item_id::ItemId;
use crate::world::BlockId;

/// Item a broken block leaves behind, if any
pub fn block_drop(block: BlockId) -> Option<(ItemId, u32)> {
    let drop = match block {
        BlockId::AIR | BlockId::WATER | BlockId::BEDROCK | BlockId::LEAVES | BlockId::GLASS => return None,
        BlockId::STONE => ItemId::from(BlockId::COBBLESTONE),
        BlockId::GRASS => ItemId::from(BlockId::DIRT),
        BlockId::COAL_ORE => ItemId::COAL,
        BlockId::DIAMOND_ORE => ItemId::DIAMOND,
        BlockId::DOOR_WOOD_TOP => ItemId::from(BlockId::DOOR_WOOD_BOTTOM),
        other => ItemId::from(other),
    };
    Some((drop, 1))
}
