use serde::{Deserialize, Serialize};

use super::item_id::ItemId;
use super::registry::{item_definition, max_durability, max_stack_size};

/// A stack of items. Tools carry their remaining durability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub count: u32,
    pub durability: Option<u32>,
}

impl ItemStack {
    /// Create a stack, clamped to the item's stack limit. Tools start at full durability.
    pub fn new(item_id: ItemId, count: u32) -> Self {
        let limit = max_stack_size(item_id).max(1);
        Self {
            item_id,
            count: count.min(limit),
            durability: max_durability(item_id),
        }
    }

    pub fn single(item_id: ItemId) -> Self {
        Self::new(item_id, 1)
    }

    /// A tool with the given remaining durability
    pub fn tool(item_id: ItemId, durability: u32) -> Self {
        Self {
            item_id,
            count: 1,
            durability: Some(durability),
        }
    }

    pub fn max_stack_size(&self) -> u32 {
        max_stack_size(self.item_id)
    }

    /// Whether the stack describes a real item in a legal state: known item,
    /// count within `1..=limit`, durability present exactly for tools and within range
    pub fn is_valid(&self) -> bool {
        let Some(def) = item_definition(self.item_id) else {
            return false;
        };
        if self.count == 0 || self.count > def.max_stack_size() {
            return false;
        }
        match (def.max_durability(), self.durability) {
            (Some(max), Some(current)) => current >= 1 && current <= max,
            (None, None) => true,
            _ => false,
        }
    }

    pub fn can_merge_with(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id
            && self.durability.is_none()
            && other.durability.is_none()
            && self.count < self.max_stack_size()
    }

    /// Try to add items to this stack, returns the count that did not fit
    pub fn try_add(&mut self, count: u32) -> u32 {
        let space = self.max_stack_size().saturating_sub(self.count);
        let to_add = count.min(space);
        self.count += to_add;
        count - to_add
    }

    /// Take up to `count` items out of the stack
    pub fn split(&mut self, count: u32) -> Option<ItemStack> {
        if count == 0 {
            return None;
        }
        let taken = count.min(self.count);
        self.count -= taken;
        Some(ItemStack {
            item_id: self.item_id,
            count: taken,
            durability: self.durability,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlockId;

    #[test]
    fn test_new_clamps_and_sets_durability() {
        let dirt = ItemStack::new(ItemId::from(BlockId::DIRT), 100);
        assert_eq!(dirt.count, 64);
        assert_eq!(dirt.durability, None);

        let pick = ItemStack::new(ItemId::PICKAXE_STONE, 5);
        assert_eq!(pick.count, 1);
        assert_eq!(pick.durability, Some(132));
    }

    #[test]
    fn test_validity() {
        assert!(ItemStack::new(ItemId::STICK, 3).is_valid());
        assert!(!ItemStack { item_id: ItemId::STICK, count: 0, durability: None }.is_valid());
        assert!(!ItemStack { item_id: ItemId::STICK, count: 65, durability: None }.is_valid());
        assert!(!ItemStack { item_id: ItemId::STICK, count: 1, durability: Some(3) }.is_valid());
        assert!(!ItemStack { item_id: ItemId::AXE_IRON, count: 1, durability: None }.is_valid());
        assert!(!ItemStack::tool(ItemId::AXE_IRON, 251).is_valid());
        assert!(ItemStack::tool(ItemId::AXE_IRON, 250).is_valid());
        assert!(!ItemStack::new(ItemId(999), 1).is_valid());
    }

    #[test]
    fn test_try_add_and_split() {
        let mut stack = ItemStack::new(ItemId::COAL, 60);
        assert_eq!(stack.try_add(10), 6);
        assert!(stack.is_full());

        let taken = stack.split(20).unwrap();
        assert_eq!(taken.count, 20);
        assert_eq!(stack.count, 44);
        assert!(stack.split(0).is_none());
    }

    #[test]
    fn test_tools_never_merge() {
        let a = ItemStack::new(ItemId::SWORD_WOOD, 1);
        let b = ItemStack::new(ItemId::SWORD_WOOD, 1);
        assert!(!a.can_merge_with(&b));
        let c = ItemStack::new(ItemId::STICK, 1);
        assert!(c.can_merge_with(&ItemStack::new(ItemId::STICK, 1)));
    }
}
