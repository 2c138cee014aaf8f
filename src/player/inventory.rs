use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::constants::inventory::{HOTBAR_SIZE, INVENTORY_SIZE};
use crate::item::{is_known_item, max_stack_size, ItemId, ItemStack};

/// Errors raised by inventory mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Slot index {index} out of range (size {size})")]
    InvalidSlot { index: usize, size: usize },

    #[error("Invalid item stack: {0}")]
    InvalidItem(String),

    #[error("Not enough {item}: need {required}, have {available}")]
    NotEnoughItems { item: ItemId, required: u32, available: u32 },

    #[error("Inventory is full")]
    InventoryFull,
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// What happened to the selected tool after one use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolWear {
    /// The selected slot does not hold a tool
    NoTool,
    Worn { remaining: u32 },
    Broke,
}

/// The player's 36-slot inventory. Slots `0..9` form the hotbar.
///
/// Every mutation goes through a validating method; slots never hold an
/// empty or over-full stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
            selected: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn check_index(&self, index: usize, size: usize) -> InventoryResult<()> {
        if index < size {
            Ok(())
        } else {
            Err(InventoryError::InvalidSlot { index, size })
        }
    }

    fn validate_stack(stack: &ItemStack) -> InventoryResult<()> {
        if stack.is_valid() {
            Ok(())
        } else {
            Err(InventoryError::InvalidItem(format!(
                "{} x{} (durability {:?})",
                stack.item_id, stack.count, stack.durability
            )))
        }
    }

    pub fn get_slot(&self, index: usize) -> InventoryResult<Option<&ItemStack>> {
        self.check_index(index, self.slots.len())?;
        Ok(self.slots.get(index).and_then(|s| s.as_ref()))
    }

    /// Replace the contents of a slot. `None` empties it.
    pub fn set_slot(&mut self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()> {
        self.check_index(index, self.slots.len())?;
        if let Some(stack) = &stack {
            Self::validate_stack(stack)?;
        }
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = stack;
        }
        Ok(())
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    pub fn select_slot(&mut self, index: usize) -> InventoryResult<()> {
        self.check_index(index, HOTBAR_SIZE)?;
        self.selected = index;
        Ok(())
    }

    pub fn selected_item(&self) -> Option<&ItemStack> {
        self.slots.get(self.selected).and_then(|s| s.as_ref())
    }

    pub fn count_of(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id == item)
            .map(|stack| stack.count)
            .sum()
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.count_of(item) > 0
    }

    /// Every distinct item currently held
    pub fn held_items(&self) -> BTreeSet<ItemId> {
        self.slots.iter().flatten().map(|stack| stack.item_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// How many of `item` could be added without overflowing
    pub fn free_capacity_for(&self, item: ItemId) -> u32 {
        let limit = max_stack_size(item);
        self.slots
            .iter()
            .map(|slot| match slot {
                None => limit,
                Some(stack) if stack.item_id == item && stack.durability.is_none() => {
                    limit.saturating_sub(stack.count)
                }
                Some(_) => 0,
            })
            .sum()
    }

    /// Add a stack, topping up existing stacks first then filling empty
    /// slots in order. Returns the count that did not fit.
    pub fn add_stack(&mut self, stack: ItemStack) -> InventoryResult<u32> {
        Self::validate_stack(&stack)?;
        let mut remaining = stack.count;

        if stack.durability.is_none() {
            for existing in self.slots.iter_mut().flatten() {
                if remaining == 0 {
                    break;
                }
                if existing.item_id == stack.item_id && existing.durability.is_none() {
                    remaining = existing.try_add(remaining);
                }
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let mut placed = stack.clone();
                placed.count = remaining.min(stack.max_stack_size());
                remaining -= placed.count;
                *slot = Some(placed);
            }
        }

        Ok(remaining)
    }

    /// Add `count` fresh items. Returns the count that did not fit.
    pub fn add_item(&mut self, item: ItemId, count: u32) -> InventoryResult<u32> {
        if !is_known_item(item) {
            return Err(InventoryError::InvalidItem(format!("unknown item {}", item.0)));
        }
        let limit = max_stack_size(item);
        let mut remaining = count;
        while remaining > 0 {
            let chunk = remaining.min(limit);
            let leftover = self.add_stack(ItemStack::new(item, chunk))?;
            remaining = remaining - chunk + leftover;
            if leftover > 0 {
                break;
            }
        }
        Ok(remaining)
    }

    /// Remove exactly `count` items, taking from the last slots first.
    /// Nothing is removed if fewer are held.
    pub fn remove_item(&mut self, item: ItemId, count: u32) -> InventoryResult<()> {
        let available = self.count_of(item);
        if available < count {
            return Err(InventoryError::NotEnoughItems {
                item,
                required: count,
                available,
            });
        }

        let mut remaining = count;
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot else { continue };
            if stack.item_id != item {
                continue;
            }
            let taken = remaining.min(stack.count);
            stack.count -= taken;
            remaining -= taken;
            if stack.count == 0 {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Remove and return the whole selected stack, or one item of it
    pub fn take_selected(&mut self, count: u32) -> Option<ItemStack> {
        let slot = self.slots.get_mut(self.selected)?;
        let stack = slot.as_mut()?;
        let taken = stack.split(count)?;
        if stack.is_empty() {
            *slot = None;
        }
        Some(taken)
    }

    /// Use the selected tool once, removing it when it breaks
    pub fn damage_selected_tool(&mut self, amount: u32) -> ToolWear {
        let Some(slot) = self.slots.get_mut(self.selected) else {
            return ToolWear::NoTool;
        };
        let Some(stack) = slot.as_mut() else {
            return ToolWear::NoTool;
        };
        let Some(durability) = stack.durability.as_mut() else {
            return ToolWear::NoTool;
        };

        *durability = durability.saturating_sub(amount);
        if *durability == 0 {
            log::debug!("[Inventory] {} broke", stack.item_id);
            *slot = None;
            ToolWear::Broke
        } else {
            ToolWear::Worn { remaining: *durability }
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}
