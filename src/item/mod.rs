//! Item ids, stacks, tools and the item registry

pub mod drops;
pub mod item_id;
pub mod registry;
pub mod stack;
pub mod tool;

pub use drops::block_drop;
pub use item_id::ItemId;
pub use registry::{
    is_known_item, item_definition, max_durability, max_stack_size, ItemDefinition, ItemKind, ItemRegistry,
    ITEM_REGISTRY,
};
pub use stack::ItemStack;
pub use tool::{tool_spec, ToolMaterial, ToolSpec, ToolType};
