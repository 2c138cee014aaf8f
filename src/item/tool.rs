use serde::{Deserialize, Serialize};

use super::item_id::ItemId;

/// Type of tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    Pickaxe,
    Sword,
    Axe,
    Shovel,
}

/// Material that tools are made from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolMaterial {
    Wood,
    Stone,
    Iron,
    Diamond,
}

impl ToolMaterial {
    /// Uses before the tool breaks
    pub fn durability(&self) -> u32 {
        match self {
            ToolMaterial::Wood => 60,
            ToolMaterial::Stone => 132,
            ToolMaterial::Iron => 250,
            ToolMaterial::Diamond => 1561,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolMaterial::Wood => "Wood",
            ToolMaterial::Stone => "Stone",
            ToolMaterial::Iron => "Iron",
            ToolMaterial::Diamond => "Diamond",
        }
    }
}

impl ToolType {
    pub fn name(&self) -> &'static str {
        match self {
            ToolType::Pickaxe => "Pickaxe",
            ToolType::Sword => "Sword",
            ToolType::Axe => "Axe",
            ToolType::Shovel => "Shovel",
        }
    }

    fn base_id(&self) -> u16 {
        match self {
            ToolType::Pickaxe => 100,
            ToolType::Sword => 104,
            ToolType::Axe => 108,
            ToolType::Shovel => 112,
        }
    }
}

/// Static description of a tool item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolSpec {
    pub tool_type: ToolType,
    pub material: ToolMaterial,
}

impl ToolSpec {
    pub fn new(tool_type: ToolType, material: ToolMaterial) -> Self {
        Self { tool_type, material }
    }

    pub fn item_id(&self) -> ItemId {
        ItemId(self.tool_type.base_id() + self.material as u16)
    }

    pub fn max_durability(&self) -> u32 {
        self.material.durability()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.material.name(), self.tool_type.name())
    }
}

pub const ALL_TOOL_TYPES: [ToolType; 4] = [ToolType::Pickaxe, ToolType::Sword, ToolType::Axe, ToolType::Shovel];
pub const ALL_TOOL_MATERIALS: [ToolMaterial; 4] =
    [ToolMaterial::Wood, ToolMaterial::Stone, ToolMaterial::Iron, ToolMaterial::Diamond];

/// Tool described by an item id, if it is one
pub fn tool_spec(id: ItemId) -> Option<ToolSpec> {
    if !id.is_tool_range() {
        return None;
    }
    ALL_TOOL_TYPES
        .iter()
        .flat_map(|&t| ALL_TOOL_MATERIALS.iter().map(move |&m| ToolSpec::new(t, m)))
        .find(|spec| spec.item_id() == id)
}
