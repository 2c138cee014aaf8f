use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::core::MAX_METADATA;

/// Unique identifier for a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::registry::block_definition(*self) {
            Some(def) => write!(f, "{}", def.name),
            None => write!(f, "Block({})", self.0),
        }
    }
}

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const DIRT: BlockId = BlockId(1);
    pub const STONE: BlockId = BlockId(2);
    pub const GRASS: BlockId = BlockId(3);
    pub const WOOD: BlockId = BlockId(4);
    pub const LEAVES: BlockId = BlockId(5);
    pub const SAND: BlockId = BlockId(6);
    pub const WATER: BlockId = BlockId(7);
    pub const GLASS: BlockId = BlockId(8);
    pub const BRICK: BlockId = BlockId(9);
    pub const PLANKS: BlockId = BlockId(10);
    pub const COBBLESTONE: BlockId = BlockId(11);
    pub const BEDROCK: BlockId = BlockId(12);
    pub const COAL_ORE: BlockId = BlockId(13);
    pub const IRON_ORE: BlockId = BlockId(14);
    pub const GOLD_ORE: BlockId = BlockId(15);
    pub const DIAMOND_ORE: BlockId = BlockId(16);
    pub const CACTUS: BlockId = BlockId(17);
    pub const FURNACE: BlockId = BlockId(20);
    pub const CRAFTING_TABLE: BlockId = BlockId(21);
    pub const TORCH: BlockId = BlockId(22);
    pub const DOOR_WOOD_BOTTOM: BlockId = BlockId(23);
    pub const DOOR_WOOD_TOP: BlockId = BlockId(24);
    pub const FENCE: BlockId = BlockId(25);
    pub const FENCE_GATE: BlockId = BlockId(26);
    pub const GLASS_PANE: BlockId = BlockId(27);
    pub const TRAPDOOR: BlockId = BlockId(28);
    pub const STAIRS_WOOD: BlockId = BlockId(29);
    pub const SLAB_STONE: BlockId = BlockId(30);

    pub fn is_air(self) -> bool {
        self == BlockId::AIR
    }
}

/// Collision and interaction shape of a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockShape {
    /// Nothing at all (air)
    Empty,
    /// Full 1x1x1 cube
    Cube,
    /// Swimmable, never collides
    Liquid,
    /// Plants and torches: targetable but walk-through
    Cross,
    /// Half-height block; metadata TOP bit selects the upper half
    Slab,
    /// Bottom slab plus a quadrant selected by facing
    Stairs,
    /// Centre post that blocks 1.5 blocks high
    Fence,
    /// Fence that can be opened
    FenceGate,
    /// Thin centre pane
    Pane,
    /// Two-tall hinged block; each half is its own cell
    Door,
    /// 0.2 thick hinged hatch
    Trapdoor,
}

impl BlockShape {
    /// Whether the shape takes part in collision at all
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockShape::Empty | BlockShape::Liquid | BlockShape::Cross)
    }

    /// Whether the OPEN metadata bit is meaningful for this shape
    pub fn is_hinged(self) -> bool {
        matches!(self, BlockShape::Door | BlockShape::Trapdoor | BlockShape::FenceGate)
    }
}

/// Static properties of a registered block type
#[derive(Debug, Clone, Copy)]
pub struct BlockDefinition {
    pub id: BlockId,
    pub name: &'static str,
    pub shape: BlockShape,
    pub transparent: bool,
}

impl BlockDefinition {
    pub const fn new(id: BlockId, name: &'static str, shape: BlockShape, transparent: bool) -> Self {
        Self { id, name, shape, transparent }
    }

    pub fn is_solid(&self) -> bool {
        self.shape.is_solid()
    }
}

/// A single voxel cell: block type plus its 4-bit metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub metadata: u8,
}

impl Block {
    pub const AIR: Block = Block { id: BlockId::AIR, metadata: 0 };

    pub fn new(id: BlockId) -> Self {
        Self { id, metadata: 0 }
    }

    pub fn with_metadata(id: BlockId, metadata: u8) -> Self {
        Self { id, metadata: metadata.min(MAX_METADATA) }
    }

    pub fn is_air(&self) -> bool {
        self.id.is_air()
    }

    /// Shape of this block, `Empty` for unregistered ids
    pub fn shape(&self) -> BlockShape {
        super::registry::block_definition(self.id)
            .map(|def| def.shape)
            .unwrap_or(BlockShape::Empty)
    }
}
