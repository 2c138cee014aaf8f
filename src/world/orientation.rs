//! Placement orientation and the metadata bit layout.
//!
//! Metadata is 4 bits per cell:
//! - bits 0-1: facing (East, West, South, North)
//! - bit 2: OPEN flag for doors, trapdoors and fence gates
//! - bit 3: TOP flag for upper-half trapdoors and slabs
//!
//! Facing is quantized from the placer's yaw exactly once, when the block is
//! placed, and never recomputed afterwards.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI, TAU};

pub const FACING_MASK: u8 = 0b0011;
pub const OPEN_BIT: u8 = 0b0100;
pub const TOP_BIT: u8 = 0b1000;

/// Horizontal facing stored in the low two metadata bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    East = 0,
    West = 1,
    South = 2,
    North = 3,
}

impl Facing {
    /// Quantize a yaw angle (radians, any range) into one of four facings
    pub fn from_yaw(yaw: f32) -> Facing {
        let r = yaw.rem_euclid(TAU);
        if (FRAC_PI_4..3.0 * FRAC_PI_4).contains(&r) {
            Facing::South
        } else if (3.0 * FRAC_PI_4..5.0 * FRAC_PI_4).contains(&r) {
            Facing::West
        } else if (5.0 * FRAC_PI_4..7.0 * FRAC_PI_4).contains(&r) {
            Facing::North
        } else {
            Facing::East
        }
    }

    pub fn from_metadata(metadata: u8) -> Facing {
        match metadata & FACING_MASK {
            0 => Facing::East,
            1 => Facing::West,
            2 => Facing::South,
            _ => Facing::North,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Yaw pointing in this direction, the centre of its quantization range
    pub fn yaw(self) -> f32 {
        match self {
            Facing::East => 0.0,
            Facing::South => PI / 2.0,
            Facing::West => PI,
            Facing::North => 3.0 * PI / 2.0,
        }
    }

    /// Whether the facing runs along the z axis
    pub fn is_north_south(self) -> bool {
        matches!(self, Facing::South | Facing::North)
    }
}

/// Fence gate axis bit: 1 when the placer looked along z, else 0
pub fn gate_axis_from_yaw(yaw: f32) -> u8 {
    if Facing::from_yaw(yaw).is_north_south() {
        1
    } else {
        0
    }
}

pub fn is_open(metadata: u8) -> bool {
    metadata & OPEN_BIT != 0
}

pub fn is_top(metadata: u8) -> bool {
    metadata & TOP_BIT != 0
}

pub fn toggle_open(metadata: u8) -> u8 {
    metadata ^ OPEN_BIT
}
