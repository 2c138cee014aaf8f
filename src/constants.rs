// Voxel Sandbox Constants - SINGLE SOURCE OF TRUTH
//
// World, player, combat and persistence tuning lives here so that the
// simulation, the save format and the tests agree on the same numbers.

/// Core world dimensions
pub mod core {
    /// Horizontal chunk edge length in blocks
    pub const CHUNK_SIZE: u32 = 16;
    pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

    /// Vertical world limit; valid block y is `0..WORLD_HEIGHT`
    pub const WORLD_HEIGHT: u32 = 128;
    pub const WORLD_HEIGHT_I32: i32 = WORLD_HEIGHT as i32;

    /// Blocks stored per chunk column
    pub const BLOCKS_PER_CHUNK: usize = (CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT) as usize;

    /// Highest legal metadata value (4 bits)
    pub const MAX_METADATA: u8 = 15;
}

/// Terrain generation parameters
pub mod terrain {
    pub const BASE_HEIGHT: f64 = 20.0;
    pub const HEIGHT_AMPLITUDE: f64 = 10.0;
    pub const DETAIL_AMPLITUDE: f64 = 2.0;
    pub const HEIGHT_SCALE: f64 = 0.03;
    pub const DETAIL_SCALE: f64 = 0.1;
    pub const CAVE_SCALE: f64 = 0.05;
    pub const CAVE_THRESHOLD: f64 = 0.4;

    /// Water fills air up to and including this y
    pub const WATER_LEVEL: i32 = 16;
    /// Columns lower than this get a sand surface
    pub const BEACH_LEVEL: i32 = 18;

    pub const TREE_CHANCE: f64 = 0.02;
    pub const CACTUS_CHANCE: f64 = 0.01;
    pub const COAL_CHANCE: f64 = 0.01;
    pub const IRON_CHANCE: f64 = 0.005;
    pub const DIAMOND_CHANCE: f64 = 0.002;
}

/// Player movement and stance
pub mod player {
    pub const WIDTH: f32 = 0.6;
    pub const STANDING_HEIGHT: f32 = 1.8;
    pub const CROUCH_HEIGHT: f32 = 1.5;
    pub const EYE_HEIGHT_FACTOR: f32 = 0.9;

    pub const WALK_SPEED: f32 = 4.3;
    pub const CROUCH_SPEED_FACTOR: f32 = 0.4;
    pub const SPRINT_SPEED_FACTOR: f32 = 1.3;
    pub const JUMP_VELOCITY: f32 = 9.0;
    pub const GRAVITY: f32 = 25.0;

    pub const MAX_HEALTH: f32 = 20.0;
    /// Falls longer than this many blocks hurt
    pub const SAFE_FALL_DISTANCE: f32 = 3.0;
    /// Falling below this y is fatal
    pub const VOID_Y: f32 = -10.0;

    pub const DEFAULT_SPAWN: [f32; 3] = [8.0, 40.0, 8.0];

    /// How far away blocks can be targeted
    pub const REACH: f32 = 5.0;
}

/// Inventory layout
pub mod inventory {
    pub const INVENTORY_SIZE: usize = 36;
    pub const HOTBAR_SIZE: usize = 9;
    pub const MAX_STACK_SIZE: u32 = 64;
}

/// Projectile tuning
pub mod combat {
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const PROJECTILE_LIFE: f32 = 2.0;
    pub const PROJECTILE_DAMAGE: f32 = 2.0;
    /// Fraction of projectile velocity transferred to the target
    pub const KNOCKBACK_FACTOR: f32 = 0.5;
}

/// Time of day
pub mod time {
    /// Length of one full day/night cycle in seconds
    pub const DEFAULT_DAY_LENGTH: f64 = 120.0;
    /// Sleeping wakes the player this fraction into the new day
    pub const WAKE_FRACTION: f64 = 0.1;
}

/// Chunk streaming around the player
pub mod streaming {
    /// Rings around the player that must be resident before physics runs
    pub const PHYSICS_RADIUS: i32 = 1;
}

/// Save format
pub mod persistence_constants {
    pub const SAVE_MAGIC: [u8; 4] = *b"VXSV";
    pub const SAVE_FORMAT_VERSION: u32 = 1;
    pub const SAVE_EXTENSION: &str = "sav";
}
