use glam::Vec3;

use crate::combat::{CombatReport, CombatSystem};
use crate::config::EngineConfig;
use crate::constants::player::REACH;
use crate::constants::streaming::PHYSICS_RADIUS;
use crate::crafting::{self, CraftOutcome, Recipe, RecipeBook};
use crate::error::{EngineError, EngineResult};
use crate::item::{block_drop, ItemId, ItemStack};
use crate::persistence::{SaveAck, SaveManager};
use crate::physics::aabb::create_aabb;
use crate::physics::aabb_overlaps;
use crate::player::{Player, PlayerInput, PlayerTickReport, ToolWear};
use crate::time::{DayNightCycle, DayPhase};
use crate::world::{raycast, Block, BlockId, BlockShape, RaycastHit, VoxelPos, World};

/// Everything that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub phase: DayPhase,
    pub chunks_added: usize,
    pub player: PlayerTickReport,
    pub combat: CombatReport,
}

/// Result of breaking a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakOutcome {
    pub block: Block,
    /// Item and count added to the inventory
    pub drop: Option<(ItemId, u32)>,
    pub tool_wear: ToolWear,
}

/// One running game: the world, the player in it, live projectiles, the
/// clock and the save slots. Every operation goes through this object.
pub struct GameSession {
    config: EngineConfig,
    world: World,
    player: Player,
    combat: CombatSystem,
    clock: DayNightCycle,
    input: PlayerInput,
    recipe_book: RecipeBook,
    saves: SaveManager,
    ticks: u64,
}

impl GameSession {
    /// Start a new game with the save backend named in the config
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let saves = config.saves.open()?;
        Self::with_save_manager(config, saves)
    }

    pub fn with_save_manager(config: EngineConfig, saves: SaveManager) -> EngineResult<Self> {
        config.validate()?;

        let mut world = if config.world.background_generation {
            World::with_background_generation(config.world.seed)
        } else {
            World::new(config.world.seed)
        };
        let player = Self::spawn_player(&mut world, &config);
        log::info!(
            "[GameSession] New game: seed {}, spawn {:?}",
            config.world.seed,
            player.position
        );

        Ok(Self {
            clock: DayNightCycle::new(config.time.day_length),
            recipe_book: RecipeBook::new(config.crafting.discovery),
            config,
            world,
            player,
            combat: CombatSystem::new(),
            input: PlayerInput::idle(),
            saves,
            ticks: 0,
        })
    }

    /// Place a fresh player at the configured spawn, lifted above the terrain if needed
    fn spawn_player(world: &mut World, config: &EngineConfig) -> Player {
        let mut spawn = Vec3::from(config.player.spawn);
        let column = VoxelPos::from_world(spawn);
        world.ensure_area(column.chunk_pos(), PHYSICS_RADIUS);
        if let Some(surface) = world.highest_block_y(column.x, column.z) {
            spawn.y = spawn.y.max(surface as f32 + 1.0);
        }
        Player::new(spawn).with_max_health(config.player.max_health)
    }

    // Tick

    /// Advance the game by `dt` seconds: clock, chunk streaming, player, combat
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.clock.advance(dt as f64);

        // Only the rings physics touches are waited for; the rest streams in
        let center = VoxelPos::from_world(self.player.position).chunk_pos();
        let radius = self.config.world.load_radius.max(PHYSICS_RADIUS);
        let chunks_added = self.world.ensure_area_blocking(center, PHYSICS_RADIUS);
        self.world.request_area(center, radius);
        self.world.unload_far_chunks(center, radius);

        let player = self.player.update(dt, &self.input, &self.world);
        let combat = self.combat.update(dt, &mut self.player, &self.world);
        self.ticks += 1;

        TickReport {
            phase: self.clock.phase(),
            chunks_added,
            player,
            combat,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    // Accessors

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn combat(&self) -> &CombatSystem {
        &self.combat
    }

    pub fn clock(&self) -> &DayNightCycle {
        &self.clock
    }

    pub fn input(&self) -> PlayerInput {
        self.input
    }

    /// Movement intent applied on every following tick until replaced
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    pub fn day_phase(&self) -> DayPhase {
        self.clock.phase()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    // Combat

    pub fn spawn_projectile(&mut self, origin: Vec3, velocity: Vec3, damage: f32, life: f32) {
        self.combat.spawn_projectile(origin, velocity, damage, life);
    }

    /// Shoot along the player's look direction
    pub fn fire(&mut self) {
        self.combat.fire_from_player(&self.player);
    }

    pub fn respawn(&mut self) {
        self.player.respawn();
    }

    /// Sleep through the night. Only possible after dark.
    pub fn sleep(&mut self) -> EngineResult<()> {
        if self.clock.phase() != DayPhase::Night {
            return Err(EngineError::InvalidCommand("you can only sleep at night".to_string()));
        }
        self.clock.skip_to_morning();
        Ok(())
    }

    // Blocks

    /// The block the player is looking at, within reach
    pub fn target_block(&self) -> Option<RaycastHit> {
        raycast(&self.world, self.player.eye_position(), self.player.look_direction(), REACH)
    }

    fn is_replaceable(&self, pos: VoxelPos) -> EngineResult<bool> {
        let block = self.world.peek_block(pos)?;
        Ok(block.map_or(true, |b| matches!(b.shape(), BlockShape::Empty | BlockShape::Liquid)))
    }

    fn blocks_player(&self, pos: VoxelPos) -> bool {
        let cell = create_aabb(pos.to_vec3(), pos.to_vec3() + Vec3::ONE);
        aabb_overlaps(&cell, &self.player.aabb())
    }

    /// Place one block from the selected slot at `pos`, oriented by the player's yaw
    pub fn place_selected(&mut self, pos: VoxelPos, hit_fraction_y: f32) -> EngineResult<BlockId> {
        let stack = self
            .player
            .inventory
            .selected_item()
            .ok_or_else(|| EngineError::InvalidCommand("no item selected".to_string()))?;
        let id = stack
            .item_id
            .as_block()
            .filter(|id| *id != BlockId::AIR)
            .ok_or_else(|| EngineError::InvalidCommand(format!("{} cannot be placed", stack.item_id)))?;

        let mut cells = vec![pos];
        if Block::new(id).shape() == BlockShape::Door {
            cells.push(pos.above());
        }
        for &cell in &cells {
            if !self.is_replaceable(cell)? {
                return Err(EngineError::InvalidCommand(format!("{:?} is occupied", cell)));
            }
            if Block::new(id).shape().is_solid() && self.blocks_player(cell) {
                return Err(EngineError::InvalidCommand("the player is in the way".to_string()));
            }
        }

        self.world.place_block(pos, id, self.player.yaw, hit_fraction_y)?;
        self.player.inventory.take_selected(1);
        log::debug!("[GameSession] Placed {} at {:?}", id, pos);
        Ok(id)
    }

    /// Break the block at `pos`, collecting its drop and wearing the held tool
    pub fn break_block(&mut self, pos: VoxelPos) -> EngineResult<BreakOutcome> {
        if let Some(block) = self.world.peek_block(pos)? {
            if block.id == BlockId::BEDROCK {
                return Err(EngineError::InvalidCommand("bedrock cannot be broken".to_string()));
            }
        }

        let block = self.world.break_block(pos)?;
        let drop = match block_drop(block.id) {
            Some((item, count)) => {
                let leftover = self.player.pick_up(item, count)?;
                if leftover > 0 {
                    log::warn!("[GameSession] Inventory full, lost {} x{}", item, leftover);
                }
                Some((item, count - leftover)).filter(|(_, picked)| *picked > 0)
            }
            None => None,
        };
        let tool_wear = self.player.inventory.damage_selected_tool(1);

        Ok(BreakOutcome { block, drop, tool_wear })
    }

    /// Open or close a door, trapdoor or fence gate
    pub fn interact(&mut self, pos: VoxelPos) -> EngineResult<Option<u8>> {
        Ok(self.world.interact(pos)?)
    }

    pub fn select_slot(&mut self, index: usize) -> EngineResult<()> {
        Ok(self.player.inventory.select_slot(index)?)
    }

    // Crafting

    /// Recipes the player may see under the configured discovery policy
    pub fn available_recipes(&self) -> Vec<&'static Recipe> {
        self.recipe_book
            .available_recipes(&self.player.inventory, self.player.discovered_items())
    }

    pub fn craft(&mut self, recipe: &str) -> EngineResult<CraftOutcome> {
        let outcome = crafting::craft(recipe, &mut self.player.inventory)?;
        self.player.record_held_items();
        Ok(outcome)
    }

    pub fn smelt(&mut self, input: ItemId, fuel: ItemId) -> EngineResult<ItemStack> {
        let output = crafting::smelt(input, fuel, &mut self.player.inventory)?;
        self.player.record_held_items();
        Ok(output)
    }

    // Persistence

    pub fn save(&self, slot: &str) -> EngineResult<SaveAck> {
        Ok(self.saves.save(slot, &self.world, &self.player, self.clock.elapsed())?)
    }

    /// Replace the world, player and clock with a saved game. On any failure
    /// the running game is left exactly as it was.
    pub fn load(&mut self, slot: &str) -> EngineResult<()> {
        let loaded = self.saves.load(slot, self.config.world.background_generation)?;

        self.world = loaded.world;
        self.player = loaded.player;
        self.clock = DayNightCycle::starting_at(loaded.elapsed, self.config.time.day_length);
        self.combat.clear();
        self.input = PlayerInput::idle();
        log::info!("[GameSession] Loaded '{}' saved at {}", slot, loaded.saved_at);
        Ok(())
    }

    pub fn list_saves(&self) -> EngineResult<Vec<String>> {
        Ok(self.saves.list_slots()?)
    }

    pub fn delete_save(&self, slot: &str) -> EngineResult<()> {
        Ok(self.saves.delete(slot)?)
    }
}
