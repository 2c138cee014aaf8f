use crate::crafting::CraftOutcome;
use crate::error::{EngineError, EngineResult};
use crate::item::{ItemId, ItemStack};
use crate::persistence::SaveAck;
use crate::world::{BlockId, VoxelPos};

use super::session::{BreakOutcome, GameSession};

/// Discrete user actions, executed between ticks
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    /// Place the selected block at a cell. `hit_fraction_y` is where on the
    /// clicked face the player aimed, `0` bottom to `1` top.
    Place { pos: VoxelPos, hit_fraction_y: f32 },
    /// Place against the face the player is looking at
    PlaceAtTarget,
    Break { pos: VoxelPos },
    BreakTarget,
    Interact { pos: VoxelPos },
    InteractTarget,
    Craft { recipe: String },
    Smelt { input: ItemId, fuel: ItemId },
    SelectSlot(usize),
    Fire,
    Sleep,
    Respawn,
    Save { slot: String },
    Load { slot: String },
    DeleteSave { slot: String },
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Placed(BlockId),
    Broke(BreakOutcome),
    /// New metadata of the toggled block; `None` if it does not open
    Toggled(Option<u8>),
    Crafted(CraftOutcome),
    Smelted(ItemStack),
    Saved(SaveAck),
}

fn out_of_reach() -> EngineError {
    EngineError::InvalidCommand("no block in reach".to_string())
}

impl GameSession {
    /// Run one command. Failures are logged and returned; the session stays usable.
    pub fn execute(&mut self, command: GameCommand) -> EngineResult<CommandOutcome> {
        log::debug!("[GameSession] Executing {:?}", command);
        let result = self.dispatch(command.clone());
        if let Err(e) = &result {
            log::warn!("[GameSession] {:?} failed: {}", command, e);
        }
        result
    }

    fn dispatch(&mut self, command: GameCommand) -> EngineResult<CommandOutcome> {
        match command {
            GameCommand::Place { pos, hit_fraction_y } => {
                self.place_selected(pos, hit_fraction_y).map(CommandOutcome::Placed)
            }
            GameCommand::PlaceAtTarget => {
                let hit = self.target_block().ok_or_else(out_of_reach)?;
                // Aiming at the side of a block uses the hit height; top and bottom faces pick the half
                let fraction = match hit.normal {
                    [0, 1, 0] => 0.0,
                    [0, -1, 0] => 1.0,
                    _ => hit.local_hit.y.clamp(0.0, 1.0),
                };
                self.place_selected(hit.adjacent(), fraction).map(CommandOutcome::Placed)
            }
            GameCommand::Break { pos } => self.break_block(pos).map(CommandOutcome::Broke),
            GameCommand::BreakTarget => {
                let hit = self.target_block().ok_or_else(out_of_reach)?;
                self.break_block(hit.position).map(CommandOutcome::Broke)
            }
            GameCommand::Interact { pos } => self.interact(pos).map(CommandOutcome::Toggled),
            GameCommand::InteractTarget => {
                let hit = self.target_block().ok_or_else(out_of_reach)?;
                self.interact(hit.position).map(CommandOutcome::Toggled)
            }
            GameCommand::Craft { recipe } => self.craft(&recipe).map(CommandOutcome::Crafted),
            GameCommand::Smelt { input, fuel } => self.smelt(input, fuel).map(CommandOutcome::Smelted),
            GameCommand::SelectSlot(index) => self.select_slot(index).map(|_| CommandOutcome::Done),
            GameCommand::Fire => {
                self.fire();
                Ok(CommandOutcome::Done)
            }
            GameCommand::Sleep => self.sleep().map(|_| CommandOutcome::Done),
            GameCommand::Respawn => {
                self.respawn();
                Ok(CommandOutcome::Done)
            }
            GameCommand::Save { slot } => self.save(&slot).map(CommandOutcome::Saved),
            GameCommand::Load { slot } => self.load(&slot).map(|_| CommandOutcome::Done),
            GameCommand::DeleteSave { slot } => self.delete_save(&slot).map(|_| CommandOutcome::Done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::player::InventoryError;
    use crate::world::orientation::is_open;
    use glam::Vec3;

    fn session() -> GameSession {
        let mut config = EngineConfig::default();
        config.world.background_generation = false;
        GameSession::new(config).unwrap()
    }

    #[test]
    fn test_select_slot_out_of_range() {
        let mut session = session();
        assert!(matches!(
            session.execute(GameCommand::SelectSlot(40)),
            Err(EngineError::Inventory(InventoryError::InvalidSlot { index: 40, .. }))
        ));
        assert_eq!(session.execute(GameCommand::SelectSlot(3)).unwrap(), CommandOutcome::Done);
        assert_eq!(session.player().inventory.selected_slot(), 3);
    }

    #[test]
    fn test_place_and_toggle_trapdoor() {
        let mut session = session();
        let pos = VoxelPos::new(3, 110, 3);
        session.world_mut().set_block(pos.below(), BlockId::STONE).unwrap();
        session.player_mut().inventory.add_item(ItemId::from(BlockId::TRAPDOOR), 1).unwrap();

        let placed = session.execute(GameCommand::Place { pos, hit_fraction_y: 0.2 }).unwrap();
        assert_eq!(placed, CommandOutcome::Placed(BlockId::TRAPDOOR));

        let outcome = session.execute(GameCommand::Interact { pos }).unwrap();
        let CommandOutcome::Toggled(Some(metadata)) = outcome else {
            panic!("trapdoor did not toggle: {:?}", outcome);
        };
        assert!(is_open(metadata));
    }

    #[test]
    fn test_break_target_in_front_of_player() {
        let mut session = session();
        let wall = VoxelPos::new(12, 110, 8);
        session.world_mut().set_block(wall, BlockId::PLANKS).unwrap();
        session.player_mut().position = Vec3::new(10.5, 108.5, 8.5);
        session.player_mut().set_rotation(0.0, 0.0);

        let outcome = session.execute(GameCommand::BreakTarget).unwrap();
        let CommandOutcome::Broke(broke) = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(broke.block.id, BlockId::PLANKS);
        assert_eq!(session.player().inventory.count_of(ItemId::from(BlockId::PLANKS)), 1);
    }

    #[test]
    fn test_failed_command_leaves_session_usable() {
        let mut session = session();
        assert!(session.execute(GameCommand::Craft { recipe: "furnace".to_string() }).is_err());
        assert!(session.execute(GameCommand::Save { slot: String::new() }).is_err());
        assert!(session.execute(GameCommand::Save { slot: "ok".to_string() }).is_ok());
        session.tick(0.016);
        assert_eq!(session.list_saves().unwrap(), vec!["ok".to_string()]);
    }
}
