use chrono::{DateTime, TimeZone, Utc};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::chunk_serializer::{decode_chunk, encode_chunk, ChunkRecord};
use super::error::SaveCorruption;
use crate::item::{ItemId, ItemStack};
use crate::player::{Inventory, Player};
use crate::world::World;

/// One occupied inventory slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub index: u32,
    pub item: u16,
    pub count: u32,
    pub durability: Option<u32>,
}

/// Everything persisted about the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub spawn_point: Vec3,
    pub inventory_size: u32,
    pub slots: Vec<SlotRecord>,
    pub selected_slot: u32,
    pub discovered: Vec<u16>,
}

impl PlayerRecord {
    pub fn capture(player: &Player) -> Self {
        let slots = player
            .inventory
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|stack| SlotRecord {
                    index: index as u32,
                    item: stack.item_id.0,
                    count: stack.count,
                    durability: stack.durability,
                })
            })
            .collect();

        Self {
            position: player.position,
            velocity: player.velocity,
            yaw: player.yaw,
            pitch: player.pitch,
            health: player.health(),
            max_health: player.max_health(),
            spawn_point: player.spawn_point(),
            inventory_size: player.inventory.size() as u32,
            slots,
            selected_slot: player.inventory.selected_slot() as u32,
            discovered: player.discovered_items().iter().map(|item| item.0).collect(),
        }
    }

    /// Rebuild the player, rejecting values a live player could never hold
    pub fn restore(&self) -> Result<Player, SaveCorruption> {
        let vectors_finite = [self.position, self.velocity, self.spawn_point]
            .iter()
            .all(|v| v.is_finite());
        if !vectors_finite || !self.yaw.is_finite() || !self.pitch.is_finite() {
            return Err(SaveCorruption::InvalidPlayer("non-finite position or rotation".to_string()));
        }
        if !(self.max_health.is_finite() && self.max_health >= 1.0) {
            return Err(SaveCorruption::InvalidPlayer(format!("max health {}", self.max_health)));
        }
        if !(self.health.is_finite() && self.health >= 0.0 && self.health <= self.max_health) {
            return Err(SaveCorruption::InvalidPlayer(format!("health {}", self.health)));
        }

        let mut player = Player::new(self.spawn_point).with_max_health(self.max_health);
        player.restore_state(self.position, self.velocity, self.yaw, self.pitch, self.health);
        player.inventory = self.restore_inventory()?;
        player.set_discovered_items(self.discovered.iter().copied().map(ItemId).collect::<BTreeSet<_>>());
        Ok(player)
    }

    fn restore_inventory(&self) -> Result<Inventory, SaveCorruption> {
        let mut inventory = Inventory::new();
        if self.inventory_size as usize != inventory.size() {
            return Err(SaveCorruption::InvalidInventory(format!(
                "expected {} slots, found {}",
                inventory.size(),
                self.inventory_size
            )));
        }

        let mut seen = BTreeSet::new();
        for record in &self.slots {
            if !seen.insert(record.index) {
                return Err(SaveCorruption::InvalidInventory(format!("slot {} stored twice", record.index)));
            }
            let stack = ItemStack {
                item_id: ItemId(record.item),
                count: record.count,
                durability: record.durability,
            };
            inventory
                .set_slot(record.index as usize, Some(stack))
                .map_err(|e| SaveCorruption::InvalidInventory(e.to_string()))?;
        }
        inventory
            .select_slot(self.selected_slot as usize)
            .map_err(|e| SaveCorruption::InvalidInventory(e.to_string()))?;
        Ok(inventory)
    }
}

/// Complete contents of a save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub seed: u32,
    /// Game time in seconds, drives the day/night cycle
    pub elapsed: f64,
    /// Milliseconds since the Unix epoch
    pub saved_at_ms: i64,
    /// Generated chunks only, sorted by position
    pub chunks: Vec<ChunkRecord>,
    pub player: PlayerRecord,
}

/// A fully validated load, ready to replace the live game state
pub struct LoadedGame {
    pub world: World,
    pub player: Player,
    pub elapsed: f64,
    pub saved_at: DateTime<Utc>,
}

impl SaveData {
    pub fn capture(world: &World, player: &Player, elapsed: f64) -> Self {
        let mut chunks: Vec<ChunkRecord> = world.chunks().map(encode_chunk).collect();
        chunks.sort_by_key(|record| (record.x, record.z));

        Self {
            seed: world.seed(),
            elapsed,
            saved_at_ms: Utc::now().timestamp_millis(),
            chunks,
            player: PlayerRecord::capture(player),
        }
    }

    pub fn saved_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.saved_at_ms)
            .single()
            .unwrap_or_default()
    }

    /// Build a fresh world and player from the stored state
    pub fn restore(&self, background_generation: bool) -> Result<LoadedGame, SaveCorruption> {
        if !(self.elapsed.is_finite() && self.elapsed >= 0.0) {
            return Err(SaveCorruption::InvalidPlayer(format!("elapsed time {}", self.elapsed)));
        }

        let mut world = if background_generation {
            World::with_background_generation(self.seed)
        } else {
            World::new(self.seed)
        };
        for record in &self.chunks {
            if world.is_chunk_generated(record.position()) {
                return Err(SaveCorruption::DuplicateChunk { x: record.x, z: record.z });
            }
            world.insert_chunk(decode_chunk(record)?);
        }

        Ok(LoadedGame {
            world,
            player: self.player.restore()?,
            elapsed: self.elapsed,
            saved_at: self.saved_at(),
        })
    }

    pub fn summary(&self, slot: &str) -> SaveSummary {
        SaveSummary {
            slot: slot.to_string(),
            saved_at: self.saved_at().to_rfc3339(),
            seed: self.seed,
            chunk_count: self.chunks.len(),
            position: self.player.position.to_array(),
            health: self.player.health,
            elapsed: self.elapsed,
        }
    }
}

/// Human-readable description of a save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub slot: String,
    pub saved_at: String,
    pub seed: u32,
    pub chunk_count: usize,
    pub position: [f32; 3],
    pub health: f32,
    pub elapsed: f64,
}

impl SaveSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlockId, ChunkPos, VoxelPos};

    fn sample_player() -> Player {
        let mut player = Player::new(Vec3::new(8.0, 40.0, 8.0));
        player.position = Vec3::new(3.5, 30.0, -2.25);
        player.set_rotation(1.0, -0.2);
        player.apply_damage(5.5);
        player.inventory.add_item(ItemId::from(BlockId::DIRT), 10).unwrap();
        player
            .inventory
            .set_slot(4, Some(ItemStack::tool(ItemId::PICKAXE_IRON, 17)))
            .unwrap();
        player.inventory.select_slot(4).unwrap();
        player.record_held_items();
        player
    }

    #[test]
    fn test_player_record_round_trip() {
        let player = sample_player();
        let restored = PlayerRecord::capture(&player).restore().unwrap();
        assert_eq!(restored.position, player.position);
        assert_eq!(restored.health(), player.health());
        assert_eq!(restored.inventory, player.inventory);
        assert_eq!(restored.discovered_items(), player.discovered_items());
        assert_eq!(restored.yaw, player.yaw);
    }

    #[test]
    fn test_invalid_player_records_are_rejected() {
        let mut record = PlayerRecord::capture(&sample_player());
        record.health = -1.0;
        assert!(matches!(record.restore(), Err(SaveCorruption::InvalidPlayer(_))));

        let mut record = PlayerRecord::capture(&sample_player());
        record.slots.push(SlotRecord { index: 99, item: 1, count: 1, durability: None });
        assert!(matches!(record.restore(), Err(SaveCorruption::InvalidInventory(_))));

        let mut record = PlayerRecord::capture(&sample_player());
        record.slots[0].count = 500;
        assert!(matches!(record.restore(), Err(SaveCorruption::InvalidInventory(_))));
    }

    #[test]
    fn test_save_data_restores_world() {
        let mut world = World::new(5);
        world.set_block(VoxelPos::new(1, 60, 1), BlockId::BRICK).unwrap();
        world.ensure_chunk(ChunkPos::new(-1, 0));
        let data = SaveData::capture(&world, &sample_player(), 42.0);
        assert_eq!(data.chunks.len(), 2);

        let loaded = data.restore(false).unwrap();
        assert_eq!(loaded.world.seed(), 5);
        assert_eq!(loaded.world.chunk_count(), 2);
        assert_eq!(loaded.world.block_at(VoxelPos::new(1, 60, 1)).map(|b| b.id), Some(BlockId::BRICK));
        assert_eq!(loaded.elapsed, 42.0);

        // The edit flag survives, so streaming keeps the edited chunk
        assert!(loaded.world.chunk(ChunkPos::new(0, 0)).map_or(false, |c| c.is_modified()));
        assert!(loaded.world.chunk(ChunkPos::new(-1, 0)).map_or(false, |c| !c.is_modified()));
        let mut world = loaded.world;
        world.unload_far_chunks(ChunkPos::new(40, 40), 1);
        assert_eq!(world.block_at(VoxelPos::new(1, 60, 1)).map(|b| b.id), Some(BlockId::BRICK));
        assert!(!world.is_chunk_generated(ChunkPos::new(-1, 0)));
    }

    #[test]
    fn test_summary_json() {
        let data = SaveData::capture(&World::new(1), &sample_player(), 0.0);
        let json = data.summary("slot").to_json().unwrap();
        assert!(json.contains("\"slot\": \"slot\""));
        assert!(json.contains("\"seed\": 1"));
    }
}
