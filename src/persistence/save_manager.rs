use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

use super::error::{PersistenceError, PersistenceResult, SaveCorruption};
use super::save_data::{LoadedGame, SaveData, SaveSummary};
use super::storage::{FileStorage, MemoryStorage, SaveStorage};
use crate::constants::persistence_constants::{SAVE_FORMAT_VERSION, SAVE_MAGIC};
use crate::player::Player;
use crate::world::World;

/// Outer container of every stored slot. The checksum covers the payload.
#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope {
    magic: [u8; 4],
    version: u32,
    checksum: u32,
    payload: Vec<u8>,
}

/// Confirmation of a completed save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    pub slot: String,
    pub bytes_written: usize,
    pub chunk_count: usize,
}

/// Serialize save data into the versioned, checksummed envelope
pub fn encode_save(data: &SaveData) -> PersistenceResult<Vec<u8>> {
    let payload = bincode::serialize(data)?;
    let envelope = SaveEnvelope {
        magic: SAVE_MAGIC,
        version: SAVE_FORMAT_VERSION,
        checksum: crc32fast::hash(&payload),
        payload,
    };
    Ok(bincode::serialize(&envelope)?)
}

/// Parse and verify an envelope produced by [`encode_save`]
pub fn decode_save(bytes: &[u8]) -> Result<SaveData, SaveCorruption> {
    let envelope: SaveEnvelope =
        bincode::deserialize(bytes).map_err(|e| SaveCorruption::Envelope(e.to_string()))?;

    if envelope.magic != SAVE_MAGIC {
        return Err(SaveCorruption::BadMagic(envelope.magic));
    }
    if envelope.version != SAVE_FORMAT_VERSION {
        return Err(SaveCorruption::UnsupportedVersion(envelope.version));
    }
    let computed = crc32fast::hash(&envelope.payload);
    if computed != envelope.checksum {
        return Err(SaveCorruption::ChecksumMismatch {
            stored: envelope.checksum,
            computed,
        });
    }

    bincode::deserialize(&envelope.payload).map_err(|e| SaveCorruption::Payload(e.to_string()))
}

/// Slot names must contain something other than whitespace and no control characters
pub fn validate_slot_name(slot: &str) -> PersistenceResult<()> {
    if slot.trim().is_empty() || slot.chars().any(char::is_control) {
        return Err(PersistenceError::InvalidSlotName(slot.to_string()));
    }
    Ok(())
}

/// Named save slots on top of a [`SaveStorage`] backend
pub struct SaveManager {
    storage: Box<dyn SaveStorage>,
}

impl SaveManager {
    pub fn new(storage: Box<dyn SaveStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    pub fn on_disk(dir: impl AsRef<Path>) -> PersistenceResult<Self> {
        Ok(Self::new(Box::new(FileStorage::new(dir)?)))
    }

    /// Store the world's generated chunks and the full player state under `slot`,
    /// replacing whatever the slot held before
    pub fn save(&self, slot: &str, world: &World, player: &Player, elapsed: f64) -> PersistenceResult<SaveAck> {
        validate_slot_name(slot)?;
        let start = Instant::now();

        let data = SaveData::capture(world, player, elapsed);
        let bytes = encode_save(&data)?;
        self.storage.write(slot, &bytes)?;

        log::info!(
            "[SaveManager] Saved '{}': {} chunks, {} bytes in {:?}",
            slot,
            data.chunks.len(),
            bytes.len(),
            start.elapsed()
        );

        Ok(SaveAck {
            slot: slot.to_string(),
            bytes_written: bytes.len(),
            chunk_count: data.chunks.len(),
        })
    }

    fn read_data(&self, slot: &str) -> PersistenceResult<SaveData> {
        validate_slot_name(slot)?;
        let bytes = self
            .storage
            .read(slot)?
            .ok_or_else(|| PersistenceError::SlotNotFound(slot.to_string()))?;
        decode_save(&bytes).map_err(|reason| PersistenceError::LoadError {
            slot: slot.to_string(),
            reason,
        })
    }

    /// Read and fully validate a slot. Nothing live is touched; the caller swaps
    /// in the returned world and player.
    pub fn load(&self, slot: &str, background_generation: bool) -> PersistenceResult<LoadedGame> {
        let start = Instant::now();
        let data = self.read_data(slot)?;
        let loaded = data
            .restore(background_generation)
            .map_err(|reason| PersistenceError::LoadError {
                slot: slot.to_string(),
                reason,
            })?;

        log::info!(
            "[SaveManager] Loaded '{}': {} chunks in {:?}",
            slot,
            data.chunks.len(),
            start.elapsed()
        );
        Ok(loaded)
    }

    pub fn summary(&self, slot: &str) -> PersistenceResult<SaveSummary> {
        Ok(self.read_data(slot)?.summary(slot))
    }

    pub fn list_slots(&self) -> PersistenceResult<Vec<String>> {
        self.storage.list()
    }

    pub fn exists(&self, slot: &str) -> PersistenceResult<bool> {
        Ok(self.storage.read(slot)?.is_some())
    }

    pub fn delete(&self, slot: &str) -> PersistenceResult<()> {
        validate_slot_name(slot)?;
        if self.storage.remove(slot)? {
            log::info!("[SaveManager] Deleted '{}'", slot);
            Ok(())
        } else {
            Err(PersistenceError::SlotNotFound(slot.to_string()))
        }
    }
}
