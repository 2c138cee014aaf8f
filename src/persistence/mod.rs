//! Persistence system for saving and loading game data
//!
//! A save slot holds one versioned, checksummed envelope around the bincode
//! encoded [`SaveData`]: the world seed, every generated chunk, the player
//! record and the elapsed game time. Loading validates everything before the
//! caller replaces any live state.

pub mod chunk_serializer;
pub mod error;
pub mod save_data;
pub mod save_manager;
pub mod storage;

pub use chunk_serializer::{decode_chunk, encode_chunk, ChunkRecord};
pub use error::{PersistenceError, PersistenceResult, SaveCorruption};
pub use save_data::{LoadedGame, PlayerRecord, SaveData, SaveSummary, SlotRecord};
pub use save_manager::{decode_save, encode_save, validate_slot_name, SaveAck, SaveManager};
pub use storage::{FileStorage, MemoryStorage, SaveStorage};
