use thiserror::Error;

/// Why stored save data was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveCorruption {
    #[error("save envelope could not be decoded: {0}")]
    Envelope(String),

    #[error("bad magic bytes {0:?}")]
    BadMagic([u8; 4]),

    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u32),

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("save payload could not be decoded: {0}")]
    Payload(String),

    #[error("chunk ({x}, {z}) is invalid: {reason}")]
    InvalidChunk { x: i32, z: i32, reason: String },

    #[error("chunk ({x}, {z}) appears more than once")]
    DuplicateChunk { x: i32, z: i32 },

    #[error("invalid inventory: {0}")]
    InvalidInventory(String),

    #[error("invalid player state: {0}")]
    InvalidPlayer(String),
}

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid save slot name {0:?}")]
    InvalidSlotName(String),

    #[error("save slot '{0}' not found")]
    SlotNotFound(String),

    #[error("failed to load save slot '{slot}': {reason}")]
    LoadError {
        slot: String,
        #[source]
        reason: SaveCorruption,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for PersistenceError {
    fn from(err: bincode::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
