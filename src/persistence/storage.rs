use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::PersistenceResult;
use crate::constants::persistence_constants::SAVE_EXTENSION;

/// Byte-level backing store for save slots, keyed by slot name
pub trait SaveStorage: Send + Sync {
    /// Write a slot, replacing any previous contents completely
    fn write(&self, slot: &str, bytes: &[u8]) -> PersistenceResult<()>;

    /// Read a slot; `None` if it does not exist
    fn read(&self, slot: &str) -> PersistenceResult<Option<Vec<u8>>>;

    /// Slot names, sorted
    fn list(&self) -> PersistenceResult<Vec<String>>;

    /// Remove a slot; `false` if it did not exist
    fn remove(&self, slot: &str) -> PersistenceResult<bool>;
}

/// In-process storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStorage for MemoryStorage {
    fn write(&self, slot: &str, bytes: &[u8]) -> PersistenceResult<()> {
        self.slots.write().insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, slot: &str) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.slots.read().get(slot).cloned())
    }

    fn list(&self) -> PersistenceResult<Vec<String>> {
        Ok(self.slots.read().keys().cloned().collect())
    }

    fn remove(&self, slot: &str) -> PersistenceResult<bool> {
        Ok(self.slots.write().remove(slot).is_some())
    }
}

/// One `<slot>.sav` file per slot inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a save directory
    pub fn new(dir: impl AsRef<Path>) -> PersistenceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_file_stem(slot), SAVE_EXTENSION))
    }
}

impl SaveStorage for FileStorage {
    fn write(&self, slot: &str, bytes: &[u8]) -> PersistenceResult<()> {
        let path = self.path_for(slot);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn read(&self, slot: &str) -> PersistenceResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(slot)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> PersistenceResult<Vec<String>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            if let Some(slot) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_file_stem) {
                slots.push(slot);
            }
        }
        slots.sort();
        Ok(slots)
    }

    fn remove(&self, slot: &str) -> PersistenceResult<bool> {
        match fs::remove_file(self.path_for(slot)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9_-]` so any slot name maps to a
/// distinct, portable file name
fn encode_file_stem(slot: &str) -> String {
    let mut stem = String::with_capacity(slot.len());
    for byte in slot.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

fn decode_file_stem(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
