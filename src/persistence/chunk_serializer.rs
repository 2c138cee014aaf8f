use serde::{Deserialize, Serialize};

use super::error::SaveCorruption;
use crate::constants::core::{BLOCKS_PER_CHUNK, MAX_METADATA};
use crate::world::{is_registered, BlockId, Chunk, ChunkPos};

/// A chunk as stored in a save: position plus run-length encoded
/// block and metadata arrays in chunk index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub x: i32,
    pub z: i32,
    pub block_runs: Vec<(u16, u32)>,
    pub metadata_runs: Vec<(u8, u32)>,
    /// Edited by the player; such chunks must stay resident after loading
    pub modified: bool,
}

impl ChunkRecord {
    pub fn position(&self) -> ChunkPos {
        ChunkPos::new(self.x, self.z)
    }

    fn invalid(&self, reason: impl Into<String>) -> SaveCorruption {
        SaveCorruption::InvalidChunk {
            x: self.x,
            z: self.z,
            reason: reason.into(),
        }
    }
}

fn rle_encode<T: Copy + PartialEq>(values: &[T]) -> Vec<(T, u32)> {
    let mut runs: Vec<(T, u32)> = Vec::new();
    for &value in values {
        match runs.last_mut() {
            Some((current, length)) if *current == value && *length < u32::MAX => *length += 1,
            _ => runs.push((value, 1)),
        }
    }
    runs
}

/// Expand runs, refusing anything that does not add up to exactly `expected` values
fn rle_decode<T: Copy>(runs: &[(T, u32)], expected: usize) -> Option<Vec<T>> {
    let mut values = Vec::with_capacity(expected);
    for &(value, length) in runs {
        let length = length as usize;
        if length == 0 || values.len() + length > expected {
            return None;
        }
        values.extend(std::iter::repeat(value).take(length));
    }
    (values.len() == expected).then_some(values)
}

/// Encode a chunk for storage
pub fn encode_chunk(chunk: &Chunk) -> ChunkRecord {
    let raw_blocks: Vec<u16> = chunk.blocks().iter().map(|id| id.0).collect();
    let position = chunk.position();
    ChunkRecord {
        x: position.x,
        z: position.z,
        block_runs: rle_encode(&raw_blocks),
        metadata_runs: rle_encode(chunk.metadata()),
        modified: chunk.is_modified(),
    }
}

/// Decode a stored chunk, validating sizes, block types and metadata range
pub fn decode_chunk(record: &ChunkRecord) -> Result<Chunk, SaveCorruption> {
    let raw_blocks = rle_decode(&record.block_runs, BLOCKS_PER_CHUNK)
        .ok_or_else(|| record.invalid("block runs do not cover the chunk"))?;
    let metadata = rle_decode(&record.metadata_runs, BLOCKS_PER_CHUNK)
        .ok_or_else(|| record.invalid("metadata runs do not cover the chunk"))?;

    if let Some(&(unknown, _)) = record.block_runs.iter().find(|(id, _)| !is_registered(BlockId(*id))) {
        return Err(record.invalid(format!("unknown block type {}", unknown)));
    }
    if let Some(&(value, _)) = record.metadata_runs.iter().find(|(value, _)| *value > MAX_METADATA) {
        return Err(record.invalid(format!("metadata value {} out of range", value)));
    }

    let blocks = raw_blocks.into_iter().map(BlockId).collect();
    let mut chunk = Chunk::from_parts(record.position(), blocks, metadata)
        .ok_or_else(|| record.invalid("array length mismatch"))?;
    if record.modified {
        chunk.mark_modified();
    }
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TerrainGenerator;

    #[test]
    fn test_rle_runs() {
        assert_eq!(rle_encode(&[1u8, 1, 1, 2, 2, 1]), vec![(1, 3), (2, 2), (1, 1)]);
        assert_eq!(rle_decode(&[(1u8, 3), (2, 2)], 5), Some(vec![1, 1, 1, 2, 2]));
        assert_eq!(rle_decode(&[(1u8, 3)], 5), None);
        assert_eq!(rle_decode(&[(1u8, 6)], 5), None);
        assert_eq!(rle_decode(&[(1u8, 0), (1, 5)], 5), None);
    }

    #[test]
    fn test_generated_chunk_survives_encoding() {
        let generator = TerrainGenerator::new(99);
        let mut chunk = generator.generate_chunk(ChunkPos::new(-3, 7));
        chunk.set_metadata(4, 40, 4, 5);

        let record = encode_chunk(&chunk);
        assert!(record.block_runs.len() < BLOCKS_PER_CHUNK / 4);
        assert_eq!(decode_chunk(&record), Ok(chunk));
    }

    #[test]
    fn test_rejects_bad_records() {
        let chunk = Chunk::new(ChunkPos::new(0, 0));
        let mut record = encode_chunk(&chunk);
        record.block_runs[0].0 = 999;
        assert!(matches!(decode_chunk(&record), Err(SaveCorruption::InvalidChunk { .. })));

        let mut record = encode_chunk(&chunk);
        record.metadata_runs[0].0 = 16;
        assert!(matches!(decode_chunk(&record), Err(SaveCorruption::InvalidChunk { .. })));

        let mut record = encode_chunk(&chunk);
        record.block_runs[0].1 -= 1;
        assert!(matches!(decode_chunk(&record), Err(SaveCorruption::InvalidChunk { .. })));
    }
}
