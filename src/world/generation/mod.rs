//! Procedural chunk generation

pub mod queue;
pub mod terrain;

pub use queue::GenerationQueue;
pub use terrain::TerrainGenerator;
