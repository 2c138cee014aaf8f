use crossbeam_channel::{unbounded, Receiver, Sender};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::terrain::TerrainGenerator;
use crate::world::chunk::Chunk;
use crate::world::position::ChunkPos;

struct GenerationWorker {
    request_tx: Option<Sender<ChunkPos>>,
    result_rx: Receiver<Chunk>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    fn spawn(generator: Arc<TerrainGenerator>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = unbounded::<ChunkPos>();
        let (result_tx, result_rx) = unbounded::<Chunk>();

        let handle = std::thread::Builder::new()
            .name("chunk-generation".to_string())
            .spawn(move || {
                for pos in request_rx.iter() {
                    let chunk = generator.generate_chunk(pos);
                    if result_tx.send(chunk).is_err() {
                        break;
                    }
                }
                log::debug!("[GenerationQueue] Worker thread exiting");
            })?;

        Ok(Self {
            request_tx: Some(request_tx),
            result_rx,
            handle: Some(handle),
        })
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("[GenerationQueue] Worker thread panicked");
            }
        }
    }
}

/// Chunk generation requests with at most one outstanding request per position.
///
/// With a worker the chunks are generated on a background thread; without one
/// they are generated when [`GenerationQueue::drain_completed`] runs. Either
/// way callers only see finished chunks through `drain_completed` or
/// [`GenerationQueue::claim`].
pub struct GenerationQueue {
    generator: Arc<TerrainGenerator>,
    in_flight: FxHashSet<ChunkPos>,
    pending: VecDeque<ChunkPos>,
    /// Worker results received while waiting for a claimed chunk
    ready: VecDeque<Chunk>,
    worker: Option<GenerationWorker>,
}

impl GenerationQueue {
    /// Queue that generates on the draining thread
    pub fn synchronous(generator: Arc<TerrainGenerator>) -> Self {
        Self {
            generator,
            in_flight: FxHashSet::default(),
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            worker: None,
        }
    }

    /// Queue backed by a background worker thread, falling back to
    /// synchronous generation if the thread cannot be spawned
    pub fn background(generator: Arc<TerrainGenerator>) -> Self {
        let worker = match GenerationWorker::spawn(Arc::clone(&generator)) {
            Ok(worker) => Some(worker),
            Err(e) => {
                log::warn!("[GenerationQueue] Failed to spawn worker, generating synchronously: {}", e);
                None
            }
        };
        Self {
            generator,
            in_flight: FxHashSet::default(),
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            worker,
        }
    }

    pub fn is_background(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_in_flight(&self, pos: ChunkPos) -> bool {
        self.in_flight.contains(&pos)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Request generation of a chunk. Returns false if a request for the
    /// position is already outstanding.
    pub fn request(&mut self, pos: ChunkPos) -> bool {
        if !self.in_flight.insert(pos) {
            return false;
        }

        if let Some(tx) = self.worker.as_ref().and_then(|w| w.request_tx.as_ref()) {
            if tx.send(pos).is_ok() {
                return true;
            }
            log::warn!("[GenerationQueue] Worker channel closed, generating {:?} synchronously", pos);
        }
        self.pending.push_back(pos);
        true
    }

    /// Collect every chunk finished so far without blocking
    pub fn drain_completed(&mut self) -> Vec<Chunk> {
        let mut done = Vec::new();

        while let Some(pos) = self.pending.pop_front() {
            done.push(self.generator.generate_chunk(pos));
        }
        done.extend(self.ready.drain(..));

        if let Some(worker) = &self.worker {
            done.extend(worker.result_rx.try_iter());
        }

        for chunk in &done {
            self.in_flight.remove(&chunk.position());
        }
        done
    }

    /// Take over the outstanding request for `pos`, if any, so the caller
    /// can use the chunk right away.
    ///
    /// A request still waiting in the synchronous backlog is cancelled and
    /// `None` is returned; the caller generates the chunk itself. A request
    /// handed to the worker is waited for, so the chunk is generated exactly
    /// once. Other results that arrive meanwhile are kept for `drain_completed`.
    pub fn claim(&mut self, pos: ChunkPos) -> Option<Chunk> {
        if !self.in_flight.remove(&pos) {
            return None;
        }
        if let Some(index) = self.pending.iter().position(|p| *p == pos) {
            self.pending.remove(index);
            return None;
        }
        if let Some(index) = self.ready.iter().position(|c| c.position() == pos) {
            return self.ready.remove(index);
        }

        let worker = self.worker.as_ref()?;
        while let Ok(chunk) = worker.result_rx.recv() {
            if chunk.position() == pos {
                return Some(chunk);
            }
            self.ready.push_back(chunk);
        }
        log::warn!("[GenerationQueue] Worker gone while waiting for {:?}", pos);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_requests_are_ignored() {
        let mut queue = GenerationQueue::synchronous(Arc::new(TerrainGenerator::new(3)));
        let pos = ChunkPos::new(4, -2);

        assert!(queue.request(pos));
        assert!(!queue.request(pos));
        assert!(queue.is_in_flight(pos));
        assert_eq!(queue.in_flight_count(), 1);

        let done = queue.drain_completed();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].position(), pos);
        assert!(!queue.is_in_flight(pos));

        // Finished requests can be issued again
        assert!(queue.request(pos));
    }

    #[test]
    fn test_background_worker_matches_synchronous_output() {
        let generator = Arc::new(TerrainGenerator::new(77));
        let mut queue = GenerationQueue::background(Arc::clone(&generator));
        let positions = [ChunkPos::new(0, 0), ChunkPos::new(1, 0), ChunkPos::new(0, 1)];

        for pos in positions {
            assert!(queue.request(pos));
            assert!(!queue.request(pos));
        }

        // Claiming the last request waits for it; earlier results are kept
        let last = positions[2];
        let claimed = queue.claim(last).unwrap();
        assert_eq!(claimed, generator.generate_chunk(last));
        assert!(!queue.is_in_flight(last));
        assert!(queue.claim(last).is_none());

        let mut done = Vec::new();
        while queue.in_flight_count() > 0 {
            done.extend(queue.drain_completed());
            std::thread::yield_now();
        }
        assert_eq!(done.len(), 2);
        for chunk in done {
            assert_eq!(chunk, generator.generate_chunk(chunk.position()));
        }
    }

    #[test]
    fn test_claim_cancels_synchronous_backlog() {
        let mut queue = GenerationQueue::synchronous(Arc::new(TerrainGenerator::new(3)));
        let pos = ChunkPos::new(5, 5);
        assert!(queue.request(pos));

        assert!(queue.claim(pos).is_none());
        assert!(!queue.is_in_flight(pos));
        assert!(queue.drain_completed().is_empty());
    }
}
