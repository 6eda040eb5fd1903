use std::collections::hash_map::Entry;

use ahash::HashMap;
use derive_getters::Dissolve;
use eyre::Result;

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::config::ScanConfig;
use crate::scan;
use crate::stitch::ChunkScan;
use crate::workload::Chunk;

/// Per-thread scan accumulator. Each pool thread owns exactly one worker
/// and records the summary of every chunk it processed, keyed by chunk
/// index so the engine can reorder them after the join.
#[derive(Dissolve)]
pub struct Worker<S: Symbol, L: PrimUInt> {
    scans: HashMap<usize, ChunkScan<S, L>>,
}

impl<S: Symbol, L: PrimUInt> Default for Worker<S, L> {
    fn default() -> Self {
        Self {
            scans: HashMap::default(),
        }
    }
}

impl<S: Symbol, L: PrimUInt> Worker<S, L> {
    /// Soft-reset between engine runs, keeping the allocation around.
    pub fn reset(&mut self) {
        self.scans.clear();
    }

    pub fn process(&mut self, seq: &[S], chunk: &Chunk, config: &ScanConfig<S>) -> Result<()> {
        let scanned = scan::scan_chunk(&seq[*chunk.start()..*chunk.end()], config)?;
        match self.scans.entry(*chunk.ind()) {
            Entry::Occupied(_) => panic!("Chunk {} was scanned twice", chunk.ind()),
            Entry::Vacant(entry) => entry.insert(scanned),
        };
        Ok(())
    }

    /// Drain all workers and return their chunk summaries in chunk order.
    pub fn collapse<'a>(
        workers: impl Iterator<Item = &'a mut Worker<S, L>>,
    ) -> Vec<ChunkScan<S, L>>
    where
        S: 'a,
        L: 'a,
    {
        let mut scans: Vec<(usize, ChunkScan<S, L>)> = Vec::new();
        for worker in workers {
            scans.extend(worker.scans.drain());
        }
        scans.sort_by_key(|(ind, _)| *ind);
        scans.into_iter().map(|(_, scanned)| scanned).collect()
    }
}
