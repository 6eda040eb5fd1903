use eyre::Result;
use rayon::ThreadPool;

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::config::ScanConfig;
use crate::engine::Engine;
use crate::result::{aggregate, Longest};
use crate::scan;
use crate::workload::{ChunkPolicy, Workload};

/// Facade tying together the scan configuration, the chunking policy, and
/// the parallel engine.
///
/// Without an explicit thread pool the parallel paths run on rayon's
/// global pool. The facade is reusable: one `RunIt` can process any number
/// of sequences with the same configuration.
pub struct RunIt<S: Symbol, L: PrimUInt + Send> {
    config: ScanConfig<S>,
    policy: ChunkPolicy,
    engine: Engine<S, L>,
}

impl<S, L> RunIt<S, L>
where
    S: Symbol,
    L: PrimUInt + Send + Sync,
{
    pub fn new(pool: Option<ThreadPool>) -> Self {
        Self {
            config: ScanConfig::default(),
            policy: ChunkPolicy::default(),
            engine: Engine::new(pool),
        }
    }

    pub fn set_config(&mut self, config: ScanConfig<S>) -> &mut Self {
        self.config = config;
        self
    }

    pub fn set_chunk_policy(&mut self, policy: ChunkPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Whole-sequence baseline: a single scan followed by aggregation.
    pub fn run_serial(&self, seq: &[S]) -> Result<Longest<S, L>> {
        Ok(aggregate([scan::scan(seq, &self.config)?]))
    }

    /// Chunked parallel scan with exact boundary stitching. Produces the
    /// same result as [RunIt::run_serial] for every sequence, policy, and
    /// pool size.
    pub fn run_parallel(&mut self, seq: &[S]) -> Result<Longest<S, L>> {
        let workload = Workload::split(seq.len(), &self.policy, self.engine.threads())?;
        self.engine.run(seq, &self.config, &workload)
    }

    /// Scan many sequences concurrently, one task per sequence, and merge
    /// all records into a single result.
    pub fn run_batch(&mut self, seqs: &[impl AsRef<[S]> + Sync]) -> Result<Longest<S, L>> {
        self.engine.run_batch(seqs, &self.config)
    }
}
