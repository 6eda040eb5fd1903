use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, Result};

/// How a sequence is partitioned into contiguous chunks for parallel
/// scanning.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChunkPolicy {
    /// Split into `factor` chunks per pool thread. Smaller chunks smooth
    /// out load imbalance at the cost of more stitching.
    PerThread { factor: usize },
    /// Split into chunks of a fixed length; the last chunk may be shorter.
    Fixed { len: usize },
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy::PerThread { factor: 2 }
    }
}

impl ChunkPolicy {
    pub fn validate(&self) -> Result<()> {
        match self {
            ChunkPolicy::PerThread { factor } => {
                ensure!(*factor > 0, "Chunks-per-thread factor must be positive")
            }
            ChunkPolicy::Fixed { len } => {
                ensure!(*len > 0, "Fixed chunk length must be positive")
            }
        }
        Ok(())
    }

    fn chunk_len(&self, seqlen: usize, threads: usize) -> usize {
        match self {
            ChunkPolicy::Fixed { len } => *len,
            ChunkPolicy::PerThread { factor } => {
                let chunks = threads.max(1) * factor;
                seqlen.div_ceil(chunks).max(1)
            }
        }
    }
}

/// A contiguous `[start, end)` sub-range of the scanned sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Constructor, Getters, Dissolve)]
pub struct Chunk {
    ind: usize,
    start: usize,
    end: usize,
}

/// The full set of chunks covering one sequence. Chunks are contiguous,
/// non-overlapping, and reconstruct the sequence when concatenated in
/// index order.
#[derive(Clone, PartialEq, Eq, Debug, Default, Getters, Dissolve)]
pub struct Workload {
    chunks: Vec<Chunk>,
}

impl Workload {
    /// Partition `[0, seqlen)` according to the policy. An empty sequence
    /// produces an empty workload.
    pub fn split(seqlen: usize, policy: &ChunkPolicy, threads: usize) -> Result<Self> {
        policy.validate()?;

        let mut chunks = Vec::new();
        if seqlen == 0 {
            return Ok(Self { chunks });
        }

        let len = policy.chunk_len(seqlen, threads);
        let mut start = 0;
        while start < seqlen {
            let end = (start + len).min(seqlen);
            chunks.push(Chunk::new(chunks.len(), start, end));
            start = end;
        }

        if chunks.len() == 1 && threads > 1 {
            log::warn!(
                "Sequence of length {seqlen} fits in a single chunk, the scan will run on one thread"
            );
        }
        Ok(Self { chunks })
    }
}
