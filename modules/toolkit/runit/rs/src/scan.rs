use eyre::Result;

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::config::ScanConfig;
use crate::record::{Run, RunRecord};
use crate::stitch::ChunkScan;

/// Scan one contiguous chunk in a single left-to-right pass.
///
/// Runs are classified by whether they touch the chunk's edges: the first
/// and last runs are left open so adjacent chunks can be stitched together,
/// everything in between is finalized on the spot. Gaps are transparent
/// (a run separated from an edge only by gaps still counts as touching it)
/// and a stop marker ends the pass with the in-progress run finalized and
/// closed on the right.
pub fn scan_chunk<S, L>(chunk: &[S], config: &ScanConfig<S>) -> Result<ChunkScan<S, L>>
where
    S: Symbol,
    L: PrimUInt,
{
    let casing = *config.casing();
    let gap = *config.gap();
    let stop = *config.stop();

    // First completed run (open at the left edge)
    let mut head: Option<Run<S, L>> = None;
    // Runs detached from both edges
    let mut body = RunRecord::default();
    // In-progress run
    let mut current: Option<(S, usize)> = None;
    let mut stopped = false;

    for &raw in chunk {
        let symbol = casing.fold(raw);
        if gap == Some(symbol) {
            continue;
        }
        if stop == Some(symbol) {
            stopped = true;
            break;
        }
        current = match current {
            Some((running, len)) if running == symbol => Some((running, len + 1)),
            Some((running, len)) => {
                let run = Run::from_raw(running, len)?;
                if head.is_none() {
                    head = Some(run);
                } else {
                    body.observe(run);
                }
                Some((symbol, 1))
            }
            None => Some((symbol, 1)),
        };
    }

    let last = match current {
        Some((running, len)) => Some(Run::from_raw(running, len)?),
        None => None,
    };

    Ok(ChunkScan::assemble(head, body, last, stopped))
}

/// Scan a whole sequence and return its per-symbol best-run table.
///
/// Logically equivalent to scanning the sequence as a single chunk and
/// finalizing the result, which is exactly how it is implemented: the
/// serial and partitioned paths share one scanner.
pub fn scan<S, L>(seq: &[S], config: &ScanConfig<S>) -> Result<RunRecord<S, L>>
where
    S: Symbol,
    L: PrimUInt,
{
    Ok(scan_chunk(seq, config)?.finalize())
}
