use eyre::{eyre, Result};

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::record::{Run, RunRecord};

/// Runs of one scanned chunk, classified relative to the chunk's edges.
#[derive(Clone, PartialEq, Eq, Debug)]
enum Runs<S: Symbol, L: PrimUInt> {
    /// The chunk held no symbols at all (empty or gaps-only).
    Empty,
    /// A single run spanning the whole chunk, open at both edges.
    Uniform(Run<S, L>),
    /// At least one finished run. `head` is open at the left edge, `tail`
    /// at the right one; `tail` is `None` when a stop marker closed the
    /// chunk early. `body` runs are detached from both edges.
    Split {
        head: Run<S, L>,
        body: RunRecord<S, L>,
        tail: Option<Run<S, L>>,
    },
}

/// Summary of one scanned chunk, used to stitch runs back together across
/// chunk boundaries before aggregation.
///
/// Summaries combine left-to-right in chunk order: an open tail run joins
/// the neighbor's open head run of the same symbol, chunks without symbols
/// are the identity (so a run passes through an all-gap chunk untouched),
/// and a stopped summary swallows everything to its right. Folding the
/// summaries of any partitioning therefore reproduces exactly the runs of
/// a whole-sequence scan.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChunkScan<S: Symbol, L: PrimUInt> {
    runs: Runs<S, L>,
    stopped: bool,
}

impl<S: Symbol, L: PrimUInt> Default for ChunkScan<S, L> {
    fn default() -> Self {
        Self {
            runs: Runs::Empty,
            stopped: false,
        }
    }
}

fn join<S: Symbol, L: PrimUInt>(left: Run<S, L>, right: Run<S, L>) -> Result<Run<S, L>> {
    debug_assert_eq!(left.symbol(), right.symbol());
    let len = left.len().checked_add(right.len()).ok_or_else(|| {
        eyre!(
            "Stitched run of {:?} can't fit in {:?}",
            left.symbol(),
            L::max_value()
        )
    })?;
    Ok(Run::new(*left.symbol(), len))
}

impl<S: Symbol, L: PrimUInt> ChunkScan<S, L> {
    /// Build a summary from the raw scan state: the first completed run,
    /// the detached runs, the run still in progress at the end of the
    /// pass, and whether a stop marker ended the pass.
    pub(crate) fn assemble(
        head: Option<Run<S, L>>,
        mut body: RunRecord<S, L>,
        last: Option<Run<S, L>>,
        stopped: bool,
    ) -> Self {
        let runs = match (head, last) {
            (None, None) => Runs::Empty,
            // The only run of the chunk: open at both edges unless a stop
            // closed it on the right.
            (None, Some(only)) if !stopped => Runs::Uniform(only),
            (None, Some(only)) => Runs::Split {
                head: only,
                body,
                tail: None,
            },
            (Some(head), Some(last)) => {
                // A stop closes the in-progress run on the right
                let tail = if stopped {
                    body.observe(last);
                    None
                } else {
                    Some(last)
                };
                Runs::Split { head, body, tail }
            }
            // A completed run implies a later in-progress one
            (Some(_), None) => unreachable!(),
        };
        Self { runs, stopped }
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Combine with the summary of the chunk immediately to the right.
    pub fn combine(self, right: Self) -> Result<Self> {
        // Everything right of a stop marker is discarded
        if self.stopped {
            return Ok(self);
        }
        let stopped = right.stopped;
        let runs = match (self.runs, right.runs) {
            (Runs::Empty, runs) => runs,
            (runs, Runs::Empty) => runs,
            (Runs::Uniform(left), Runs::Uniform(run)) => {
                if left.symbol() == run.symbol() {
                    Runs::Uniform(join(left, run)?)
                } else {
                    Runs::Split {
                        head: left,
                        body: RunRecord::default(),
                        tail: Some(run),
                    }
                }
            }
            (Runs::Uniform(left), Runs::Split { head, body, tail }) => {
                if left.symbol() == head.symbol() {
                    Runs::Split {
                        head: join(left, head)?,
                        body,
                        tail,
                    }
                } else {
                    let mut body = body;
                    body.observe(head);
                    Runs::Split {
                        head: left,
                        body,
                        tail,
                    }
                }
            }
            (
                Runs::Split {
                    head,
                    mut body,
                    tail: Some(tail),
                },
                Runs::Uniform(run),
            ) => {
                if tail.symbol() == run.symbol() {
                    Runs::Split {
                        head,
                        body,
                        tail: Some(join(tail, run)?),
                    }
                } else {
                    body.observe(tail);
                    Runs::Split {
                        head,
                        body,
                        tail: Some(run),
                    }
                }
            }
            (
                Runs::Split {
                    head,
                    mut body,
                    tail: Some(tail),
                },
                Runs::Split {
                    head: next,
                    body: rest,
                    tail: last,
                },
            ) => {
                body.merge(rest);
                if tail.symbol() == next.symbol() {
                    body.observe(join(tail, next)?);
                } else {
                    body.observe(tail);
                    body.observe(next);
                }
                Runs::Split {
                    head,
                    body,
                    tail: last,
                }
            }
            // A tail-less summary is always stopped and returned above
            (Runs::Split { tail: None, .. }, _) => unreachable!(),
        };
        Ok(Self { runs, stopped })
    }

    /// Close the remaining open runs and produce the final record.
    pub fn finalize(self) -> RunRecord<S, L> {
        match self.runs {
            Runs::Empty => RunRecord::default(),
            Runs::Uniform(run) => {
                let mut record = RunRecord::default();
                record.observe(run);
                record
            }
            Runs::Split { head, body, tail } => {
                let mut record = body;
                record.observe(head);
                if let Some(tail) = tail {
                    record.observe(tail);
                }
                record
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Casing, ScanConfig};
    use crate::scan::scan_chunk;

    fn summaries(
        chunks: &[&[u8]],
        config: &ScanConfig<u8>,
    ) -> Result<Vec<ChunkScan<u8, u32>>> {
        chunks.iter().map(|c| scan_chunk(c, config)).collect()
    }

    fn stitch(
        chunks: &[&[u8]],
        config: &ScanConfig<u8>,
    ) -> Result<RunRecord<u8, u32>> {
        let mut folded = ChunkScan::default();
        for summary in summaries(chunks, config)? {
            folded = folded.combine(summary)?;
            if folded.stopped() {
                break;
            }
        }
        Ok(folded.finalize())
    }

    fn record(entries: &[(u8, u32)]) -> RunRecord<u8, u32> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_runs_join_across_boundaries() -> Result<()> {
        let config = ScanConfig::default();
        assert_eq!(stitch(&[b"AA", b"AA"], &config)?, record(&[(b'A', 4)]));
        assert_eq!(
            stitch(&[b"AAB", b"BBC"], &config)?,
            record(&[(b'A', 2), (b'B', 3), (b'C', 1)])
        );
        assert_eq!(
            stitch(&[b"A", b"A", b"A", b"A"], &config)?,
            record(&[(b'A', 4)])
        );
        Ok(())
    }

    #[test]
    fn test_runs_pass_through_gap_chunks() -> Result<()> {
        let config = ScanConfig::new(Some(b'-'), None, Casing::Sensitive)?;
        assert_eq!(
            stitch(&[b"AA", b"--", b"AA"], &config)?,
            record(&[(b'A', 4)])
        );
        assert_eq!(stitch(&[b"", b"AA", b""], &config)?, record(&[(b'A', 2)]));
        Ok(())
    }

    #[test]
    fn test_stop_truncates_the_fold() -> Result<()> {
        let config = ScanConfig::new(None, Some(b'*'), Casing::Sensitive)?;
        assert_eq!(
            stitch(&[b"AA", b"A*BBBB", b"BB"], &config)?,
            record(&[(b'A', 3)])
        );
        assert_eq!(stitch(&[b"*AAAA", b"BB"], &config)?, record(&[]));
        Ok(())
    }

    #[test]
    fn test_identity_and_associativity() -> Result<()> {
        let config = ScanConfig::default();
        let chunks = summaries(&[b"AAB", b"BAC", b"CC"], &config)?;
        let (a, b, c) = (chunks[0].clone(), chunks[1].clone(), chunks[2].clone());

        let empty = ChunkScan::default();
        assert_eq!(empty.clone().combine(a.clone())?, a);
        assert_eq!(a.clone().combine(empty)?, a);

        let left = a.clone().combine(b.clone())?.combine(c.clone())?;
        let right = a.combine(b.combine(c)?)?;
        assert_eq!(left, right);
        Ok(())
    }

    #[test]
    fn test_stitched_lengths_can_overflow() -> Result<()> {
        let config = ScanConfig::default();
        let halves = [vec![b'a'; 200], vec![b'a'; 100]];
        let left: ChunkScan<u8, u8> = scan_chunk(&halves[0], &config)?;
        let right = scan_chunk(&halves[1], &config)?;
        assert!(left.combine(right).is_err());
        Ok(())
    }
}
