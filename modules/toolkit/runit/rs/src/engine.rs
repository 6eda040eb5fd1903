use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use eyre::{eyre, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use thread_local::ThreadLocal;

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::config::ScanConfig;
use crate::record::RunRecord;
use crate::result::{aggregate, Longest};
use crate::scan;
use crate::stitch::ChunkScan;
use crate::worker::Worker;
use crate::workload::Workload;

/// Parallel scanning engine: owns the thread pool handle and the
/// per-thread workers, and turns a partitioned sequence into a single
/// [Longest].
///
/// Chunk tasks are independent and share only the read-only sequence view;
/// the first task failure suppresses all remaining spawns and fails the
/// whole run without a partial result.
pub struct Engine<S: Symbol, L: PrimUInt + Send> {
    thread_pool: Option<ThreadPool>,
    workers: ThreadLocal<RefCell<Worker<S, L>>>,
}

impl<S, L> Engine<S, L>
where
    S: Symbol,
    L: PrimUInt + Send + Sync,
{
    pub fn new(thread_pool: Option<ThreadPool>) -> Self {
        Self {
            thread_pool,
            workers: ThreadLocal::new(),
        }
    }

    pub fn threads(&self) -> usize {
        match &self.thread_pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Scan all chunks of one sequence in parallel, then stitch the chunk
    /// summaries in chunk order and aggregate.
    pub fn run(
        &mut self,
        seq: &[S],
        config: &ScanConfig<S>,
        workload: &Workload,
    ) -> Result<Longest<S, L>> {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| self._run(seq, config, workload));
                self.thread_pool = Some(pool);
                result
            }
            None => self._run(seq, config, workload),
        }
    }

    /// Scan many independent sequences in parallel, one task per sequence,
    /// and max-merge everything into a single result.
    pub fn run_batch(
        &mut self,
        seqs: &[impl AsRef<[S]> + Sync],
        config: &ScanConfig<S>,
    ) -> Result<Longest<S, L>> {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| Self::_run_batch(seqs, config));
                self.thread_pool = Some(pool);
                result
            }
            None => Self::_run_batch(seqs, config),
        }
    }

    fn _run(
        &mut self,
        seq: &[S],
        config: &ScanConfig<S>,
        workload: &Workload,
    ) -> Result<Longest<S, L>> {
        // Soft-reset workers left over from the previous run
        for worker in self.workers.iter_mut() {
            worker.get_mut().reset();
        }

        let workers = &self.workers;
        let has_failed = AtomicBool::new(false);
        let error = Mutex::new(None);

        // References for the task closures to copy
        let failed = &has_failed;
        let first_error = &error;

        rayon::scope(|s| {
            for chunk in workload.chunks() {
                // Stop spawning once any task has failed
                if failed.load(Ordering::Relaxed) {
                    break;
                }

                s.spawn(move |_| {
                    if failed.load(Ordering::Relaxed) {
                        return;
                    }

                    let mut worker = workers.get_or_default().borrow_mut();
                    if let Err(err) = worker.process(seq, chunk, config) {
                        failed.store(true, Ordering::Relaxed);
                        log::error!(
                            "Scan of chunk [{}, {}) failed: {err:?}",
                            chunk.start(),
                            chunk.end()
                        );
                        if let Ok(mut slot) = first_error.lock() {
                            slot.get_or_insert(err);
                        }
                    }
                });
            }
        });

        if has_failed.into_inner() {
            let err = error.into_inner().ok().flatten();
            return Err(err.unwrap_or_else(|| eyre!("Chunk scan failed, see log for details")));
        }

        let scans = Worker::collapse(self.workers.iter_mut().map(|x| x.get_mut()));
        debug_assert_eq!(scans.len(), workload.chunks().len());

        let mut folded = ChunkScan::default();
        for scanned in scans {
            folded = folded.combine(scanned)?;
            if folded.stopped() {
                break;
            }
        }
        Ok(aggregate([folded.finalize()]))
    }

    fn _run_batch(seqs: &[impl AsRef<[S]> + Sync], config: &ScanConfig<S>) -> Result<Longest<S, L>> {
        let records = seqs
            .par_iter()
            .map(|seq| scan::scan(seq.as_ref(), config))
            .collect::<Result<Vec<RunRecord<S, L>>>>()?;
        Ok(aggregate(records))
    }
}
