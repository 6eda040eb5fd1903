use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPoolBuilder;

use tracto_core_rs::parallelism;
use tracto_runit_rs::{aggregate, scan, ChunkPolicy, Longest, RunIt, ScanConfig};

const THREADS: isize = -1;
const SEED: u64 = 20240913;

// Many short sequences for the batch mode
const NUM_SEQ: usize = 100_000;
const SEQ_LEN: usize = 1_000;

// One long sequence for the chunked mode
const LONG_SEQ_LEN: usize = 500_000_000;

const ALPHABET: &[u8] = b"acgt";
const MAX_RUN: usize = 12;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn random_seq(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut seq = Vec::with_capacity(len);
    while seq.len() < len {
        let symbol = ALPHABET[rng.random_range(0..ALPHABET.len())];
        let run = rng.random_range(1..=MAX_RUN).min(len - seq.len());
        seq.extend(std::iter::repeat_n(symbol, run));
    }
    seq
}

fn report(label: &str, secs: f64, result: &Longest<u8, u32>) {
    println!("  {label}: {secs:.2}s - max run {} for {:?}", result.max(), result.tied());
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let threads = parallelism::available(THREADS).unwrap();
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .use_current_thread()
        .build()
        .unwrap();

    let config = ScanConfig::default();
    let mut runit = RunIt::<u8, u32>::new(Some(pool));
    let mut rng = StdRng::seed_from_u64(SEED);

    println!("Scanning {NUM_SEQ} sequences of length {SEQ_LEN} on {threads} threads");
    let seqs: Vec<Vec<u8>> = (0..NUM_SEQ).map(|_| random_seq(&mut rng, SEQ_LEN)).collect();

    let start = Instant::now();
    let serial = aggregate(seqs.iter().map(|s| scan::<u8, u32>(s, &config).unwrap()));
    report("Serial", start.elapsed().as_secs_f64(), &serial);

    let start = Instant::now();
    let batch = runit.run_batch(&seqs).unwrap();
    report(" Batch", start.elapsed().as_secs_f64(), &batch);
    assert_eq!(serial, batch);
    drop(seqs);

    println!("Scanning one sequence of length {LONG_SEQ_LEN} on {threads} threads");
    let long = random_seq(&mut rng, LONG_SEQ_LEN);

    let start = Instant::now();
    let serial = runit.run_serial(&long).unwrap();
    report("  Serial", start.elapsed().as_secs_f64(), &serial);

    for factor in [1, 4, 16] {
        runit.set_chunk_policy(ChunkPolicy::PerThread { factor });
        let start = Instant::now();
        let parallel = runit.run_parallel(&long).unwrap();
        report(&format!("Chunks x{factor}"), start.elapsed().as_secs_f64(), &parallel);
        assert_eq!(serial, parallel);
    }
}
