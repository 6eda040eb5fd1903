use std::thread::available_parallelism;

use eyre::Result;

fn clamp(requested: isize, max: isize) -> usize {
    if requested > 0 {
        requested.min(max) as usize
    } else if requested == 0 {
        1
    } else {
        // Negative values count backwards from the total: -1 is all cores,
        // -2 leaves one core free, and so on. Never less than one worker.
        (max + requested + 1).max(1) as usize
    }
}

/// Resolve a requested worker count against the cores available on this
/// machine. Positive values are capped at the total, zero means a single
/// worker, negative values count backwards from the total.
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get() as isize;
    Ok(clamp(requested, max))
}
