pub use config::{Casing, ScanConfig};
pub use record::{Run, RunRecord};
pub use result::{aggregate, Longest};
pub use runit::RunIt;
pub use scan::{scan, scan_chunk};
pub use stitch::ChunkScan;
pub use workload::{Chunk, ChunkPolicy, Workload};

mod config;
mod engine;
mod record;
mod result;
mod runit;
mod scan;
mod stitch;
mod worker;
mod workload;
