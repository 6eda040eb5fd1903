use derive_getters::{Dissolve, Getters};
use itertools::Itertools;

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

use crate::record::RunRecord;

/// Final outcome of one or more scans: the merged per-symbol table, the
/// global maximum run length, and every symbol tied at that maximum.
///
/// Built only by [aggregate]; `tied` is sorted ascending so reported
/// results are reproducible across runs regardless of hashing or task
/// completion order. Empty input yields a zero maximum and no tied symbols.
#[derive(Clone, PartialEq, Eq, Debug, Getters, Dissolve)]
pub struct Longest<S: Symbol, L: PrimUInt> {
    record: RunRecord<S, L>,
    max: L,
    tied: Vec<S>,
}

impl<S: Symbol, L: PrimUInt> Longest<S, L> {
    fn build(record: RunRecord<S, L>) -> Self {
        let max = record
            .iter()
            .map(|(_, len)| *len)
            .max()
            .unwrap_or_else(L::zero);
        let tied = record
            .iter()
            .filter(|(_, len)| **len == max)
            .map(|(symbol, _)| *symbol)
            .sorted()
            .collect();
        Self { record, max, tied }
    }
}

/// Max-merge any number of run records into a single [Longest].
///
/// The merge is commutative, associative, and idempotent, so the outcome
/// does not depend on how scanned ranges were partitioned or in which
/// order their records arrive.
pub fn aggregate<S, L>(records: impl IntoIterator<Item = RunRecord<S, L>>) -> Longest<S, L>
where
    S: Symbol,
    L: PrimUInt,
{
    let mut merged = RunRecord::default();
    for record in records {
        merged.merge(record);
    }
    Longest::build(merged)
}
