use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{eyre, Result};

use tracto_core_rs::num::PrimUInt;
use tracto_core_rs::Symbol;

/// A finalized run: `len` consecutive copies of `symbol`, gaps excluded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Constructor, Getters, Dissolve)]
pub struct Run<S: Symbol, L: PrimUInt> {
    symbol: S,
    len: L,
}

impl<S: Symbol, L: PrimUInt> Run<S, L> {
    pub(crate) fn from_raw(symbol: S, len: usize) -> Result<Self> {
        let len = L::from(len)
            .ok_or_else(|| eyre!("Run of {} {:?} can't fit in {:?}", len, symbol, L::max_value()))?;
        Ok(Self { symbol, len })
    }
}

/// Per-symbol best run lengths over everything scanned so far.
///
/// Symbols absent from the record are implicitly length zero; stored runs
/// are always at least one symbol long.
#[derive(Clone, PartialEq, Eq, Debug, Dissolve)]
pub struct RunRecord<S: Symbol, L: PrimUInt> {
    best: AHashMap<S, L>,
}

impl<S: Symbol, L: PrimUInt> Default for RunRecord<S, L> {
    fn default() -> Self {
        Self {
            best: AHashMap::new(),
        }
    }
}

impl<S: Symbol, L: PrimUInt> RunRecord<S, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finalized run, keeping the maximum length per symbol.
    /// Zero-length runs are ignored to preserve the absent-means-zero rule.
    pub fn observe(&mut self, run: Run<S, L>) {
        let (symbol, len) = run.dissolve();
        if len == L::zero() {
            return;
        }
        let best = self.best.entry(symbol).or_insert_with(L::zero);
        *best = (*best).max(len);
    }

    /// Max-merge another record into this one. Commutative and idempotent.
    pub fn merge(&mut self, other: RunRecord<S, L>) {
        for (symbol, len) in other.best {
            let best = self.best.entry(symbol).or_insert_with(L::zero);
            *best = (*best).max(len);
        }
    }

    /// Best run length for `symbol`, zero if it was never observed.
    pub fn get(&self, symbol: &S) -> L {
        self.best.get(symbol).copied().unwrap_or_else(L::zero)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &L)> {
        self.best.iter()
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

impl<S: Symbol, L: PrimUInt> FromIterator<(S, L)> for RunRecord<S, L> {
    fn from_iter<T: IntoIterator<Item = (S, L)>>(iter: T) -> Self {
        let mut record = Self::default();
        for (symbol, len) in iter {
            record.observe(Run::new(symbol, len));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_keeps_maximum() {
        let mut record: RunRecord<u8, u32> = RunRecord::new();
        record.observe(Run::new(b'a', 2));
        record.observe(Run::new(b'a', 5));
        record.observe(Run::new(b'a', 3));
        record.observe(Run::new(b'b', 1));

        assert_eq!(record.get(&b'a'), 5);
        assert_eq!(record.get(&b'b'), 1);
        assert_eq!(record.get(&b'c'), 0);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_zero_runs_are_dropped() {
        let mut record: RunRecord<char, u32> = RunRecord::new();
        record.observe(Run::new('x', 0));
        assert!(record.is_empty());
    }

    #[test]
    fn test_merge() {
        let mut left: RunRecord<char, u32> = [('a', 4u32), ('b', 2)].into_iter().collect();
        let right = [('b', 6u32), ('c', 1)].into_iter().collect();
        left.merge(right);

        let expected: RunRecord<char, u32> =
            [('a', 4u32), ('b', 6), ('c', 1)].into_iter().collect();
        assert_eq!(left, expected);
    }

    #[test]
    fn test_narrow_lengths_overflow() {
        assert!(Run::<u8, u8>::from_raw(b'a', 255).is_ok());
        assert!(Run::<u8, u8>::from_raw(b'a', 256).is_err());
    }
}
