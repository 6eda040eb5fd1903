use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use tracto_core_rs::Symbol;

/// Whether letter case distinguishes symbols during a scan.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Casing {
    /// 'a' and 'A' are distinct symbols.
    #[default]
    Sensitive,
    /// Every symbol is folded to its canonical casing before any
    /// comparison; reported symbols use the folded form.
    Insensitive,
}

impl Casing {
    #[inline]
    pub fn fold<S: Symbol>(&self, symbol: S) -> S {
        match self {
            Casing::Sensitive => symbol,
            Casing::Insensitive => symbol.fold_case(),
        }
    }
}

/// Scan-time markers and comparison rules.
///
/// A `gap` symbol is skipped without interrupting the surrounding run; a
/// `stop` symbol terminates the scan early. Unset markers disable the
/// corresponding behavior. Both markers are folded together with the
/// sequence when the casing is insensitive, so a gap of `b'n'` also matches
/// `b'N'` in an insensitive scan.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Getters, Dissolve)]
pub struct ScanConfig<S: Symbol> {
    gap: Option<S>,
    stop: Option<S>,
    casing: Casing,
}

impl<S: Symbol> Default for ScanConfig<S> {
    fn default() -> Self {
        Self {
            gap: None,
            stop: None,
            casing: Casing::default(),
        }
    }
}

impl<S: Symbol> ScanConfig<S> {
    /// Validates and canonicalizes the configuration. Fails if the gap and
    /// stop markers collapse into the same symbol, which would make the
    /// scan ambiguous.
    pub fn new(gap: Option<S>, stop: Option<S>, casing: Casing) -> Result<Self> {
        let gap = gap.map(|x| casing.fold(x));
        let stop = stop.map(|x| casing.fold(x));
        if let (Some(gap), Some(stop)) = (gap, stop) {
            ensure!(
                gap != stop,
                "gap and stop markers must be distinct symbols, got {:?} for both",
                gap
            );
        }
        Ok(Self { gap, stop, casing })
    }
}
