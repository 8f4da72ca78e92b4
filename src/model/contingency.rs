use std::collections::BTreeSet;

use crate::stats::{StatsError, fisher_exact};

/// `[[a, b], [c, d]]` for a selected set `T` against a reference set `P`
/// inside a universe `U`:
///
/// - `a = |T ∩ P|`
/// - `b = |T \ P|`
/// - `c = |P \ T|`
/// - `d = |U| - |T ∪ P|`
///
/// The four counts always sum to `|U|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn from_sets(
        selected: &BTreeSet<String>,
        reference: &BTreeSet<String>,
        universe_size: usize,
    ) -> Result<Self, StatsError> {
        let (small, large) = if selected.len() <= reference.len() {
            (selected, reference)
        } else {
            (reference, selected)
        };
        let inter = small.iter().filter(|g| large.contains(*g)).count();
        let only_selected = selected.len() - inter;
        let only_reference = reference.len() - inter;
        let covered = inter + only_selected + only_reference;
        if covered > universe_size {
            return Err(StatsError::UniverseTooSmall {
                universe: universe_size,
                covered,
            });
        }
        Ok(Self {
            a: inter as u64,
            b: only_selected as u64,
            c: only_reference as u64,
            d: (universe_size - covered) as u64,
        })
    }

    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    pub fn p_value(&self) -> f64 {
        fisher_exact(self)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/contingency.rs"]
mod tests;
