use std::collections::BTreeSet;

use serde::Serialize;

/// How an entity's per-gene scores become its set of "top" genes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopSetPolicy {
    /// Keep every gene scoring strictly below `max_score` (p-values).
    Threshold { max_score: f64 },
    /// Keep genes scoring at least `min_score`, best first, at most `cap`
    /// of them (z-score magnitudes).
    RankCapped { min_score: f64, cap: usize },
}

impl TopSetPolicy {
    /// Applies the policy. Equal scores keep their input order, so the
    /// result is fully determined by the input sequence.
    pub fn select<'a, I>(&self, scores: I) -> TopGeneSet
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut kept: Vec<(&str, f64)> = match *self {
            TopSetPolicy::Threshold { max_score } => {
                scores.into_iter().filter(|(_, s)| *s < max_score).collect()
            }
            TopSetPolicy::RankCapped { min_score, .. } => {
                scores.into_iter().filter(|(_, s)| *s >= min_score).collect()
            }
        };
        match *self {
            TopSetPolicy::Threshold { .. } => kept.sort_by(|a, b| a.1.total_cmp(&b.1)),
            TopSetPolicy::RankCapped { cap, .. } => {
                kept.sort_by(|a, b| b.1.total_cmp(&a.1));
                kept.truncate(cap);
            }
        }
        TopGeneSet::from_ranked(kept.into_iter().map(|(g, _)| g.to_string()))
    }
}

/// Selected genes, most significant first, with set semantics for
/// membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopGeneSet {
    ranked: Vec<String>,
    members: BTreeSet<String>,
}

impl TopGeneSet {
    pub fn from_ranked<I>(genes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut ranked = Vec::new();
        let mut members = BTreeSet::new();
        for gene in genes {
            if members.insert(gene.clone()) {
                ranked.push(gene);
            }
        }
        Self { ranked, members }
    }

    pub fn ranked(&self) -> &[String] {
        &self.ranked
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// The first `n` ranked genes as a set.
    pub fn head(&self, n: usize) -> BTreeSet<String> {
        self.ranked.iter().take(n).cloned().collect()
    }
}

/// Collapses repeated measurements of the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReducer {
    /// Z-score magnitudes: the strongest response wins.
    Max,
    /// P-values: the most significant measurement wins.
    Min,
}

impl DuplicateReducer {
    pub fn apply(self, current: f64, incoming: f64) -> f64 {
        match self {
            DuplicateReducer::Max => current.max(incoming),
            DuplicateReducer::Min => current.min(incoming),
        }
    }

    /// Element-wise reduction of `incoming` into `acc`. Both vectors come
    /// from rows of the same width.
    pub fn merge_into(self, acc: &mut [f64], incoming: &[f64]) {
        debug_assert_eq!(acc.len(), incoming.len());
        for (slot, &v) in acc.iter_mut().zip(incoming) {
            *slot = self.apply(*slot, v);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/topset.rs"]
mod tests;
