use std::cmp::Ordering;

use crate::model::contingency::ContingencyTable;

/// A row that can be placed in a significance ranking.
pub trait Ranked {
    fn p_value(&self) -> f64;
    /// Secondary ordering for equal p-values.
    fn tie_key(&self) -> (&str, &str);
}

/// Ascending p-value; equal p-values ordered by the tie key.
pub fn rank_by_significance<T: Ranked>(rows: &mut [T]) {
    rows.sort_by(|x, y| match x.p_value().total_cmp(&y.p_value()) {
        Ordering::Equal => x.tie_key().cmp(&y.tie_key()),
        other => other,
    });
}

pub fn count_below<T: Ranked>(rows: &[T], threshold: f64) -> usize {
    rows.iter().filter(|r| r.p_value() < threshold).count()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub entity: String,
    pub pathway: String,
    pub table: ContingencyTable,
    pub top_size: usize,
    pub pathway_size: usize,
    pub p_value: f64,
}

impl Ranked for EnrichmentResult {
    fn p_value(&self) -> f64 {
        self.p_value
    }

    fn tie_key(&self) -> (&str, &str) {
        (&self.entity, &self.pathway)
    }
}
