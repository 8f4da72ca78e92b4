use std::cmp::Ordering;

use crate::input::InputError;
use crate::input::matrix::LabeledMatrix;
use crate::model::topset::TopSetPolicy;
use crate::pipeline::enrich::EntityTopSet;
use crate::stats::{Correlation, StatsError, pearson};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneCorrelation {
    pub gene: String,
    pub correlation: Correlation,
}

/// Correlations of one drug's response with every usable feature row.
#[derive(Debug, Clone)]
pub struct DrugCorrelations {
    pub drug: String,
    pub genes: Vec<GeneCorrelation>,
}

/// Correlates each drug's response row with each feature row, masking
/// positions missing in either. Features for which `keep_feature` returns
/// false are ignored; undefined correlations (constant rows, too few pairs)
/// are left out, so a drug without observed responses ends up with none.
pub fn correlate_drugs<F>(
    responses: &LabeledMatrix,
    features: &LabeledMatrix,
    keep_feature: F,
) -> Result<Vec<DrugCorrelations>, StatsError>
where
    F: Fn(&str) -> bool,
{
    let mut out = Vec::with_capacity(responses.rows.len());
    for drug_row in &responses.rows {
        if drug_row.values.iter().all(Option::is_none) {
            tracing::warn!("drug {} has no observed responses", drug_row.id);
        }
        let mut genes = Vec::new();
        for feature in &features.rows {
            if !keep_feature(&feature.id) {
                continue;
            }
            if let Some(correlation) = pearson(&drug_row.values, &feature.values)? {
                genes.push(GeneCorrelation {
                    gene: feature.id.clone(),
                    correlation,
                });
            }
        }
        out.push(DrugCorrelations {
            drug: drug_row.id.clone(),
            genes,
        });
    }
    Ok(out)
}

pub fn check_same_samples(
    responses: &LabeledMatrix,
    features: &LabeledMatrix,
    features_label: &str,
) -> Result<(), InputError> {
    if responses.n_columns() != features.n_columns() {
        return Err(InputError::ShapeMismatch {
            left: "drug response table".to_string(),
            left_len: responses.n_columns(),
            right: features_label.to_string(),
            right_len: features.n_columns(),
        });
    }
    Ok(())
}

/// Per-drug top sets from correlation p-values. Every drug is kept, even
/// with an empty set.
pub fn threshold_top_sets(drugs: &[DrugCorrelations], p_threshold: f64) -> Vec<EntityTopSet> {
    let policy = TopSetPolicy::Threshold {
        max_score: p_threshold,
    };
    drugs
        .iter()
        .map(|d| EntityTopSet {
            entity: d.drug.clone(),
            genes: policy.select(
                d.genes
                    .iter()
                    .map(|g| (g.gene.as_str(), g.correlation.p_value)),
            ),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignificantPair {
    pub gene: String,
    pub drug: String,
    pub p_value: f64,
}

/// Every (gene, drug) pair below the threshold, most significant first.
pub fn significant_pairs(drugs: &[DrugCorrelations], p_threshold: f64) -> Vec<SignificantPair> {
    let mut pairs: Vec<SignificantPair> = drugs
        .iter()
        .flat_map(|d| {
            d.genes
                .iter()
                .filter(|g| g.correlation.p_value < p_threshold)
                .map(|g| SignificantPair {
                    gene: g.gene.clone(),
                    drug: d.drug.clone(),
                    p_value: g.correlation.p_value,
                })
        })
        .collect();
    pairs.sort_by(|a, b| match a.p_value.total_cmp(&b.p_value) {
        Ordering::Equal => (&a.gene, &a.drug).cmp(&(&b.gene, &b.drug)),
        other => other,
    });
    pairs
}

/// A drug's `k` most significantly correlated genes with their signed r.
pub fn top_correlated(drug: &DrugCorrelations, k: usize) -> Vec<(String, f64)> {
    let mut genes: Vec<&GeneCorrelation> = drug.genes.iter().collect();
    genes.sort_by(|a, b| a.correlation.p_value.total_cmp(&b.correlation.p_value));
    genes
        .into_iter()
        .take(k)
        .map(|g| (g.gene.clone(), g.correlation.r))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/correlate.rs"]
mod tests;
