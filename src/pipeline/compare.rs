use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::MissingPolicy;
use crate::error::RunError;
use crate::input::rankings::{LincsRankRow, Method, MethodScores};
use crate::model::contingency::ContingencyTable;
use crate::model::result::{Ranked, rank_by_significance};
use crate::model::topset::TopGeneSet;

/// Agreement between a LINCS drug/cell-line's top pathways and the upstream
/// method's top pathways for the same drug.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub drug: String,
    pub cell_line: String,
    pub table: ContingencyTable,
    pub lincs_size: usize,
    pub method_size: usize,
    pub p_value: f64,
}

impl Ranked for ComparisonResult {
    fn p_value(&self) -> f64 {
        self.p_value
    }

    fn tie_key(&self) -> (&str, &str) {
        (&self.drug, &self.cell_line)
    }
}

#[derive(Debug, Clone)]
pub struct LincsTopPathways {
    pub drug: String,
    pub cell_line: String,
    pub pathways: TopGeneSet,
}

/// Per-drug top pathways of the upstream method, best score first. For PCA
/// only scores at or below `p_threshold` count, but a drug whose scores all
/// fail still gets an (empty) entry; L1 keeps every scored pathway.
pub fn method_top_pathways(
    scores: &MethodScores,
    method: Method,
    p_threshold: f64,
) -> BTreeMap<String, TopGeneSet> {
    let mut by_drug: BTreeMap<String, Vec<(&str, f64)>> = BTreeMap::new();
    for s in &scores.scores {
        let entry = by_drug.entry(s.drug.clone()).or_default();
        if method == Method::Pca && s.score > p_threshold {
            continue;
        }
        entry.push((s.pathway.as_str(), s.score));
    }
    by_drug
        .into_iter()
        .map(|(drug, mut paths)| {
            paths.sort_by(|a, b| a.1.total_cmp(&b.1));
            let set = TopGeneSet::from_ranked(paths.into_iter().map(|(p, _)| p.to_string()));
            (drug, set)
        })
        .collect()
}

/// Pathways with `p <= p_threshold` per LINCS drug/cell-line, ascending by
/// p-value. Entities with no passing pathway are not compared.
pub fn lincs_top_pathways(rows: &[LincsRankRow], p_threshold: f64) -> Vec<LincsTopPathways> {
    let mut passing: Vec<&LincsRankRow> =
        rows.iter().filter(|r| r.p_value <= p_threshold).collect();
    passing.sort_by(|a, b| match a.p_value.total_cmp(&b.p_value) {
        Ordering::Equal => {
            (&a.drug, &a.cell_line, &a.pathway).cmp(&(&b.drug, &b.cell_line, &b.pathway))
        }
        other => other,
    });

    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: HashMap<(String, String), Vec<String>> = HashMap::new();
    for row in passing {
        let key = (row.drug.clone(), row.cell_line.clone());
        let paths = grouped.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        paths.push(row.pathway.clone());
    }

    order
        .into_iter()
        .map(|key| {
            let paths = grouped.remove(&key).unwrap_or_default();
            LincsTopPathways {
                drug: key.0,
                cell_line: key.1,
                pathways: TopGeneSet::from_ranked(paths),
            }
        })
        .collect()
}

/// Every pathway named in either ranking.
pub fn pathway_universe(scores: &MethodScores, rows: &[LincsRankRow]) -> BTreeSet<String> {
    let mut universe = scores.pathways.clone();
    universe.extend(rows.iter().map(|r| r.pathway.clone()));
    universe
}

pub fn compare_with_lincs(
    lincs: &[LincsTopPathways],
    method_top: &BTreeMap<String, TopGeneSet>,
    universe_size: usize,
    policy: MissingPolicy,
) -> Result<Vec<ComparisonResult>, RunError> {
    let mut results = Vec::with_capacity(lincs.len());
    for entity in lincs {
        let context = format!("LINCS ranking ({}_{})", entity.drug, entity.cell_line);
        let method = match policy.resolve(
            method_top.get(&entity.drug),
            "drug in method ranking",
            &entity.drug,
            &context,
        )? {
            Some(set) => set,
            None => continue,
        };
        let table = ContingencyTable::from_sets(
            entity.pathways.members(),
            method.members(),
            universe_size,
        )?;
        results.push(ComparisonResult {
            drug: entity.drug.clone(),
            cell_line: entity.cell_line.clone(),
            table,
            lincs_size: entity.pathways.len(),
            method_size: method.len(),
            p_value: table.p_value(),
        });
    }
    rank_by_significance(&mut results);
    Ok(results)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/compare.rs"]
mod tests;
