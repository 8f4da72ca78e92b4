use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::input::pathways::PathwaySet;
use crate::model::contingency::ContingencyTable;
use crate::model::result::{EnrichmentResult, count_below, rank_by_significance};
use crate::model::topset::TopGeneSet;
use crate::stats::StatsError;

#[derive(Debug, Clone)]
pub struct EntityTopSet {
    pub entity: String,
    pub genes: TopGeneSet,
}

/// Distinct genes seen anywhere in the run: pathway members, every entity's
/// top set and any extra genes from the measured dataset.
pub fn gene_universe<'a, I>(
    pathways: &'a PathwaySet,
    entities: &'a [EntityTopSet],
    extra: I,
) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut universe = pathways.all_genes();
    for entity in entities {
        universe.extend(entity.genes.ranked().iter().map(String::as_str));
    }
    universe.extend(extra);
    universe
}

#[derive(Debug, Clone)]
pub struct EnrichmentRanking {
    pub results: Vec<EnrichmentResult>,
    pub universe_size: usize,
    pub n_entities: usize,
    pub n_pathways: usize,
}

impl EnrichmentRanking {
    pub fn count_below(&self, threshold: f64) -> usize {
        count_below(&self.results, threshold)
    }
}

/// Fisher's exact enrichment of every entity's top set in every pathway.
pub struct EnrichmentRanker<'a> {
    pathways: &'a PathwaySet,
    universe_size: usize,
    pathway_cap_factor: Option<usize>,
}

impl<'a> EnrichmentRanker<'a> {
    pub fn new(pathways: &'a PathwaySet, universe_size: usize) -> Self {
        Self {
            pathways,
            universe_size,
            pathway_cap_factor: None,
        }
    }

    /// Tests each pathway against only the first `factor * |pathway|` ranked
    /// genes of an entity.
    pub fn with_pathway_cap(mut self, factor: Option<usize>) -> Self {
        self.pathway_cap_factor = factor;
        self
    }

    pub fn rank(&self, entities: &[EntityTopSet]) -> Result<EnrichmentRanking, StatsError> {
        let mut results = Vec::with_capacity(entities.len() * self.pathways.len());
        for entity in entities {
            for pathway in &self.pathways.pathways {
                let selected: Cow<'_, BTreeSet<String>> = match self.pathway_cap_factor {
                    Some(factor) => Cow::Owned(entity.genes.head(factor * pathway.genes.len())),
                    None => Cow::Borrowed(entity.genes.members()),
                };
                let table =
                    ContingencyTable::from_sets(&selected, &pathway.genes, self.universe_size)?;
                results.push(EnrichmentResult {
                    entity: entity.entity.clone(),
                    pathway: pathway.name.clone(),
                    table,
                    top_size: selected.len(),
                    pathway_size: pathway.genes.len(),
                    p_value: table.p_value(),
                });
            }
        }
        rank_by_significance(&mut results);

        tracing::debug!(
            "ranked {} entity/pathway pairs against a universe of {} genes",
            results.len(),
            self.universe_size
        );

        Ok(EnrichmentRanking {
            results,
            universe_size: self.universe_size,
            n_entities: entities.len(),
            n_pathways: self.pathways.len(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/enrich.rs"]
mod tests;
