use std::collections::BTreeSet;

use super::*;
use crate::input::pathways::{Pathway, PathwaySet};

fn pathways() -> PathwaySet {
    let make = |name: &str, genes: &[&str]| Pathway {
        name: name.to_string(),
        genes: genes.iter().map(|g| g.to_string()).collect::<BTreeSet<_>>(),
    };
    PathwaySet {
        pathways: vec![
            make("DNA_REPAIR", &["A", "B", "C", "D"]),
            make("APOPTOSIS", &["E", "F", "G"]),
        ],
    }
}

fn entity(name: &str, genes: &[&str]) -> EntityTopSet {
    EntityTopSet {
        entity: name.to_string(),
        genes: TopGeneSet::from_ranked(genes.iter().map(|g| g.to_string())),
    }
}

#[test]
fn test_universe_unions_all_sources() {
    let pathways = pathways();
    let entities = vec![entity("drug1", &["A", "X"])];
    let universe = gene_universe(&pathways, &entities, ["Y", "A"]);
    assert_eq!(
        universe.into_iter().collect::<Vec<_>>(),
        vec!["A", "B", "C", "D", "E", "F", "G", "X", "Y"]
    );
}

#[test]
fn test_rank_covers_every_pair_in_order() {
    let pathways = pathways();
    let entities = vec![
        entity("drug1", &["A", "B", "C", "D"]),
        entity("drug2", &[]),
    ];
    let ranking = EnrichmentRanker::new(&pathways, 40).rank(&entities).unwrap();
    assert_eq!(ranking.results.len(), 4);
    assert_eq!(ranking.n_entities, 2);
    assert_eq!(ranking.n_pathways, 2);

    let best = &ranking.results[0];
    assert_eq!((best.entity.as_str(), best.pathway.as_str()), ("drug1", "DNA_REPAIR"));
    assert_eq!(best.table.a, 4);
    assert!(best.p_value < 1e-4);
    assert_eq!(ranking.count_below(1e-4), 1);

    for r in &ranking.results {
        assert_eq!(r.table.total(), 40);
    }
    for w in ranking.results.windows(2) {
        assert!(w[0].p_value <= w[1].p_value);
    }
}

#[test]
fn test_empty_top_set_is_not_an_error() {
    let pathways = pathways();
    let ranking = EnrichmentRanker::new(&pathways, 10)
        .rank(&[entity("drug2", &[])])
        .unwrap();
    assert!(ranking.results.iter().all(|r| r.p_value == 1.0));
    // Equal p-values fall back to name order.
    assert_eq!(ranking.results[0].pathway, "APOPTOSIS");
}

#[test]
fn test_pathway_cap_uses_ranked_head() {
    let pathways = pathways();
    // Best-ranked genes first: the APOPTOSIS hits sit beyond 1 x |APOPTOSIS|.
    let entities = vec![entity("drug1", &["A", "B", "C", "E", "F", "G"])];
    let uncapped = EnrichmentRanker::new(&pathways, 30).rank(&entities).unwrap();
    let capped = EnrichmentRanker::new(&pathways, 30)
        .with_pathway_cap(Some(1))
        .rank(&entities)
        .unwrap();

    let find = |rows: &[EnrichmentResult], p: &str| {
        rows.iter().find(|r| r.pathway == p).map(|r| (r.table.a, r.top_size))
    };
    assert_eq!(find(&uncapped.results, "APOPTOSIS"), Some((3, 6)));
    assert_eq!(find(&capped.results, "APOPTOSIS"), Some((0, 3)));
    assert_eq!(find(&capped.results, "DNA_REPAIR"), Some((3, 4)));
}

#[test]
fn test_ranking_is_deterministic() {
    let pathways = pathways();
    let entities = vec![
        entity("drug2", &["E", "A"]),
        entity("drug1", &["F", "G", "B"]),
    ];
    let first = EnrichmentRanker::new(&pathways, 25).rank(&entities).unwrap();
    let second = EnrichmentRanker::new(&pathways, 25).rank(&entities).unwrap();
    assert_eq!(first.results, second.results);
}
