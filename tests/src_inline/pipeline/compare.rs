use super::*;
use crate::input::rankings::DrugPathScore;

fn scores(rows: &[(&str, &str, f64)]) -> MethodScores {
    let mut out = MethodScores::default();
    for &(drug, pathway, score) in rows {
        out.pathways.insert(pathway.to_string());
        out.scores.push(DrugPathScore {
            drug: drug.to_string(),
            pathway: pathway.to_string(),
            score,
        });
    }
    out
}

fn lincs_row(drug: &str, cell_line: &str, pathway: &str, p_value: f64) -> LincsRankRow {
    LincsRankRow {
        drug: drug.to_string(),
        cell_line: cell_line.to_string(),
        pathway: pathway.to_string(),
        p_value,
    }
}

#[test]
fn test_pca_filter_keeps_drug_with_no_passing_pathway() {
    let s = scores(&[
        ("D1", "P2", 0.04),
        ("D1", "P1", 0.001),
        ("D1", "P3", 0.5),
        ("D2", "P1", 0.9),
    ]);
    let top = method_top_pathways(&s, Method::Pca, 0.05);
    assert_eq!(top["D1"].ranked(), &["P1", "P2"]);
    assert!(top["D2"].is_empty());

    let l1 = method_top_pathways(&s, Method::L1, 0.05);
    assert_eq!(l1["D1"].len(), 3);
    assert_eq!(l1["D2"].len(), 1);
}

#[test]
fn test_lincs_top_pathways_group_by_drug_cell() {
    let rows = vec![
        lincs_row("D1", "A549", "P2", 0.01),
        lincs_row("D1", "MCF7", "P1", 0.2),
        lincs_row("D1", "A549", "P1", 0.001),
        lincs_row("D1", "A549", "P3", 0.05),
    ];
    let top = lincs_top_pathways(&rows, 0.05);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].cell_line, "A549");
    assert_eq!(top[0].pathways.ranked(), &["P1", "P2", "P3"]);

    let universe = pathway_universe(&scores(&[("D1", "P9", 0.1)]), &rows);
    assert_eq!(universe.len(), 4);
}

#[test]
fn test_compare_counts_and_ranks() {
    let s = scores(&[
        ("D1", "P1", 0.001),
        ("D1", "P2", 0.002),
        ("D1", "P3", 0.9),
        ("D2", "P4", 0.01),
    ]);
    let rows = vec![
        lincs_row("D1", "A549", "P1", 0.001),
        lincs_row("D1", "A549", "P2", 0.01),
        lincs_row("D1", "PC3", "P5", 0.01),
        lincs_row("D2", "MCF7", "P4", 0.001),
        lincs_row("D2", "MCF7", "P6", 0.3),
    ];
    let method_top = method_top_pathways(&s, Method::Pca, 0.05);
    let lincs = lincs_top_pathways(&rows, 0.05);
    let universe = pathway_universe(&s, &rows).len();
    assert_eq!(universe, 6);

    let results = compare_with_lincs(&lincs, &method_top, universe, MissingPolicy::Fail).unwrap();
    assert_eq!(results.len(), 3);
    for w in results.windows(2) {
        assert!(w[0].p_value <= w[1].p_value);
    }
    let a549 = results.iter().find(|r| r.cell_line == "A549").unwrap();
    assert_eq!(a549.table.a, 2);
    assert_eq!((a549.lincs_size, a549.method_size), (2, 2));
    assert_eq!(a549.table.total(), 6);
    let pc3 = results.iter().find(|r| r.cell_line == "PC3").unwrap();
    assert_eq!(pc3.table.a, 0);
}

#[test]
fn test_unknown_lincs_drug_follows_policy() {
    let s = scores(&[("D1", "P1", 0.001)]);
    let rows = vec![
        lincs_row("D1", "A549", "P1", 0.001),
        lincs_row("D9", "A549", "P1", 0.001),
    ];
    let method_top = method_top_pathways(&s, Method::L1, 0.05);
    let lincs = lincs_top_pathways(&rows, 0.05);

    let err = compare_with_lincs(&lincs, &method_top, 1, MissingPolicy::Fail).unwrap_err();
    assert!(matches!(
        err,
        RunError::Input(crate::input::InputError::UnknownId { .. })
    ));
    let kept = compare_with_lincs(&lincs, &method_top, 1, MissingPolicy::Skip).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].drug, "D1");
}
