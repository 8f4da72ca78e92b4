use std::path::Path;

use super::*;
use crate::input::InputError;
use crate::test_support::{make_temp_dir, read_lines, write_file, write_gz};

const EXPRESSION: &str = "\
s0 s1 s2 s3 s4
UP 2 4.1 5.9 8 10.2
NOISE 10 9 2.5 6 4
FLAT 1 1 1 1 1
DOWN 5 4 3.1 2 NA
";

const LEVEL3: &str = "\
BRD-1_A549 BRD-1_A549 BRD-2_MCF7
1 G1 m 1.0 -3.0 2.5
2 -666 m 9 9 9
3 G2 m #NAME? 4.0 -1.0
4 G1 m 2.0 1.0 0.5
";

const LEVEL4: &str = "\
lvl4_BRD-1_A549 lvl4_BRD-2_MCF7
x y 3 0.5
x y 9 9
x y 1 -2.5
x y 2 1
";

fn config(root: &Path) -> AnalysisConfig {
    AnalysisConfig {
        data_dir: root.join("data"),
        results_dir: root.join("results"),
        ..AnalysisConfig::default()
    }
}

fn write_drug_fixture(cfg: &AnalysisConfig) {
    write_file(
        &cfg.data_path("nci_pathway.txt"),
        "P_UP\tUP\nP_UP\tDOWN\nP_OTHER\tNOISE\nP_OTHER\tQ\n",
    );
    write_file(
        &cfg.data_path("auc.tsv"),
        "drug s0 s1 s2 s3 s4\nD1 1 2 3 4 5\nD2 NA NA NA NA NA\n",
    );
    write_file(&cfg.data_path("drug_translation.txt"), "DrugOne D1\nDrugTwo D2\n");
}

fn write_lincs_fixture(cfg: &AnalysisConfig) {
    write_file(&cfg.data_path("nci_pathway.txt"), "PA\tG1\nPB\tG2\nPB\tG3\n");
    write_file(
        &cfg.data_path("drug_translation.txt"),
        "Fluorouracil BRD-1\nCisplatin BRD-2\n",
    );
    write_file(&cfg.data_path("lincs_zscore.txt"), LEVEL3);
    write_file(&cfg.data_path("lincs_zscore_new.txt"), LEVEL4);
}

#[test]
fn test_datasets_run_writes_ranking_genes_and_summary() {
    let mut cfg = config(&make_temp_dir());
    cfg.files.expression = "expr.txt.gz".to_string();
    write_drug_fixture(&cfg);
    std::fs::create_dir_all(&cfg.data_dir).unwrap();
    write_gz(&cfg.data_path("expr.txt.gz"), EXPRESSION);

    run_datasets(&cfg, Dataset::Exp).unwrap();

    let out = cfg.results_path("top_pathways_exp.txt");
    let lines = read_lines(&out);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "D1\tP_UP\t0.1\t2\t0\t0\t3");
    assert_eq!(lines[2], "D1\tP_OTHER\t0.4\t0\t2\t2\t1");
    assert!(lines[3].starts_with("D2\tP_OTHER\t1\t0\t0\t2\t3"));
    assert!(lines[4].starts_with("D2\tP_UP\t1\t"));

    let genes = read_lines(&cfg.results_path("top_genes_exp.txt"));
    assert_eq!(genes.len(), 3);
    assert!(genes[1].starts_with("UP\tD1\t"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary_path(&out)).unwrap()).unwrap();
    assert_eq!(summary["command"], "datasets exp");
    assert_eq!(summary["n_entities"], 2);
    assert_eq!(summary["n_rows"], 4);
    assert_eq!(summary["universe_size"], 5);
}

#[test]
fn test_datasets_sample_mismatch_fails() {
    let cfg = config(&make_temp_dir());
    write_drug_fixture(&cfg);
    write_file(&cfg.data_path("gene2SNPu50SumParse.txt"), "s0 s1\nTP53 0 1\n");
    let err = run_datasets(&cfg, Dataset::Mut).unwrap_err();
    assert!(matches!(err, RunError::Input(InputError::ShapeMismatch { .. })));
}

#[test]
fn test_lincs_then_compare() {
    let mut cfg = config(&make_temp_dir());
    write_lincs_fixture(&cfg);

    run_lincs(&cfg, &LincsRun::Level(LincsLevel::Four)).unwrap();
    let lincs = read_lines(&cfg.results_path("top_pathways_lincs_lvl4.txt"));
    assert_eq!(lincs.len(), 5);
    assert!(lincs.contains(&"Fluorouracil\tA549\tPA\t0.333333\t1\t1\t1".to_string()));
    assert!(lincs.contains(&"Cisplatin\tMCF7\tPB\t1\t1\t1\t2".to_string()));

    write_file(
        &cfg.results_path("linear_regression_L1.txt"),
        "Fluorouracil PA x 0.2\nCisplatin PB x 0.1\n",
    );
    cfg.compare_p_threshold = 0.5;
    run_compare(&cfg, Method::L1).unwrap();
    let cmp = read_lines(&cfg.results_path("compare_lincs_and_l1.txt"));
    assert_eq!(
        cmp,
        vec![
            "drug\tcell_line\tp_val\tintersection\tlincs\tl1",
            "Fluorouracil\tA549\t1\t1\t2\t1",
        ]
    );
}

#[test]
fn test_lincs_level3_and_positive_control() {
    let cfg = config(&make_temp_dir());
    write_lincs_fixture(&cfg);
    write_file(
        &cfg.lincs_control_path("6"),
        "lvl4_BRD-1_A549\n2.5\n0\n0\n0\n",
    );

    run_lincs(&cfg, &LincsRun::Level(LincsLevel::Three)).unwrap();
    let level3 = read_lines(&cfg.results_path("top_pathways_lincs_lvl3.txt"));
    assert_eq!(level3.len(), 5);
    assert!(level3.contains(&"Fluorouracil\tA549\tPA\t0.333333\t1\t1\t1".to_string()));

    run_lincs(&cfg, &LincsRun::PositiveControl("6".to_string())).unwrap();
    let control = read_lines(&cfg.results_path(
        "top_pathways_lincs_positive_control_Aft_6.txt",
    ));
    assert_eq!(control.len(), 3);
    assert!(control.contains(&"BRD-1\tA549\tPA\t0.333333\t1\t1\t1".to_string()));
}

#[test]
fn test_embedding_run_writes_scores_and_inverse_ranks() {
    let cfg = config(&make_temp_dir());
    write_drug_fixture(&cfg);
    write_file(&cfg.data_path("gene2medProbeExpr.txt"), EXPRESSION);
    write_file(
        &cfg.data_path("gene_pathway_id.txt"),
        "UP\nDOWN\nNOISE\nP_UP\nP_OTHER\n",
    );
    let dir = cfg.embedding_dir();
    for &dim in Network::Genetic.dimensions() {
        for suffix in EMBEDDING_SUFFIXES {
            write_file(
                &Network::Genetic.embedding_file(&dir, dim, suffix),
                "1 0\n0 1\n1 1\n1 0\n0 1\n",
            );
        }
    }

    run_embedding(&cfg, Network::Genetic, 1).unwrap();

    let out_dir = cfg.results_path("embedding");
    for suffix in EMBEDDING_SUFFIXES {
        let name = format!("genetic_top_pathways_500_0.8.{suffix}_top_1.txt");
        let scores = read_lines(&out_dir.join(&name));
        assert_eq!(scores.len(), 5);
        assert_eq!(scores[1], "D1\tP_UP\t0.999479");
        assert_eq!(scores[2], "D1\tP_OTHER\t0.000000");

        let inverse = read_lines(&out_dir.join("inverse_rankings").join(format!("inverse_{name}")));
        assert_eq!(
            inverse,
            vec![
                "drug\tpath\tinverse_rank",
                "DrugTwo\tP_UP\t1",
                "DrugTwo\tP_OTHER\t0.75",
                "DrugOne\tP_OTHER\t0.5",
                "DrugOne\tP_UP\t0.25",
            ]
        );
    }
}

#[test]
fn test_embedding_rejects_zero_top_k_and_missing_files() {
    let cfg = config(&make_temp_dir());
    assert!(matches!(
        run_embedding(&cfg, Network::Ppi, 0),
        Err(RunError::InvalidConfig(_))
    ));

    write_drug_fixture(&cfg);
    write_file(&cfg.data_path("gene2medProbeExpr.txt"), EXPRESSION);
    write_file(&cfg.data_path("gene_pathway_id.txt"), "UP\nP_UP\n");
    assert!(matches!(
        run_embedding(&cfg, Network::Ppi, 3),
        Err(RunError::Input(InputError::MissingInput(_)))
    ));
}
