use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::RunError;
use crate::input::embedding::{EMBEDDING_SUFFIXES, Network, load_embedding, load_entity_mapping};
use crate::input::lincs::{LincsLayout, load_lincs_genes, load_zscores, profiles_by_drug_cell};
use crate::input::matrix::load_labeled_matrix;
use crate::input::pathways::load_pathways;
use crate::input::rankings::{Method, load_lincs_ranking, load_method_scores};
use crate::input::translation::load_drug_names;
use crate::model::topset::TopSetPolicy;
use crate::pipeline::compare::{
    compare_with_lincs, lincs_top_pathways, method_top_pathways, pathway_universe,
};
use crate::pipeline::correlate::{
    check_same_samples, correlate_drugs, significant_pairs, threshold_top_sets, top_correlated,
};
use crate::pipeline::embed::{
    DrugGeneWeights, inverse_rankings, score_drug_pathways, translate_drugs,
};
use crate::pipeline::enrich::{EnrichmentRanker, EntityTopSet, gene_universe};
use crate::report::tsv::{
    write_comparison, write_dataset_pathways, write_embedding_scores, write_inverse_rankings,
    write_lincs_pathways, write_top_genes,
};
use crate::report::{RunSummary, format_g, summary_path, write_summary};

/// Auxiliary per-gene dataset correlated against drug response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dataset {
    /// Median probe expression.
    Exp,
    /// Summed mutation calls.
    Mut,
}

impl Dataset {
    pub fn label(self) -> &'static str {
        match self {
            Dataset::Exp => "exp",
            Dataset::Mut => "mut",
        }
    }

    fn file(self, cfg: &AnalysisConfig) -> &str {
        match self {
            Dataset::Exp => &cfg.files.expression,
            Dataset::Mut => &cfg.files.mutation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LincsLevel {
    #[value(name = "3")]
    Three,
    #[value(name = "4")]
    Four,
}

/// One LINCS enrichment run: a z-score level or a positive-control file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LincsRun {
    Level(LincsLevel),
    PositiveControl(String),
}

impl LincsRun {
    pub fn layout(&self) -> LincsLayout {
        match self {
            LincsRun::Level(LincsLevel::Three) => LincsLayout::Level3,
            LincsRun::Level(LincsLevel::Four) => LincsLayout::Level4,
            LincsRun::PositiveControl(_) => LincsLayout::PositiveControl,
        }
    }

    pub fn zscore_path(&self, cfg: &AnalysisConfig) -> PathBuf {
        match self {
            LincsRun::Level(LincsLevel::Three) => cfg.data_path(&cfg.files.lincs_level3),
            LincsRun::Level(LincsLevel::Four) => cfg.data_path(&cfg.files.lincs_level4),
            LincsRun::PositiveControl(n) => cfg.lincs_control_path(n),
        }
    }

    pub fn output_name(&self) -> String {
        match self {
            LincsRun::Level(LincsLevel::Three) => "top_pathways_lincs_lvl3.txt".to_string(),
            LincsRun::Level(LincsLevel::Four) => "top_pathways_lincs_lvl4.txt".to_string(),
            LincsRun::PositiveControl(n) => {
                format!("top_pathways_lincs_positive_control_Aft_{n}.txt")
            }
        }
    }

    fn command(&self) -> String {
        match self {
            LincsRun::Level(LincsLevel::Three) => "lincs 3".to_string(),
            LincsRun::Level(LincsLevel::Four) => "lincs 4".to_string(),
            LincsRun::PositiveControl(n) => format!("lincs-control {n}"),
        }
    }
}

fn output_error(path: &Path) -> impl FnOnce(std::io::Error) -> RunError + '_ {
    move |source| RunError::Output {
        path: path.to_path_buf(),
        source,
    }
}

fn finish(output: &Path, summary: &RunSummary) -> Result<(), RunError> {
    let json = write_summary(output, summary).map_err(output_error(&summary_path(output)))?;
    info!("wrote {} ({} rows)", output.display(), summary.n_rows);
    tracing::debug!("wrote {}", json.display());
    Ok(())
}

/// Correlates drug response with an expression or mutation dataset, then
/// ranks every drug's correlated genes against every pathway.
pub fn run_datasets(cfg: &AnalysisConfig, dataset: Dataset) -> Result<(), RunError> {
    let label = dataset.label();
    let pathways = load_pathways(&cfg.data_path(&cfg.files.pathways))?;
    let responses = load_labeled_matrix(&cfg.data_path(&cfg.files.drug_response))?;
    let features = load_labeled_matrix(&cfg.data_path(dataset.file(cfg)))?;
    check_same_samples(&responses, &features, label)?;

    info!(
        "correlating {} drugs with {} {} genes",
        responses.rows.len(),
        features.rows.len(),
        label
    );
    let drugs = correlate_drugs(&responses, &features, |_| true)?;
    let top_sets = threshold_top_sets(&drugs, cfg.p_threshold);
    let universe_size = gene_universe(&pathways, &top_sets, features.ids()).len();

    let ranking = EnrichmentRanker::new(&pathways, universe_size)
        .with_pathway_cap(cfg.pathway_cap_factor)
        .rank(&top_sets)?;
    let n_low = ranking.count_below(cfg.low_p_threshold);
    info!(
        "{} drug/pathway pairs below p = {}",
        n_low,
        format_g(cfg.low_p_threshold)
    );

    let out = cfg.results_path(&format!("top_pathways_{label}.txt"));
    write_dataset_pathways(&ranking.results, &out).map_err(output_error(&out))?;
    let mut summary = RunSummary::new(&format!("datasets {label}"), &out);
    summary.n_entities = ranking.n_entities;
    summary.n_references = ranking.n_pathways;
    summary.n_rows = ranking.results.len();
    summary.universe_size = Some(ranking.universe_size);
    summary.low_p_threshold = Some(cfg.low_p_threshold);
    summary.n_below_low_p = Some(n_low);
    summary.parameters = json!({
        "top_set_policy": TopSetPolicy::Threshold {
            max_score: cfg.p_threshold,
        },
        "pathway_cap_factor": cfg.pathway_cap_factor,
    });
    finish(&out, &summary)?;

    let pairs = significant_pairs(&drugs, cfg.p_threshold);
    let genes_out = cfg.results_path(&format!("top_genes_{label}.txt"));
    write_top_genes(&pairs, &genes_out).map_err(output_error(&genes_out))?;
    let mut summary = RunSummary::new(&format!("datasets {label}"), &genes_out);
    summary.n_entities = drugs.len();
    summary.n_references = features.rows.len();
    summary.n_rows = pairs.len();
    summary.parameters = json!({ "p_threshold": cfg.p_threshold });
    finish(&genes_out, &summary)
}

/// Ranks each LINCS drug/cell-line's strongest z-score genes against every
/// pathway.
pub fn run_lincs(cfg: &AnalysisConfig, run: &LincsRun) -> Result<(), RunError> {
    let layout = run.layout();
    let names = if layout.translates_drugs() {
        Some(load_drug_names(&cfg.data_path(&cfg.files.drug_translation))?)
    } else {
        None
    };
    let pathways = load_pathways(&cfg.data_path(&cfg.files.pathways))?;
    let row_genes = load_lincs_genes(&cfg.data_path(&cfg.files.lincs_level3))?;
    let matrix = load_zscores(&run.zscore_path(cfg), layout, &row_genes)?;
    let profiles = profiles_by_drug_cell(&matrix, names.as_ref(), cfg.missing_policy)?;

    let policy = TopSetPolicy::RankCapped {
        min_score: cfg.z_score_min,
        cap: cfg.max_genes_per_entity,
    };
    let top_sets: Vec<EntityTopSet> = profiles
        .iter()
        .map(|p| EntityTopSet {
            entity: p.key(),
            genes: policy.select(
                matrix
                    .genes
                    .iter()
                    .map(String::as_str)
                    .zip(p.mean_scores.iter().copied()),
            ),
        })
        .collect();
    let universe_size =
        gene_universe(&pathways, &top_sets, matrix.genes.iter().map(String::as_str)).len();

    let ranking = EnrichmentRanker::new(&pathways, universe_size).rank(&top_sets)?;
    let n_low = ranking.count_below(cfg.low_p_threshold);
    info!(
        "{} drug/cell-line pathway pairs below p = {}",
        n_low,
        format_g(cfg.low_p_threshold)
    );

    let out = cfg.results_path(&run.output_name());
    write_lincs_pathways(&ranking.results, &out).map_err(output_error(&out))?;
    let mut summary = RunSummary::new(&run.command(), &out);
    summary.n_entities = ranking.n_entities;
    summary.n_references = ranking.n_pathways;
    summary.n_rows = ranking.results.len();
    summary.universe_size = Some(ranking.universe_size);
    summary.low_p_threshold = Some(cfg.low_p_threshold);
    summary.n_below_low_p = Some(n_low);
    summary.parameters = json!({
        "top_set_policy": policy,
        "samples": matrix.samples.len(),
    });
    finish(&out, &summary)
}

/// Scores agreement between the LINCS level-4 ranking and an upstream method
/// ranking, per drug/cell-line.
pub fn run_compare(cfg: &AnalysisConfig, method: Method) -> Result<(), RunError> {
    let scores_file = match method {
        Method::Pca => &cfg.files.pca_scores,
        Method::L1 => &cfg.files.l1_scores,
    };
    let scores = load_method_scores(&cfg.results_path(scores_file), method)?;
    let lincs_file = LincsRun::Level(LincsLevel::Four).output_name();
    let rows = load_lincs_ranking(&cfg.results_path(&lincs_file))?;

    let method_top = method_top_pathways(&scores, method, cfg.compare_p_threshold);
    let lincs_top = lincs_top_pathways(&rows, cfg.compare_p_threshold);
    let universe_size = pathway_universe(&scores, &rows).len();
    info!(
        "comparing {} LINCS drug/cell-lines with {} {} drugs over {} pathways",
        lincs_top.len(),
        method_top.len(),
        method.name(),
        universe_size
    );

    let results = compare_with_lincs(&lincs_top, &method_top, universe_size, cfg.missing_policy)?;

    let out = cfg.results_path(&format!("compare_lincs_and_{}.txt", method.name()));
    write_comparison(&results, method.name(), &out).map_err(output_error(&out))?;
    let mut summary = RunSummary::new(&format!("compare {}", method.name()), &out);
    summary.n_entities = lincs_top.len();
    summary.n_references = method_top.len();
    summary.n_rows = results.len();
    summary.universe_size = Some(universe_size);
    summary.parameters = json!({ "compare_p_threshold": cfg.compare_p_threshold });
    finish(&out, &summary)
}

/// Scores drugs against pathways through network embeddings, for every
/// dimension and variant of `network`.
pub fn run_embedding(cfg: &AnalysisConfig, network: Network, top_k: usize) -> Result<(), RunError> {
    if top_k == 0 {
        return Err(RunError::InvalidConfig(
            "top-k must be a positive number of genes".to_string(),
        ));
    }
    let pathways = load_pathways(&cfg.data_path(&cfg.files.pathways))?;
    let names = load_drug_names(&cfg.data_path(&cfg.files.drug_translation))?;
    let mapping = load_entity_mapping(&cfg.data_path(&cfg.files.embedding_mapping))?;
    let mapped: HashSet<&str> = mapping.iter().map(String::as_str).collect();

    let responses = load_labeled_matrix(&cfg.data_path(&cfg.files.drug_response))?;
    let features = load_labeled_matrix(&cfg.data_path(&cfg.files.expression))?;
    check_same_samples(&responses, &features, Dataset::Exp.label())?;

    let drugs = correlate_drugs(&responses, &features, |gene| mapped.contains(gene))?;
    let weights: Vec<DrugGeneWeights> = drugs
        .iter()
        .map(|d| DrugGeneWeights {
            drug: d.drug.clone(),
            genes: top_correlated(d, top_k),
        })
        .collect();

    let pathway_names: Vec<&str> = pathways.names().collect();
    let mut needed: HashSet<&str> = pathway_names.iter().copied().collect();
    for drug in &weights {
        needed.extend(drug.genes.iter().map(|(g, _)| g.as_str()));
    }
    info!(
        "{} drugs, {} pathways, {} embedding rows needed",
        weights.len(),
        pathway_names.len(),
        needed.len()
    );

    let out_dir = cfg.results_path("embedding");
    let dir = cfg.embedding_dir();
    for &dim in network.dimensions() {
        for suffix in EMBEDDING_SUFFIXES {
            let ext = Network::extension(dim, suffix);
            let vectors = load_embedding(
                &network.embedding_file(&dir, dim, suffix),
                &mapping,
                |entity| needed.contains(entity),
            )?;
            let scores =
                score_drug_pathways(&weights, &pathway_names, &vectors, cfg.missing_policy)?;

            let name = format!("{}_top_pathways_{}_top_{}.txt", network.name(), ext, top_k);
            let out = out_dir.join(&name);
            write_embedding_scores(&scores, &out).map_err(output_error(&out))?;
            let command = format!("embedding {} {}", network.name(), top_k);
            let mut summary = RunSummary::new(&command, &out);
            summary.n_entities = weights.len();
            summary.n_references = pathway_names.len();
            summary.n_rows = scores.len();
            summary.parameters = json!({
                "network": network.name(),
                "dimension": dim,
                "variant": suffix,
                "top_k": top_k,
            });
            finish(&out, &summary)?;

            let ranks = translate_drugs(inverse_rankings(&scores), &names, cfg.missing_policy)?;
            let inverse_out = out_dir.join("inverse_rankings").join(format!("inverse_{name}"));
            write_inverse_rankings(&ranks, &inverse_out).map_err(output_error(&inverse_out))?;
            summary.output = inverse_out.display().to_string();
            summary.n_rows = ranks.len();
            finish(&inverse_out, &summary)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/commands.rs"]
mod tests;
