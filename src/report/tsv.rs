use std::io::Write;
use std::path::Path;

use crate::model::result::EnrichmentResult;
use crate::pipeline::compare::ComparisonResult;
use crate::pipeline::correlate::SignificantPair;
use crate::pipeline::embed::{DrugPathwayScore, InverseRank};
use crate::report::{create_writer, format_g};

pub const DATASET_PATHWAYS_HEADER: &[&str] = &[
    "drug",
    "path",
    "p_value",
    "inter",
    "corr_not_path",
    "path_not_corr",
    "neither",
];

pub const LINCS_PATHWAYS_HEADER: &[&str] = &[
    "drug",
    "cell_line",
    "path",
    "p_value",
    "inter",
    "lincs",
    "path_size",
];

pub fn write_dataset_pathways(results: &[EnrichmentResult], path: &Path) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "{}", DATASET_PATHWAYS_HEADER.join("\t"))?;
    for r in results {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.entity,
            r.pathway,
            format_g(r.p_value),
            r.table.a,
            r.table.b,
            r.table.c,
            r.table.d
        )?;
    }
    w.flush()
}

pub fn write_top_genes(pairs: &[SignificantPair], path: &Path) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "gene\tdrug\tp_value")?;
    for p in pairs {
        writeln!(w, "{}\t{}\t{}", p.gene, p.drug, format_g(p.p_value))?;
    }
    w.flush()
}

/// LINCS entities are `drug_cellline`; cell-line ids never contain `_`, drug
/// display names might.
pub fn write_lincs_pathways(results: &[EnrichmentResult], path: &Path) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "{}", LINCS_PATHWAYS_HEADER.join("\t"))?;
    for r in results {
        let (drug, cell_line) = r.entity.rsplit_once('_').unwrap_or((r.entity.as_str(), ""));
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            drug,
            cell_line,
            r.pathway,
            format_g(r.p_value),
            r.table.a,
            r.top_size,
            r.pathway_size
        )?;
    }
    w.flush()
}

pub fn write_comparison(
    results: &[ComparisonResult],
    method_label: &str,
    path: &Path,
) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "drug\tcell_line\tp_val\tintersection\tlincs\t{}", method_label)?;
    for r in results {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.drug,
            r.cell_line,
            format_g(r.p_value),
            r.table.a,
            r.lincs_size,
            r.method_size
        )?;
    }
    w.flush()
}

pub fn write_embedding_scores(scores: &[DrugPathwayScore], path: &Path) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "drug\tpath\tscore")?;
    for s in scores {
        writeln!(w, "{}\t{}\t{:.6}", s.drug, s.pathway, s.score)?;
    }
    w.flush()
}

pub fn write_inverse_rankings(ranks: &[InverseRank], path: &Path) -> std::io::Result<()> {
    let mut w = create_writer(path)?;
    writeln!(w, "drug\tpath\tinverse_rank")?;
    for r in ranks {
        writeln!(w, "{}\t{}\t{}", r.drug, r.pathway, format_g(r.inverse_rank))?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/tsv.rs"]
mod tests;
