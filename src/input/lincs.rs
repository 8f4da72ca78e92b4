use std::collections::HashMap;
use std::path::Path;

use crate::config::MissingPolicy;
use crate::input::InputError;
use crate::input::reader::LineReader;
use crate::input::sentinel::{is_unmapped_gene, parse_magnitude};
use crate::input::translation::DrugNames;
use crate::model::topset::DuplicateReducer;

const LEVEL4_PREFIX: &str = "lvl4_";

/// Column layout of a LINCS z-score file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LincsLayout {
    /// Level 3: gene metadata in the first three columns of every row.
    Level3,
    /// Level 4: two leading columns, `lvl4_` prefixed sample ids.
    Level4,
    /// Combined p-value positive-control files: no leading columns,
    /// `lvl4_` prefixed sample ids, drug ids left untranslated.
    PositiveControl,
}

impl LincsLayout {
    pub fn leading_columns(self) -> usize {
        match self {
            LincsLayout::Level3 => 3,
            LincsLayout::Level4 => 2,
            LincsLayout::PositiveControl => 0,
        }
    }

    pub fn sample_prefix(self) -> Option<&'static str> {
        match self {
            LincsLayout::Level3 => None,
            LincsLayout::Level4 | LincsLayout::PositiveControl => Some(LEVEL4_PREFIX),
        }
    }

    pub fn translates_drugs(self) -> bool {
        !matches!(self, LincsLayout::PositiveControl)
    }

    /// Drug and cell line of a sample id. Level 3/4 ids are exactly
    /// `drug_cellline`; positive-control ids may carry further `_` fields
    /// (time point, dose) and are keyed on the first two.
    pub fn split_sample(self, sample: &str) -> Option<(&str, &str)> {
        match self {
            LincsLayout::Level3 | LincsLayout::Level4 => split_drug_cell(sample),
            LincsLayout::PositiveControl => {
                let mut parts = sample.split('_');
                let drug = parts.next()?;
                let cell_line = parts.next()?;
                if drug.is_empty() || cell_line.is_empty() {
                    return None;
                }
                Some((drug, cell_line))
            }
        }
    }
}

/// Per-gene absolute z-scores, duplicate genes already merged.
/// `scores[g][s]` is gene `g` in sample `s`.
#[derive(Debug, Clone)]
pub struct ZScoreMatrix {
    pub layout: LincsLayout,
    pub samples: Vec<String>,
    pub genes: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

/// Mean z-score magnitudes of every replicate of one drug/cell-line pair.
#[derive(Debug, Clone)]
pub struct DrugCellProfile {
    pub drug: String,
    pub cell_line: String,
    pub replicates: usize,
    pub mean_scores: Vec<f64>,
}

impl DrugCellProfile {
    pub fn key(&self) -> String {
        format!("{}_{}", self.drug, self.cell_line)
    }
}

/// Gene ids for LINCS rows, taken from the second column of the level-3 file
/// (level 4 files do not carry them).
pub fn load_lincs_genes(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = LineReader::open(path)?;
    reader.skip(1)?;
    let mut genes = Vec::new();
    while let Some(line) = reader.next_nonblank()? {
        let fields = line.words();
        if fields.len() < 2 {
            return Err(InputError::columns(reader.path(), line.no, 2, fields.len()));
        }
        genes.push(fields[1].to_string());
    }
    if genes.is_empty() {
        return Err(InputError::Empty(reader.path().to_path_buf()));
    }
    Ok(genes)
}

pub fn load_zscores(
    path: &Path,
    layout: LincsLayout,
    row_genes: &[String],
) -> Result<ZScoreMatrix, InputError> {
    let mut reader = LineReader::open(path)?;
    let header = match reader.next_nonblank()? {
        Some(line) => line,
        None => return Err(InputError::Empty(reader.path().to_path_buf())),
    };
    let samples: Vec<String> = header
        .words()
        .into_iter()
        .map(|raw| match layout.sample_prefix() {
            Some(prefix) => raw.strip_prefix(prefix).unwrap_or(raw).to_string(),
            None => raw.to_string(),
        })
        .collect();

    let lead = layout.leading_columns();
    let mut genes: Vec<String> = Vec::new();
    let mut scores: Vec<Vec<f64>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut row = 0usize;
    let mut n_skipped = 0usize;
    let mut n_merged = 0usize;

    while let Some(line) = reader.next_nonblank()? {
        let gene = match row_genes.get(row) {
            Some(g) => g,
            None => {
                return Err(InputError::parse(
                    reader.path(),
                    line.no,
                    format!("data row {} has no entry in the gene list", row + 1),
                ));
            }
        };
        row += 1;
        if is_unmapped_gene(gene) {
            n_skipped += 1;
            continue;
        }

        let fields = line.words();
        if fields.len() != lead + samples.len() {
            return Err(InputError::columns(
                reader.path(),
                line.no,
                lead + samples.len(),
                fields.len(),
            ));
        }
        let mut values = Vec::with_capacity(samples.len());
        for token in &fields[lead..] {
            let v = parse_magnitude(token)
                .map_err(|msg| InputError::parse(reader.path(), line.no, msg))?;
            values.push(v);
        }

        match index.get(gene.as_str()) {
            Some(&slot) => {
                DuplicateReducer::Max.merge_into(&mut scores[slot], &values);
                n_merged += 1;
            }
            None => {
                index.insert(gene.clone(), genes.len());
                genes.push(gene.clone());
                scores.push(values);
            }
        }
    }

    if genes.is_empty() {
        return Err(InputError::Empty(reader.path().to_path_buf()));
    }

    tracing::info!(
        "loaded LINCS z-scores: {} genes x {} samples ({} unmapped rows skipped, {} duplicate rows merged)",
        genes.len(),
        samples.len(),
        n_skipped,
        n_merged
    );

    Ok(ZScoreMatrix {
        layout,
        samples,
        genes,
        scores,
    })
}

pub fn split_drug_cell(sample: &str) -> Option<(&str, &str)> {
    let (drug, cell_line) = sample.split_once('_')?;
    if drug.is_empty() || cell_line.is_empty() || cell_line.contains('_') {
        return None;
    }
    Some((drug, cell_line))
}

/// Groups samples by drug/cell-line (after optional drug-name translation)
/// and averages replicate z-scores per gene. Groups keep first-appearance
/// order of the samples.
pub fn profiles_by_drug_cell(
    matrix: &ZScoreMatrix,
    names: Option<&DrugNames>,
    policy: MissingPolicy,
) -> Result<Vec<DrugCellProfile>, InputError> {
    let n_genes = matrix.genes.len();
    let mut profiles: Vec<DrugCellProfile> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (s, sample) in matrix.samples.iter().enumerate() {
        let (drug_id, cell_line) = match matrix.layout.split_sample(sample) {
            Some(parts) => parts,
            None => {
                return Err(InputError::UnknownId {
                    kind: "drug_cellline sample",
                    id: sample.clone(),
                    context: "LINCS header".to_string(),
                });
            }
        };
        let drug = match names {
            Some(names) => match names.translate(drug_id, policy, "LINCS header")? {
                Some(name) => name.to_string(),
                None => continue,
            },
            None => drug_id.to_string(),
        };

        let key = (drug, cell_line.to_string());
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), profiles.len());
                profiles.push(DrugCellProfile {
                    drug: key.0,
                    cell_line: key.1,
                    replicates: 0,
                    mean_scores: vec![0.0; n_genes],
                });
                profiles.len() - 1
            }
        };
        let profile = &mut profiles[slot];
        profile.replicates += 1;
        for (g, sum) in profile.mean_scores.iter_mut().enumerate() {
            *sum += matrix.scores[g][s];
        }
    }

    for profile in &mut profiles {
        let n = profile.replicates as f64;
        for v in &mut profile.mean_scores {
            *v /= n;
        }
    }

    tracing::info!(
        "{} samples collapsed into {} drug/cell-line profiles",
        matrix.samples.len(),
        profiles.len()
    );

    Ok(profiles)
}
