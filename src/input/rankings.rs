use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::LineReader;
use crate::input::sentinel::is_empty_score;
use crate::model::topset::DuplicateReducer;

/// Upstream drug/pathway scoring method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Principal-component regression; one score per component.
    Pca,
    /// L1-regularised linear regression.
    L1,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::Pca => "pca",
            Method::L1 => "l1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrugPathScore {
    pub drug: String,
    pub pathway: String,
    pub score: f64,
}

/// Scores in first-appearance order of (drug, pathway), duplicates reduced
/// to the smaller (more significant) value.
#[derive(Debug, Clone, Default)]
pub struct MethodScores {
    pub scores: Vec<DrugPathScore>,
    pub pathways: BTreeSet<String>,
}

/// PCA results name paths `<pathway>_<component>`.
pub fn strip_component_suffix(path: &str) -> &str {
    match path.rsplit_once('_') {
        Some((base, component))
            if !base.is_empty()
                && !component.is_empty()
                && component.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => path,
    }
}

pub fn load_method_scores(path: &Path, method: Method) -> Result<MethodScores, InputError> {
    let mut reader = LineReader::open(path)?;
    if method == Method::Pca {
        // Summary line.
        reader.skip(1)?;
    }

    let mut out = MethodScores::default();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    while let Some(line) = reader.next_nonblank()? {
        let (drug, pathway, raw_score) = match method {
            Method::Pca => {
                let cols = line.tabs();
                if cols.len() != 3 {
                    return Err(InputError::columns(reader.path(), line.no, 3, cols.len()));
                }
                (cols[0], strip_component_suffix(cols[1]), cols[2])
            }
            Method::L1 => {
                let cols = line.words();
                if cols.len() != 4 {
                    return Err(InputError::columns(reader.path(), line.no, 4, cols.len()));
                }
                (cols[0], cols[1], cols[3])
            }
        };
        if is_empty_score(raw_score) {
            continue;
        }
        let score = raw_score.parse::<f64>().map_err(|_| {
            InputError::parse(reader.path(), line.no, format!("invalid score '{raw_score}'"))
        })?;

        out.pathways.insert(pathway.to_string());
        let key = (drug.to_string(), pathway.to_string());
        match index.get(&key) {
            Some(&slot) => {
                let current = &mut out.scores[slot].score;
                *current = DuplicateReducer::Min.apply(*current, score);
            }
            None => {
                index.insert(key, out.scores.len());
                out.scores.push(DrugPathScore {
                    drug: drug.to_string(),
                    pathway: pathway.to_string(),
                    score,
                });
            }
        }
    }

    tracing::info!(
        "loaded {} {} drug/pathway scores over {} pathways",
        out.scores.len(),
        method.name(),
        out.pathways.len()
    );
    Ok(out)
}

/// One row of a LINCS top-pathway ranking written by the `lincs` command.
#[derive(Debug, Clone, PartialEq)]
pub struct LincsRankRow {
    pub drug: String,
    pub cell_line: String,
    pub pathway: String,
    pub p_value: f64,
}

pub fn load_lincs_ranking(path: &Path) -> Result<Vec<LincsRankRow>, InputError> {
    let mut reader = LineReader::open(path)?;
    reader.skip(1)?;
    let mut rows = Vec::new();
    while let Some(line) = reader.next_nonblank()? {
        let cols = line.tabs();
        if cols.len() != 7 {
            return Err(InputError::columns(reader.path(), line.no, 7, cols.len()));
        }
        let p_value = cols[3].parse::<f64>().map_err(|_| {
            InputError::parse(reader.path(), line.no, format!("invalid p-value '{}'", cols[3]))
        })?;
        rows.push(LincsRankRow {
            drug: cols[0].to_string(),
            cell_line: cols[1].to_string(),
            pathway: cols[2].to_string(),
            p_value,
        });
    }
    if rows.is_empty() {
        return Err(InputError::Empty(reader.path().to_path_buf()));
    }
    Ok(rows)
}
