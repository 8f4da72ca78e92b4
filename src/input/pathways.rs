use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::LineReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pathway {
    pub name: String,
    pub genes: BTreeSet<String>,
}

/// Pathways in first-appearance order of the membership file.
#[derive(Debug, Clone, Default)]
pub struct PathwaySet {
    pub pathways: Vec<Pathway>,
}

impl PathwaySet {
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pathways.iter().map(|p| p.name.as_str())
    }

    pub fn all_genes(&self) -> BTreeSet<&str> {
        self.pathways
            .iter()
            .flat_map(|p| p.genes.iter().map(String::as_str))
            .collect()
    }
}

pub fn load_pathways(path: &Path) -> Result<PathwaySet, InputError> {
    let mut reader = LineReader::open(path)?;
    let mut pathways: Vec<Pathway> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut n_rows = 0usize;

    while let Some(line) = reader.next_nonblank()? {
        let cols = line.tabs();
        if cols.len() < 2 {
            return Err(InputError::columns(reader.path(), line.no, 2, cols.len()));
        }
        let (name, gene) = (cols[0], cols[1]);
        if name.is_empty() || gene.is_empty() {
            return Err(InputError::parse(
                reader.path(),
                line.no,
                "empty pathway name or gene id",
            ));
        }
        let slot = match index.get(name) {
            Some(&slot) => slot,
            None => {
                index.insert(name.to_string(), pathways.len());
                pathways.push(Pathway {
                    name: name.to_string(),
                    genes: BTreeSet::new(),
                });
                pathways.len() - 1
            }
        };
        pathways[slot].genes.insert(gene.to_string());
        n_rows += 1;
    }

    if pathways.is_empty() {
        return Err(InputError::Empty(reader.path().to_path_buf()));
    }

    tracing::info!(
        "loaded {} pathways ({} membership rows) from {}",
        pathways.len(),
        n_rows,
        reader.path().display()
    );

    Ok(PathwaySet { pathways })
}
