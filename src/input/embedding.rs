use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::input::InputError;
use crate::input::reader::LineReader;

/// Interaction network an embedding was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Network {
    Ppi,
    Genetic,
    Literome,
    Sequence,
}

pub const EMBEDDING_SUFFIXES: [&str; 2] = ["U", "US"];

impl Network {
    pub fn name(self) -> &'static str {
        match self {
            Network::Ppi => "ppi",
            Network::Genetic => "genetic",
            Network::Literome => "literome",
            Network::Sequence => "sequence",
        }
    }

    /// The ppi network was embedded at more dimensions than the others.
    pub fn dimensions(self) -> &'static [usize] {
        match self {
            Network::Ppi => &[50, 100, 500, 1000, 1500, 2000],
            _ => &[50, 100, 500],
        }
    }

    /// File-name fragment shared by the embedding file and its outputs.
    pub fn extension(dim: usize, suffix: &str) -> String {
        format!("{dim}_0.8.{suffix}")
    }

    pub fn embedding_file(self, dir: &Path, dim: usize, suffix: &str) -> PathBuf {
        let ext = Self::extension(dim, suffix);
        match self {
            Network::Ppi => dir.join(format!("ppi_6_net_{ext}")),
            other => dir.join(format!("{}.network_net_{ext}", other.name())),
        }
    }
}

/// Entity names (genes and pathways) in embedding row order, one per line.
pub fn load_entity_mapping(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = LineReader::open(path)?;
    let mut entities = Vec::new();
    while let Some(line) = reader.next_line()? {
        let name = line.text.trim();
        if name.is_empty() {
            return Err(InputError::parse(reader.path(), line.no, "empty entity name"));
        }
        entities.push(name.to_string());
    }
    if entities.is_empty() {
        return Err(InputError::Empty(reader.path().to_path_buf()));
    }
    Ok(entities)
}

/// Reads embedding vectors, row `i` belonging to `mapping[i]`. Only rows for
/// which `keep` returns true are retained.
pub fn load_embedding<F>(
    path: &Path,
    mapping: &[String],
    keep: F,
) -> Result<HashMap<String, Vec<f64>>, InputError>
where
    F: Fn(&str) -> bool,
{
    let mut reader = LineReader::open(path)?;
    let mut vectors = HashMap::new();
    let mut dim: Option<usize> = None;
    let mut row = 0usize;

    while let Some(line) = reader.next_line()? {
        let entity = match mapping.get(row) {
            Some(e) => e,
            None => {
                return Err(InputError::parse(
                    reader.path(),
                    line.no,
                    format!("embedding has more rows than the {} mapped entities", mapping.len()),
                ));
            }
        };
        row += 1;
        if !keep(entity) {
            continue;
        }
        let fields = line.words();
        match dim {
            None => dim = Some(fields.len()),
            Some(expected) if expected != fields.len() => {
                return Err(InputError::columns(reader.path(), line.no, expected, fields.len()));
            }
            Some(_) => {}
        }
        let mut vector = Vec::with_capacity(fields.len());
        for token in fields {
            let v = token.parse::<f64>().map_err(|_| {
                let msg = format!("invalid vector component '{token}'");
                InputError::parse(reader.path(), line.no, msg)
            })?;
            vector.push(v);
        }
        vectors.insert(entity.clone(), vector);
    }

    if row != mapping.len() {
        tracing::warn!(
            "{} has {} rows but the mapping lists {} entities",
            reader.path().display(),
            row,
            mapping.len()
        );
    }
    tracing::info!(
        "loaded {} embedding vectors (dim {}) from {}",
        vectors.len(),
        dim.unwrap_or(0),
        reader.path().display()
    );

    Ok(vectors)
}
