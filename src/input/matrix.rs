use std::collections::HashMap;
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::LineReader;
use crate::input::sentinel::parse_cell;

#[derive(Debug, Clone)]
pub struct LabeledRow {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

/// Whitespace-delimited matrix: a header of column ids, then one
/// `id v1 v2 ...` row per entity. Used for expression, mutation and drug
/// response tables.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<LabeledRow>,
}

impl LabeledMatrix {
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }
}

pub fn load_labeled_matrix(path: &Path) -> Result<LabeledMatrix, InputError> {
    let mut reader = LineReader::open(path)?;
    let header = match reader.next_nonblank()? {
        Some(line) => line,
        None => return Err(InputError::Empty(reader.path().to_path_buf())),
    };
    let header_cols: Vec<String> = header.words().iter().map(|s| s.to_string()).collect();

    let mut rows: Vec<LabeledRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut width: Option<usize> = None;

    while let Some(line) = reader.next_nonblank()? {
        let fields = line.words();
        let id = fields[0];
        let raw = &fields[1..];
        match width {
            None => width = Some(raw.len()),
            Some(expected) if expected != raw.len() => {
                return Err(InputError::columns(
                    reader.path(),
                    line.no,
                    expected + 1,
                    fields.len(),
                ));
            }
            Some(_) => {}
        }

        let mut values = Vec::with_capacity(raw.len());
        for token in raw {
            let cell = parse_cell(token)
                .map_err(|msg| InputError::parse(reader.path(), line.no, msg))?;
            values.push(cell.value());
        }

        if let Some(&slot) = index.get(id) {
            tracing::warn!(
                "duplicate row id {} in {} (line {}); keeping the last values",
                id,
                reader.path().display(),
                line.no
            );
            rows[slot].values = values;
            continue;
        }
        index.insert(id.to_string(), rows.len());
        rows.push(LabeledRow {
            id: id.to_string(),
            values,
        });
    }

    let width = match width {
        Some(w) => w,
        None => return Err(InputError::Empty(reader.path().to_path_buf())),
    };

    // Headers either name only the value columns or carry a leading label
    // for the id column.
    let columns = if header_cols.len() == width {
        header_cols
    } else if header_cols.len() == width + 1 {
        header_cols[1..].to_vec()
    } else {
        return Err(InputError::columns(
            reader.path(),
            header.no,
            width,
            header_cols.len(),
        ));
    };

    tracing::debug!(
        "loaded {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        reader.path().display()
    );

    Ok(LabeledMatrix { columns, rows })
}
