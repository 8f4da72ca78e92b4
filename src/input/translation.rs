use std::collections::HashMap;
use std::path::Path;

use crate::config::MissingPolicy;
use crate::input::InputError;
use crate::input::reader::LineReader;

/// Drug id to display name, read from `english_name drug_id` lines.
#[derive(Debug, Clone, Default)]
pub struct DrugNames {
    by_id: HashMap<String, String>,
}

impl DrugNames {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let by_id = pairs
            .into_iter()
            .map(|(name, id)| (id.into(), name.into()))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn translate(
        &self,
        id: &str,
        policy: MissingPolicy,
        context: &str,
    ) -> Result<Option<&str>, InputError> {
        policy.resolve(self.get(id), "drug id", id, context)
    }
}

pub fn load_drug_names(path: &Path) -> Result<DrugNames, InputError> {
    let mut reader = LineReader::open(path)?;
    let mut by_id = HashMap::new();
    while let Some(line) = reader.next_nonblank()? {
        let fields = line.words();
        if fields.len() != 2 {
            return Err(InputError::columns(reader.path(), line.no, 2, fields.len()));
        }
        let (name, id) = (fields[0], fields[1]);
        if let Some(previous) = by_id.insert(id.to_string(), name.to_string()) {
            tracing::warn!(
                "drug id {} translated twice ({} and {}); keeping {}",
                id,
                previous,
                name,
                name
            );
        }
    }
    tracing::info!("loaded {} drug name translations", by_id.len());
    Ok(DrugNames { by_id })
}
