use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RunError;
use crate::input::InputError;

/// What to do when an identifier referenced in one input is absent from
/// another (drug translations, embedding vectors, upstream rankings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Abort the run with a descriptive error.
    #[default]
    Fail,
    /// Log a warning and drop the item.
    Skip,
}

impl MissingPolicy {
    pub fn resolve<T>(
        self,
        found: Option<T>,
        kind: &'static str,
        id: &str,
        context: &str,
    ) -> Result<Option<T>, InputError> {
        match (found, self) {
            (Some(v), _) => Ok(Some(v)),
            (None, MissingPolicy::Fail) => Err(InputError::UnknownId {
                kind,
                id: id.to_string(),
                context: context.to_string(),
            }),
            (None, MissingPolicy::Skip) => {
                tracing::warn!("skipping unknown {} '{}' referenced in {}", kind, id, context);
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputFiles {
    pub pathways: String,
    pub drug_response: String,
    pub expression: String,
    pub mutation: String,
    pub drug_translation: String,
    pub lincs_level3: String,
    pub lincs_level4: String,
    /// `{n}` is replaced by the control number.
    pub lincs_control: String,
    pub embedding_dir: String,
    pub embedding_mapping: String,
    /// Upstream rankings, resolved against the results directory.
    pub pca_scores: String,
    pub l1_scores: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            pathways: "nci_pathway.txt".to_string(),
            drug_response: "auc.tsv".to_string(),
            expression: "gene2medProbeExpr.txt".to_string(),
            mutation: "gene2SNPu50SumParse.txt".to_string(),
            drug_translation: "drug_translation.txt".to_string(),
            lincs_level3: "lincs_zscore.txt".to_string(),
            lincs_level4: "lincs_zscore_new.txt".to_string(),
            lincs_control: "lvl4_combinedPvalue_positive_control_Aft_{n}.txt".to_string(),
            embedding_dir: "embedding".to_string(),
            embedding_mapping: "gene_pathway_id.txt".to_string(),
            pca_scores: "pca_path_drug_scores.txt".to_string(),
            l1_scores: "linear_regression_L1.txt".to_string(),
        }
    }
}

/// Every tunable of a run. Loaded from an optional JSON file; command-line
/// flags override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Correlation p-value a gene must beat to enter a drug's top set.
    pub p_threshold: f64,
    /// Upstream pathway p-value cut used by the comparator.
    pub compare_p_threshold: f64,
    /// Pairs below this p-value are counted as strongly significant.
    pub low_p_threshold: f64,
    pub z_score_min: f64,
    pub max_genes_per_entity: usize,
    /// When set, an entity is tested against pathway `P` with only its first
    /// `factor * |P|` ranked genes. `2` matches the historical `datasets`
    /// rankings, which always capped at twice the pathway size.
    pub pathway_cap_factor: Option<usize>,
    pub missing_policy: MissingPolicy,
    pub files: InputFiles,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            p_threshold: 0.01,
            compare_p_threshold: 0.05,
            low_p_threshold: 1e-4,
            z_score_min: 2.0,
            max_genes_per_entity: 500,
            pathway_cap_factor: None,
            missing_policy: MissingPolicy::Fail,
            files: InputFiles::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, RunError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| RunError::Input(InputError::io(path, source)))?;
                serde_json::from_str(&text).map_err(|source| RunError::Config {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RunError> {
        for (name, value) in [
            ("p_threshold", self.p_threshold),
            ("compare_p_threshold", self.compare_p_threshold),
            ("low_p_threshold", self.low_p_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(RunError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        if !self.z_score_min.is_finite() || self.z_score_min < 0.0 {
            return Err(RunError::InvalidConfig(format!(
                "z_score_min must be a finite non-negative number, got {}",
                self.z_score_min
            )));
        }
        if self.max_genes_per_entity == 0 {
            return Err(RunError::InvalidConfig(
                "max_genes_per_entity must be positive".to_string(),
            ));
        }
        if self.pathway_cap_factor == Some(0) {
            return Err(RunError::InvalidConfig(
                "pathway_cap_factor must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn results_path(&self, name: &str) -> PathBuf {
        self.results_dir.join(name)
    }

    pub fn lincs_control_path(&self, control: &str) -> PathBuf {
        self.data_path(&self.files.lincs_control.replace("{n}", control))
    }

    pub fn embedding_dir(&self) -> PathBuf {
        self.data_path(&self.files.embedding_dir)
    }
}
