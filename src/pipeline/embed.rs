use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::MissingPolicy;
use crate::error::RunError;
use crate::input::InputError;
use crate::input::translation::DrugNames;
use crate::stats::cosine_similarity;

/// A drug's top correlated genes with their gene/drug correlation weights.
#[derive(Debug, Clone)]
pub struct DrugGeneWeights {
    pub drug: String,
    pub genes: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrugPathwayScore {
    pub drug: String,
    pub pathway: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InverseRank {
    pub drug: String,
    pub pathway: String,
    pub inverse_rank: f64,
}

/// Highest score first; equal scores by drug, then pathway.
pub fn sort_scores_descending(scores: &mut [DrugPathwayScore]) {
    scores.sort_by(|x, y| match y.score.total_cmp(&x.score) {
        Ordering::Equal => (&x.drug, &x.pathway).cmp(&(&y.drug, &y.pathway)),
        other => other,
    });
}

/// `score(drug, pathway) = Σ cos(pathway_vec, gene_vec) * corr(gene, drug)`
/// over the drug's weighted genes. Genes or pathways without a vector follow
/// `policy`; a zero vector is a hard error.
pub fn score_drug_pathways(
    drugs: &[DrugGeneWeights],
    pathways: &[&str],
    vectors: &HashMap<String, Vec<f64>>,
    policy: MissingPolicy,
) -> Result<Vec<DrugPathwayScore>, RunError> {
    let mut pathway_vecs: Vec<(&str, &[f64])> = Vec::with_capacity(pathways.len());
    for &pathway in pathways {
        let found = vectors.get(pathway).map(Vec::as_slice);
        if let Some(v) = policy.resolve(found, "pathway embedding", pathway, "embedding")? {
            pathway_vecs.push((pathway, v));
        }
    }

    let mut scores = Vec::with_capacity(drugs.len() * pathway_vecs.len());
    for drug in drugs {
        let mut gene_vecs: Vec<(&[f64], f64)> = Vec::with_capacity(drug.genes.len());
        for (gene, weight) in &drug.genes {
            let found = vectors.get(gene).map(Vec::as_slice);
            if let Some(v) = policy.resolve(found, "gene embedding", gene, "embedding")? {
                gene_vecs.push((v, *weight));
            }
        }
        for &(pathway, pathway_vec) in &pathway_vecs {
            let mut score = 0.0;
            for &(gene_vec, weight) in &gene_vecs {
                score += cosine_similarity(pathway_vec, gene_vec)? * weight;
            }
            scores.push(DrugPathwayScore {
                drug: drug.drug.clone(),
                pathway: pathway.to_string(),
                score,
            });
        }
    }
    sort_scores_descending(&mut scores);
    Ok(scores)
}

/// Percentile rank of each pair: with entries ordered by score descending,
/// the entry at 0-based position `i` of `n` gets `(i + 1) / n`. Output is
/// ordered by inverse rank descending, so the lowest-scoring pair leads
/// with 1.0 and the best pair closes with `1 / n`.
pub fn inverse_rankings(scores: &[DrugPathwayScore]) -> Vec<InverseRank> {
    let mut ordered = scores.to_vec();
    sort_scores_descending(&mut ordered);
    let n = ordered.len() as f64;
    let mut ranks: Vec<InverseRank> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, s)| InverseRank {
            drug: s.drug,
            pathway: s.pathway,
            inverse_rank: (i + 1) as f64 / n,
        })
        .collect();
    ranks.reverse();
    ranks
}

/// Replaces drug ids with display names. Untranslatable rows follow `policy`.
pub fn translate_drugs(
    ranks: Vec<InverseRank>,
    names: &DrugNames,
    policy: MissingPolicy,
) -> Result<Vec<InverseRank>, InputError> {
    let mut out = Vec::with_capacity(ranks.len());
    for mut r in ranks {
        if let Some(name) = names.translate(&r.drug, policy, "inverse rankings")? {
            r.drug = name.to_string();
            out.push(r);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/embed.rs"]
mod tests;
