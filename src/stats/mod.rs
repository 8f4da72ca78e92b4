use thiserror::Error;

pub mod correlation;
pub mod fisher;
pub mod similarity;

pub use correlation::{Correlation, pearson};
pub use fisher::fisher_exact;
pub use similarity::cosine_similarity;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("cosine similarity is undefined for a zero vector")]
    ZeroVector,
    #[error("vector lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("contingency sets cover {covered} items but the universe has only {universe}")]
    UniverseTooSmall { universe: usize, covered: usize },
    #[error("distribution error: {0}")]
    Distribution(String),
}
