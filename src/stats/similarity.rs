use crate::stats::StatsError;

/// `dot(a, b) / (|a| |b|)`. A zero vector has no direction, so it is an error
/// rather than a NaN that would leak into downstream sums.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut dot = 0.0;
    let mut aa = 0.0;
    let mut bb = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        aa += x * x;
        bb += y * y;
    }
    if aa == 0.0 || bb == 0.0 {
        return Err(StatsError::ZeroVector);
    }
    Ok(dot / (aa.sqrt() * bb.sqrt()))
}
