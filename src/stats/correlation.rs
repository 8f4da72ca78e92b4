use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::stats::StatsError;

/// Pearson correlation over the pairs that survived missing-value masking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

const MIN_PAIRS: usize = 3;

/// Pearson r with a two-sided p-value from Student's t on `n - 2` degrees of
/// freedom.
///
/// Positions missing in either vector are dropped from both before anything
/// is computed. Returns `Ok(None)` when the correlation is undefined: fewer
/// than three valid pairs, a constant vector, or non-finite data.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Result<Option<Correlation>, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect();
    let n = pairs.len();
    if n < MIN_PAIRS {
        return Ok(None);
    }

    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if !(sxx > 0.0 && syy > 0.0) || !sxy.is_finite() {
        return Ok(None);
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    let df = nf - 2.0;
    let p_value = if r.abs() == 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        (2.0 * dist.cdf(-t.abs())).min(1.0)
    };

    Ok(Some(Correlation { r, p_value, n }))
}

#[cfg(test)]
#[path = "../../tests/src_inline/stats/correlation.rs"]
mod tests;
