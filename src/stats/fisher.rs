//! Two-sided Fisher's exact test for 2x2 tables.

use statrs::function::factorial::ln_binomial;

use crate::model::contingency::ContingencyTable;

/// Tables whose probability is within this relative factor of the observed
/// table count as "no more probable". Matches scipy's tolerance.
const RELATIVE_TOLERANCE: f64 = 1.0 + 1e-7;

/// Two-sided p-value of `[[a, b], [c, d]]` under the hypergeometric null with
/// fixed margins: the total probability of every table with the same row and
/// column sums that is no more probable than the observed one.
///
/// Degenerate tables (an empty row or column) have a single possible
/// configuration and return 1.0.
pub fn fisher_exact(table: &ContingencyTable) -> f64 {
    let n = table.total();
    let row1 = table.a + table.b;
    let col1 = table.a + table.c;
    if row1 == 0 || col1 == 0 || row1 == n || col1 == n {
        return 1.0;
    }

    let lo = (row1 + col1).saturating_sub(n);
    let hi = row1.min(col1);
    let ln_total = ln_binomial(n, row1);
    let ln_pmf = |k: u64| ln_binomial(col1, k) + ln_binomial(n - col1, row1 - k) - ln_total;

    let cutoff = ln_pmf(table.a) + RELATIVE_TOLERANCE.ln();
    let mut p = 0.0;
    for k in lo..=hi {
        let lp = ln_pmf(k);
        if lp <= cutoff {
            p += lp.exp();
        }
    }
    p.min(1.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/stats/fisher.rs"]
mod tests;
