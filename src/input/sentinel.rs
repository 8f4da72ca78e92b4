//! Sentinel tokens found in the spreadsheet-derived inputs.
//!
//! Every special token is resolved here, once, before any value reaches a
//! comparison or a reducer:
//!
//! | token    | where             | meaning                                  |
//! |----------|-------------------|------------------------------------------|
//! | `#NAME?` | numeric cell      | negative infinity (unmeasurable extreme) |
//! | `NA`     | numeric cell      | missing observation, masked positionally |
//! | `-666`   | gene id cell      | unmapped probe, whole row skipped        |
//! | `[]`     | upstream score    | no score produced, row skipped           |

/// Parsed numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value(f64),
    Missing,
}

impl Cell {
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Missing => None,
        }
    }
}

pub const NAME_ERROR: &str = "#NAME?";
pub const NOT_AVAILABLE: &str = "NA";
pub const UNMAPPED_GENE: &str = "-666";
pub const EMPTY_SCORE: &str = "[]";

const NUMERIC_SENTINELS: &[(&str, Cell)] = &[
    (NAME_ERROR, Cell::Value(f64::NEG_INFINITY)),
    (NOT_AVAILABLE, Cell::Missing),
];

pub fn parse_cell(token: &str) -> Result<Cell, String> {
    let token = token.trim();
    for (sentinel, cell) in NUMERIC_SENTINELS {
        if token == *sentinel {
            return Ok(*cell);
        }
    }
    token
        .parse::<f64>()
        .map(Cell::Value)
        .map_err(|_| format!("invalid numeric value '{token}'"))
}

/// Parses a z-score as a magnitude. The `#NAME?` sentinel stays negative
/// infinity after the absolute value is taken, so it can never pass a
/// minimum-magnitude filter and always loses a max-reduction.
pub fn parse_magnitude(token: &str) -> Result<f64, String> {
    match parse_cell(token)? {
        Cell::Value(v) if v == f64::NEG_INFINITY => Ok(v),
        Cell::Value(v) => Ok(v.abs()),
        Cell::Missing => Err(format!("missing value '{}' in z-score matrix", token.trim())),
    }
}

pub fn is_unmapped_gene(id: &str) -> bool {
    id.trim() == UNMAPPED_GENE
}

pub fn is_empty_score(token: &str) -> bool {
    token.trim() == EMPTY_SCORE
}
