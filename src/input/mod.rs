use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod embedding;
pub mod lincs;
pub mod matrix;
pub mod pathways;
pub mod rankings;
pub mod reader;
pub mod sentinel;
pub mod translation;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing input file: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("{}:{line}: expected {expected} columns, found {found}", .path.display())]
    ColumnCount {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{}:{line}: {msg}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("unknown {kind} '{id}' referenced in {context}")]
    UnknownId {
        kind: &'static str,
        id: String,
        context: String,
    },
    #[error("{left} has {left_len} samples but {right} has {right_len}")]
    ShapeMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },
    #[error("{} contains no data rows", .0.display())]
    Empty(PathBuf),
}

impl InputError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, line: usize, msg: impl Into<String>) -> Self {
        InputError::Parse {
            path: path.to_path_buf(),
            line,
            msg: msg.into(),
        }
    }

    pub fn columns(path: &Path, line: usize, expected: usize, found: usize) -> Self {
        InputError::ColumnCount {
            path: path.to_path_buf(),
            line,
            expected,
            found,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
