use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// One physical line of an input file, with its 1-based line number.
#[derive(Debug, Clone)]
pub struct Line {
    pub no: usize,
    pub text: String,
}

impl Line {
    pub fn tabs(&self) -> Vec<&str> {
        self.text.split('\t').map(str::trim).collect()
    }

    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

pub struct LineReader {
    path: PathBuf,
    inner: Box<dyn BufRead>,
    buf: String,
    line_no: usize,
}

impl LineReader {
    pub fn open(path: &Path) -> Result<Self, InputError> {
        Ok(Self {
            path: path.to_path_buf(),
            inner: open_maybe_gz(path)?,
            buf: String::new(),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next line with the line terminator stripped. Blank lines are returned
    /// too; callers that treat them as noise use [`LineReader::next_nonblank`].
    pub fn next_line(&mut self) -> Result<Option<Line>, InputError> {
        self.buf.clear();
        let read = self
            .inner
            .read_line(&mut self.buf)
            .map_err(|e| InputError::io(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let text = self.buf.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(Line {
            no: self.line_no,
            text,
        }))
    }

    pub fn next_nonblank(&mut self) -> Result<Option<Line>, InputError> {
        while let Some(line) = self.next_line()? {
            if !line.text.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Drops a fixed number of leading lines (headers, summary rows).
    pub fn skip(&mut self, n: usize) -> Result<(), InputError> {
        for _ in 0..n {
            if self.next_line()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}
