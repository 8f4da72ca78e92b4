use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod tsv;

/// Formats like C's `%g`: six significant digits, scientific notation for
/// exponents below -4 or at least 6, trailing zeros removed.
pub fn format_g(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Round to six significant digits first so the exponent reflects the
    // printed mantissa (9.999996 prints as 10).
    let sci = format!("{:.5e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..6).contains(&exp) {
        let decimals = (5 - exp).max(0) as usize;
        trim_fraction(format!("{:.*}", decimals, v))
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa.to_string()), sign, exp.abs())
    }
}

fn trim_fraction(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn create_writer(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Machine-readable companion of one ranking file.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    pub command: String,
    pub output: String,
    pub n_entities: usize,
    pub n_references: usize,
    pub n_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_p_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_below_low_p: Option<usize>,
    pub parameters: serde_json::Value,
}

impl RunSummary {
    pub fn new(command: &str, output: &Path) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: command.to_string(),
            output: output.display().to_string(),
            n_entities: 0,
            n_references: 0,
            n_rows: 0,
            universe_size: None,
            low_p_threshold: None,
            n_below_low_p: None,
            parameters: serde_json::Value::Null,
        }
    }
}

pub fn summary_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".summary.json");
    output.with_file_name(name)
}

pub fn write_summary(output: &Path, summary: &RunSummary) -> std::io::Result<PathBuf> {
    let path = summary_path(output);
    let mut w = create_writer(&path)?;
    serde_json::to_writer_pretty(&mut w, summary)?;
    writeln!(w)?;
    w.flush()?;
    Ok(path)
}
