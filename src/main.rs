mod commands;
mod config;
mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod stats;

#[cfg(test)]
#[path = "../tests/src_inline/support.rs"]
mod test_support;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{Dataset, LincsLevel, LincsRun};
use crate::config::{AnalysisConfig, MissingPolicy};
use crate::error::RunError;
use crate::input::embedding::Network;
use crate::input::rankings::Method;

#[derive(Debug, Parser)]
#[command(name = "drugpath", version, about = "Drug-to-pathway enrichment rankings")]
struct Cli {
    /// Directory holding the input tables.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Directory receiving rankings; also where upstream method scores live.
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,
    /// JSON file with analysis parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Handling of identifiers missing from a lookup table.
    #[arg(long, global = true, value_enum)]
    missing: Option<MissingPolicy>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Correlate drug response with a gene dataset and rank pathways.
    Datasets {
        #[arg(value_enum)]
        dataset: Dataset,
    },
    /// Rank pathways for LINCS z-score signatures.
    Lincs {
        #[arg(value_enum)]
        level: LincsLevel,
    },
    /// Rank pathways for a LINCS positive-control file.
    LincsControl { aft_num: String },
    /// Compare LINCS level-4 pathways with an upstream method ranking.
    Compare {
        #[arg(value_enum)]
        method: Method,
    },
    /// Score drug/pathway pairs through network embeddings.
    Embedding {
        #[arg(value_enum)]
        network: Network,
        top_k: usize,
    },
}

fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    // Error displays already carry their underlying cause.
    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    let cfg = resolve_config(&cli)?;
    match cli.command {
        Command::Datasets { dataset } => commands::run_datasets(&cfg, dataset),
        Command::Lincs { level } => commands::run_lincs(&cfg, &LincsRun::Level(level)),
        Command::LincsControl { aft_num } => {
            commands::run_lincs(&cfg, &LincsRun::PositiveControl(aft_num))
        }
        Command::Compare { method } => commands::run_compare(&cfg, method),
        Command::Embedding { network, top_k } => commands::run_embedding(&cfg, network, top_k),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig, RunError> {
    let mut cfg = AnalysisConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.results_dir {
        cfg.results_dir = dir.clone();
    }
    if let Some(policy) = cli.missing {
        cfg.missing_policy = policy;
    }
    Ok(cfg)
}
