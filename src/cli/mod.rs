//! Command-line parsing for the carry screen.
//!
//! Flags only select file locations. The business thresholds are fixed
//! constants of the run (see `domain`), not knobs.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carry", version, about = "Bond/CDS carry screen (Y-CDS relative value)")]
pub struct Cli {
    /// Bond reference data CSV.
    #[arg(long, default_value = "bonds.csv")]
    pub bonds: PathBuf,

    /// CDS spread CSV.
    #[arg(long, default_value = "cds.csv")]
    pub cds: PathBuf,

    /// Directory the output tables are written to.
    #[arg(long = "out-dir", default_value = "out")]
    pub out_dir: PathBuf,
}
