//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the screening pipeline
//! - writes the output tables
//! - prints the run summary

use clap::Parser;

use crate::cli::Cli;
use crate::domain::ScreenConfig;
use crate::error::AppError;
use crate::io::export;

pub mod pipeline;

/// Entry point for the `carry` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ScreenConfig {
        bonds_csv: cli.bonds,
        cds_csv: cli.cds,
        out_dir: cli.out_dir,
    };

    let run = pipeline::run_screen(&config)?;

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output directory '{}': {e}", config.out_dir.display()),
        )
    })?;

    let out = |name: &str| config.out_dir.join(name);
    export::write_filtered_bonds(&out(export::FILTERED_BONDS_CSV), &run.screened)?;
    export::write_weighted_spreads(&out(export::WEIGHTED_CDS_CSV), &run.weighted)?;
    export::write_tagged_bonds(&out(export::BONDS_WITH_COUNTRY_CSV), &run.tagged)?;
    export::write_carry_table(&out(export::MERGED_BONDS_CDS_CSV), &run.carry)?;
    export::write_carry_table(&out(export::LESS_THAN_1_CSV), &run.tiers.less_than_1)?;
    export::write_carry_table(&out(export::LESS_THAN_3_CSV), &run.tiers.less_than_3)?;
    export::write_carry_table(
        &out(export::LESS_THAN_1_FILTERED_CSV),
        &run.tiers.less_than_1_filtered,
    )?;
    export::write_carry_table(
        &out(export::LESS_THAN_3_FILTERED_CSV),
        &run.tiers.less_than_3_filtered,
    )?;

    println!("{}", crate::report::format_run_summary(&run.summary));

    Ok(())
}
