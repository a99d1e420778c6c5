//! The full screening pipeline, independent of CLI and file exports.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> coupon filter -> quality chain -> country tags -> CDS weights
//! -> country merge -> carry metric -> tiers
//!
//! The front-end (`app::run`) can then focus on wiring: argument parsing,
//! writing the output files, and printing the summary.

use log::{debug, info, warn};

use crate::cds;
use crate::country;
use crate::domain::{ScreenConfig, ScreenedBond, TaggedBond, WeightedSpread};
use crate::error::AppError;
use crate::io::ingest;
use crate::merge;
use crate::report::{self, CarryRow, RunSummary, TieredOutputs};
use crate::screen;

/// All computed outputs of a single screening run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub screened: Vec<ScreenedBond>,
    pub tagged: Vec<TaggedBond>,
    pub weighted: Vec<WeightedSpread>,
    /// Merged bonds with carry metrics, sorted descending by Y-CDS.
    pub carry: Vec<CarryRow>,
    pub tiers: TieredOutputs,
    pub summary: RunSummary,
}

/// Execute the full screening pipeline and return the computed tables.
///
/// Each stage fully materializes its output before the next starts; no table
/// is mutated after it has been handed on.
pub fn run_screen(config: &ScreenConfig) -> Result<RunOutput, AppError> {
    // 1) Ingest both source tables.
    let bonds = ingest::load_bond_table(&config.bonds_csv)?;
    info!("bond rows read: {}", bonds.rows_read);
    for err in &bonds.row_errors {
        warn!(
            "bonds line {} ({}): {}",
            err.line,
            err.ticker.as_deref().unwrap_or("?"),
            err.message
        );
    }

    let cds_table = ingest::load_cds_table(&config.cds_csv)?;
    info!("CDS rows read: {}", cds_table.rows.len());

    // 2) Coupon percentile filter, per issuer group.
    let coupon_filtered = screen::filter_by_coupon_percentile(bonds.rows);
    let after_coupon_filter = coupon_filtered.len();
    info!("rows after coupon percentile filter: {after_coupon_filter}");

    // 3) Order-sensitive quality filter chain.
    let screened = screen::apply_quality_filters(coupon_filtered);
    let after_quality_filters = screened.len();

    // The reporting-only columns must exist to be dropped; a missing one is
    // upstream schema drift and aborts the run.
    let persisted_columns = screen::drop_reporting_columns(&bonds.headers)?;
    debug!("persisted bond columns: {persisted_columns:?}");

    // 4) Country tags from the issuer names.
    let tagged = country::tag_bonds(screened.clone());

    // 5) Weighted CDS spreads per issuer name.
    let weighted = cds::compute_weighted_average(&cds_table)?;

    // 6) Country-level merge & reconciliation.
    let merged = merge::merge_with_spreads(tagged.clone(), &weighted);
    info!("bonds with a resolvable CDS spread: {}", merged.len());

    // 7) Carry metric + tiered subsets.
    let carry = report::compute_carry(merged);
    let tiers = report::tier_outputs(&carry);

    let summary = RunSummary {
        bond_rows_read: bonds.rows_read,
        bond_row_errors: bonds.row_errors.len(),
        cds_rows_read: cds_table.rows.len(),
        after_coupon_filter,
        after_quality_filters,
        cds_names: weighted.len(),
        merged: carry.len(),
        tier_counts: [
            tiers.less_than_1.len(),
            tiers.less_than_3.len(),
            tiers.less_than_1_filtered.len(),
            tiers.less_than_3_filtered.len(),
        ],
    };

    Ok(RunOutput {
        screened,
        tagged,
        weighted,
        carry,
        tiers,
        summary,
    })
}
