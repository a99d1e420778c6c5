//! Weighted CDS spread aggregation (stage 4).
//!
//! Per issuer name: `Final_Weighted_Avg_Spread = Σ 0.30·Spread5Y + Σ 0.70·Spread2Y`,
//! summing across all rows that share a name.

use std::collections::BTreeMap;

use log::error;

use crate::domain::{
    CDS_NAME_COLUMN, CDS_SPREAD_2Y_COLUMN, CDS_SPREAD_5Y_COLUMN, SPREAD_2Y_WEIGHT,
    SPREAD_5Y_WEIGHT, WeightedSpread,
};
use crate::error::AppError;
use crate::io::ingest::{CdsTable, cds_column, parse_opt_f64};

/// Compute the weighted average spread per issuer name.
///
/// Hard precondition: the `Spread 5Y ` (trailing space significant) and
/// `Spread 2Y` columns must both exist. A missing column is a fatal input
/// error, reported by exact name, never a silent empty result.
///
/// Unparseable spread cells contribute nothing to their issuer's sum.
/// Output is sorted by name.
pub fn compute_weighted_average(table: &CdsTable) -> Result<Vec<WeightedSpread>, AppError> {
    let name_idx = require_column(table, CDS_NAME_COLUMN)?;
    let spread_5y_idx = require_column(table, CDS_SPREAD_5Y_COLUMN)?;
    let spread_2y_idx = require_column(table, CDS_SPREAD_2Y_COLUMN)?;

    // (weighted 5y sum, weighted 2y sum) per name, sorted by name.
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for row in &table.rows {
        let Some(name) = row.get(name_idx).filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let entry = sums.entry(name.clone()).or_insert((0.0, 0.0));
        if let Some(v) = parse_opt_f64(row.get(spread_5y_idx).map(String::as_str)) {
            entry.0 += v * SPREAD_5Y_WEIGHT;
        }
        if let Some(v) = parse_opt_f64(row.get(spread_2y_idx).map(String::as_str)) {
            entry.1 += v * SPREAD_2Y_WEIGHT;
        }
    }

    Ok(sums
        .into_iter()
        .map(|(name, (w5, w2))| WeightedSpread {
            name,
            final_weighted_avg_spread: w5 + w2,
        })
        .collect())
}

fn require_column(table: &CdsTable, name: &str) -> Result<usize, AppError> {
    cds_column(table, name).ok_or_else(|| {
        error!("Column '{name}' not found in the CDS table.");
        AppError::new(2, format!("CDS table is missing required column: `{name}`"))
    })
}
