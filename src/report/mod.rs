//! Carry metric, tiered output subsets, and the formatted run summary.
//!
//! Formatting lives here so the table transformations stay clean and the
//! terminal output is localized in one place.

use crate::domain::{
    CDS_UNITS_PER_PERCENT, MergedBond, TIER_MIN_YCDS, TIER_SPREAD_PCT_TIGHT,
    TIER_SPREAD_PCT_WIDE,
};

/// A merged bond with its derived carry metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CarryRow {
    pub merged: MergedBond,
    /// Spread converted to yield units (100 CDS units = 1%).
    pub spread_pct: f64,
    /// Y-CDS: bid yield minus the CDS-implied credit cost.
    pub ycds: f64,
}

/// The four threshold-filtered reporting subsets.
#[derive(Debug, Clone)]
pub struct TieredOutputs {
    pub less_than_1: Vec<CarryRow>,
    pub less_than_3: Vec<CarryRow>,
    pub less_than_1_filtered: Vec<CarryRow>,
    pub less_than_3_filtered: Vec<CarryRow>,
}

/// Row counts collected along the run, for the printed summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub bond_rows_read: usize,
    pub bond_row_errors: usize,
    pub cds_rows_read: usize,
    pub after_coupon_filter: usize,
    pub after_quality_filters: usize,
    pub cds_names: usize,
    pub merged: usize,
    pub tier_counts: [usize; 4],
}

/// Compute carry metrics for every merged bond and sort descending by Y-CDS.
pub fn compute_carry(rows: Vec<MergedBond>) -> Vec<CarryRow> {
    let mut out: Vec<CarryRow> = rows
        .into_iter()
        .map(|merged| {
            let spread_pct = merged.spread / CDS_UNITS_PER_PERCENT;
            let ycds = merged.bond.yld_bid - spread_pct;
            CarryRow {
                merged,
                spread_pct,
                ycds,
            }
        })
        .collect();

    out.sort_by(|a, b| b.ycds.partial_cmp(&a.ycds).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Slice the sorted carry table into the four reporting tiers.
pub fn tier_outputs(rows: &[CarryRow]) -> TieredOutputs {
    let less_than_1: Vec<CarryRow> = rows
        .iter()
        .filter(|r| r.spread_pct < TIER_SPREAD_PCT_TIGHT)
        .cloned()
        .collect();
    let less_than_3: Vec<CarryRow> = rows
        .iter()
        .filter(|r| r.spread_pct < TIER_SPREAD_PCT_WIDE)
        .cloned()
        .collect();

    let less_than_1_filtered = less_than_1
        .iter()
        .filter(|r| r.ycds >= TIER_MIN_YCDS)
        .cloned()
        .collect();
    let less_than_3_filtered = less_than_3
        .iter()
        .filter(|r| r.ycds >= TIER_MIN_YCDS)
        .cloned()
        .collect();

    TieredOutputs {
        less_than_1,
        less_than_3,
        less_than_1_filtered,
        less_than_3_filtered,
    }
}

/// Format the run summary printed after the exports are written.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== carry - Bond/CDS Carry Screen ===\n");
    out.push_str(&format!(
        "Bonds: {} rows read ({} row errors)\n",
        summary.bond_rows_read, summary.bond_row_errors
    ));
    out.push_str(&format!("CDS:   {} rows read\n", summary.cds_rows_read));
    out.push('\n');
    out.push_str(&format!(
        "After coupon percentile filter : {}\n",
        summary.after_coupon_filter
    ));
    out.push_str(&format!(
        "After quality filter chain     : {}\n",
        summary.after_quality_filters
    ));
    out.push_str(&format!(
        "Weighted CDS names             : {}\n",
        summary.cds_names
    ));
    out.push_str(&format!(
        "Merged bonds with spreads      : {}\n",
        summary.merged
    ));
    out.push('\n');
    out.push_str(&format!(
        "Tiers: <1% spread: {} | <3% spread: {} | <1% & Y-CDS>=5: {} | <3% & Y-CDS>=5: {}\n",
        summary.tier_counts[0], summary.tier_counts[1], summary.tier_counts[2], summary.tier_counts[3]
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScreenedBond;
    use chrono::NaiveDate;

    fn merged(name: &str, yld_bid: f64, spread: f64) -> MergedBond {
        MergedBond {
            bond: ScreenedBond {
                ticker: "T".to_string(),
                cpn: 5.0,
                maturity: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                mty_type: "AT MATURITY".to_string(),
                amt_out: 1_000.0,
                yld_bid,
                yld_ask: yld_bid,
                name: name.to_string(),
            },
            country: name.to_string(),
            spread,
        }
    }

    #[test]
    fn carry_is_bid_yield_minus_spread_percentage() {
        let rows = compute_carry(vec![merged("Chile", 6.0, 65.0)]);
        assert!((rows[0].spread_pct - 0.65).abs() < 1e-12);
        assert!((rows[0].ycds - 5.35).abs() < 1e-12);
    }

    #[test]
    fn carry_table_sorts_descending_by_ycds() {
        let rows = compute_carry(vec![
            merged("A", 5.0, 100.0), // ycds 4.0
            merged("B", 8.0, 50.0),  // ycds 7.5
            merged("C", 6.0, 65.0),  // ycds 5.35
        ]);
        let order: Vec<&str> = rows.iter().map(|r| r.merged.country.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn tiers_apply_spread_and_carry_thresholds() {
        let rows = compute_carry(vec![
            merged("A", 8.0, 50.0),  // pct 0.5, ycds 7.5
            merged("B", 4.0, 80.0),  // pct 0.8, ycds 3.2
            merged("C", 9.0, 200.0), // pct 2.0, ycds 7.0
            merged("D", 9.0, 400.0), // pct 4.0, ycds 5.0
        ]);
        let tiers = tier_outputs(&rows);

        assert_eq!(tiers.less_than_1.len(), 2); // A, B
        assert_eq!(tiers.less_than_3.len(), 3); // A, B, C
        assert_eq!(tiers.less_than_1_filtered.len(), 1); // A
        assert_eq!(tiers.less_than_3_filtered.len(), 2); // A, C
    }

    #[test]
    fn tight_tier_is_subset_of_wide_tier() {
        let rows = compute_carry(vec![
            merged("A", 8.0, 50.0),
            merged("B", 7.0, 120.0),
            merged("C", 6.5, 10.0),
        ]);
        let tiers = tier_outputs(&rows);
        for row in &tiers.less_than_1_filtered {
            assert!(tiers.less_than_3_filtered.contains(row));
        }
        for row in &tiers.less_than_1 {
            assert!(tiers.less_than_3.contains(row));
        }
    }
}
