//! Shared domain types and the fixed constants of the screen.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between stages as plain owned values
//! - exported to CSV
//! - constructed directly in tests without any file I/O

use std::path::PathBuf;

use chrono::NaiveDate;

/// Coupon percentile cut applied per issuer group (keep `Cpn <= p70`).
pub const COUPON_PERCENTILE: f64 = 0.70;

/// Issuer tickers excluded outright for stability reasons.
pub const UNSTABLE_TICKERS: &[&str] = &["ISRAEL", "RUSSIA", "UKRAIN"];

/// Maturity structures excluded from the screen.
pub const EXCLUDED_MTY_TYPES: &[&str] = &["CALL/SINK", "CALLABLE", "SINKABLE"];

/// Issue-size percentile cut: drop the bottom decile of `Amt Out`.
///
/// The decile is computed over the table *as filtered so far*, not over the
/// original input. Order of the quality filters is part of the contract.
pub const AMT_OUT_DECILE: f64 = 0.10;

/// Maximum accepted bid/ask yield ratio (wide or inverted quotes drop).
pub const MAX_BID_ASK_RATIO: f64 = 1.0209;

/// CDS spread weights: 30% 5Y, 70% 2Y.
pub const SPREAD_5Y_WEIGHT: f64 = 0.30;
pub const SPREAD_2Y_WEIGHT: f64 = 0.70;

/// Spread unit conversion: 100 CDS units = 1% of yield.
pub const CDS_UNITS_PER_PERCENT: f64 = 100.0;

/// Tiered output thresholds on the spread percentage and the carry metric.
pub const TIER_SPREAD_PCT_TIGHT: f64 = 1.0;
pub const TIER_SPREAD_PCT_WIDE: f64 = 3.0;
pub const TIER_MIN_YCDS: f64 = 5.0;

/// Bonds maturing before this date are stale and excluded.
pub fn maturity_cutoff() -> NaiveDate {
    // 2024-11-24 is a valid calendar date, so this cannot fail.
    NaiveDate::from_ymd_opt(2024, 11, 24).expect("valid cutoff date")
}

/// Bond source schema. All twelve columns are required at ingest.
pub const BOND_COLUMNS: &[&str] = &[
    "Ticker",
    "Cpn",
    "Maturity",
    "Mty Type",
    "Amt Out",
    "Yld to Mty (Bid)",
    "Yld to Mty (Ask)",
    "Name",
    "BVAL Ask Yld",
    "BVAL Bid Yld",
    "BBG Composite",
    "Series",
];

/// Reporting columns removed from the filtered table before persisting.
///
/// Dropping a column that is not present must fail loudly; a silent skip
/// would hide upstream schema drift.
pub const DROPPED_COLUMNS: &[&str] = &["BVAL Ask Yld", "BVAL Bid Yld", "BBG Composite", "Series"];

/// CDS source column names. `Spread 5Y ` carries a trailing space in the
/// upstream export and must be matched exactly, whitespace included.
pub const CDS_NAME_COLUMN: &str = "Name";
pub const CDS_SPREAD_5Y_COLUMN: &str = "Spread 5Y ";
pub const CDS_SPREAD_2Y_COLUMN: &str = "Spread 2Y";

/// A full run's configuration: where the tables live and where output goes.
///
/// Business thresholds are deliberately *not* configurable; they are fixed
/// constants of the run (see the consts above).
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub bonds_csv: PathBuf,
    pub cds_csv: PathBuf,
    pub out_dir: PathBuf,
}

/// A raw ingested bond row.
///
/// Numeric and date fields are `None` when the source cell was absent or did
/// not parse; each filter stage decides what missing means for it.
#[derive(Debug, Clone)]
pub struct BondRow {
    pub ticker: String,
    pub cpn: Option<f64>,
    pub maturity: Option<NaiveDate>,
    pub mty_type: String,
    pub amt_out: Option<f64>,
    pub yld_bid: Option<f64>,
    pub yld_ask: Option<f64>,
    pub name: String,

    /// The full original record (all source columns, in header order).
    ///
    /// Exact-duplicate detection compares entire records, not just the typed
    /// fields, so this is kept alongside the parsed view.
    pub raw: Vec<String>,
}

/// A bond that survived the full filter chain.
///
/// All fields the later stages need are present by construction: the quality
/// filters drop any row whose coupon, maturity, issue size, or yields are
/// missing, so narrowing from `BondRow` is total.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenedBond {
    pub ticker: String,
    pub cpn: f64,
    pub maturity: NaiveDate,
    pub mty_type: String,
    pub amt_out: f64,
    pub yld_bid: f64,
    pub yld_ask: f64,
    pub name: String,
}

/// A screened bond with its extracted country tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedBond {
    pub bond: ScreenedBond,
    /// One of the fixed country list, or `"Unknown"`.
    pub country: String,
}

/// Weighted 2Y/5Y CDS spread for one issuer name.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSpread {
    pub name: String,
    pub final_weighted_avg_spread: f64,
}

/// A bond joined to its country-level CDS spread.
///
/// After reconciliation every bond sharing a country carries the identical
/// spread value (the per-country mean).
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBond {
    pub bond: ScreenedBond,
    /// Country after the manual override rules have been applied.
    pub country: String,
    pub spread: f64,
}
