//! Risk/quality filter chain (stage 2).
//!
//! Sequential AND-filters over the coupon-filtered table. Each step's
//! threshold is computed on the table *as filtered so far*; the order below
//! is part of the contract and must not be reshuffled.

use std::collections::HashSet;

use log::info;

use crate::domain::{
    AMT_OUT_DECILE, BondRow, DROPPED_COLUMNS, EXCLUDED_MTY_TYPES, MAX_BID_ASK_RATIO,
    ScreenedBond, UNSTABLE_TICKERS, maturity_cutoff,
};
use crate::error::AppError;
use crate::math::quantile;

/// Apply the full quality filter chain and narrow to [`ScreenedBond`].
///
/// Input is expected to have passed the coupon percentile stage, so every
/// row already carries a parsed coupon.
pub fn apply_quality_filters(mut rows: Vec<BondRow>) -> Vec<ScreenedBond> {
    // a. Unstable issuers out.
    rows.retain(|r| !UNSTABLE_TICKERS.contains(&r.ticker.as_str()));
    info!("rows after filtering unstable issuers: {}", rows.len());

    // b. Stale or unparseable maturities out.
    let cutoff = maturity_cutoff();
    rows.retain(|r| r.maturity.is_some_and(|m| m >= cutoff));
    info!("rows after filtering by maturity date: {}", rows.len());

    // c. Exact duplicates out (all source columns equal, first kept).
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    rows.retain(|r| seen.insert(r.raw.clone()));
    info!("rows after removing duplicates: {}", rows.len());

    // d. Callable/sinkable structures out.
    rows.retain(|r| !EXCLUDED_MTY_TYPES.contains(&r.mty_type.as_str()));
    info!("rows after filtering callable/sinkable structures: {}", rows.len());

    // e. Bottom decile of issue size out. The threshold is relative to
    //    whatever survived steps a-d; rows with unparseable Amt Out drop here.
    let amounts: Vec<f64> = rows.iter().filter_map(|r| r.amt_out).collect();
    match quantile(&amounts, AMT_OUT_DECILE) {
        Some(threshold) => rows.retain(|r| r.amt_out.is_some_and(|a| a >= threshold)),
        None => rows.clear(),
    }
    info!("rows after filtering by issue size: {}", rows.len());

    // f. Wide or inverted bid/ask yield quotes out. NaN and infinite ratios
    //    fail the comparison and drop, matching the coercion rules.
    rows.retain(|r| match (r.yld_bid, r.yld_ask) {
        (Some(bid), Some(ask)) => bid / ask < MAX_BID_ASK_RATIO,
        _ => false,
    });
    info!("rows after filtering by bid/ask yield ratio: {}", rows.len());

    rows.into_iter()
        .filter_map(|r| match (r.cpn, r.maturity, r.amt_out, r.yld_bid, r.yld_ask) {
            (Some(cpn), Some(maturity), Some(amt_out), Some(yld_bid), Some(yld_ask)) => {
                Some(ScreenedBond {
                    ticker: r.ticker,
                    cpn,
                    maturity,
                    mty_type: r.mty_type,
                    amt_out,
                    yld_bid,
                    yld_ask,
                    name: r.name,
                })
            }
            _ => None,
        })
        .collect()
}

/// Remove the reporting-only columns from the persisted schema.
///
/// A column that is not present is a configuration error and propagates;
/// swallowing it would hide schema drift in the upstream export.
pub fn drop_reporting_columns(headers: &[String]) -> Result<Vec<String>, AppError> {
    let mut kept = headers.to_vec();
    for col in DROPPED_COLUMNS {
        let before = kept.len();
        kept.retain(|h| !h.eq_ignore_ascii_case(col));
        if kept.len() == before {
            return Err(AppError::new(
                2,
                format!("Cannot drop column `{col}`: not present in the bonds table."),
            ));
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(ticker: &str, maturity: &str, mty_type: &str, amt_out: f64, bid: f64, ask: f64) -> BondRow {
        BondRow {
            ticker: ticker.to_string(),
            cpn: Some(5.0),
            maturity: NaiveDate::parse_from_str(maturity, "%Y-%m-%d").ok(),
            mty_type: mty_type.to_string(),
            amt_out: Some(amt_out),
            yld_bid: Some(bid),
            yld_ask: Some(ask),
            name: format!("{ticker} Govt"),
            raw: vec![
                ticker.to_string(),
                maturity.to_string(),
                mty_type.to_string(),
                amt_out.to_string(),
                bid.to_string(),
                ask.to_string(),
            ],
        }
    }

    fn benign(ticker: &str) -> BondRow {
        row(ticker, "2030-06-01", "AT MATURITY", 1_000.0, 6.0, 6.0)
    }

    #[test]
    fn unstable_issuers_are_excluded() {
        let kept = apply_quality_filters(vec![benign("RUSSIA"), benign("MEX")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ticker, "MEX");
    }

    #[test]
    fn stale_and_unparseable_maturities_drop() {
        let mut bad_date = benign("MEX");
        bad_date.maturity = None;
        let kept = apply_quality_filters(vec![
            row("MEX", "2024-11-23", "AT MATURITY", 1_000.0, 6.0, 6.0),
            row("MEX", "2024-11-24", "AT MATURITY", 1_000.0, 6.0, 6.0),
            bad_date,
        ]);
        // The cutoff itself survives; the day before and the unparseable drop.
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].maturity, NaiveDate::from_ymd_opt(2024, 11, 24).unwrap());
    }

    #[test]
    fn exact_duplicates_keep_first() {
        let kept = apply_quality_filters(vec![benign("MEX"), benign("MEX"), benign("CHILE")]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn callable_and_sinkable_structures_drop() {
        let kept = apply_quality_filters(vec![
            row("MEX", "2030-06-01", "CALL/SINK", 1_000.0, 6.0, 6.0),
            row("MEX", "2030-06-01", "CALLABLE", 1_000.0, 6.0, 6.0),
            row("MEX", "2030-06-01", "SINKABLE", 1_000.0, 6.0, 6.0),
            row("MEX", "2030-06-01", "AT MATURITY", 1_000.0, 6.0, 6.0),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mty_type, "AT MATURITY");
    }

    #[test]
    fn bottom_decile_of_issue_size_drops() {
        // Sizes 100..=1000; p10 of the ten values is 190, so only 100 drops.
        let rows: Vec<BondRow> = (1..=10)
            .map(|i| {
                let mut r = row("MEX", "2030-06-01", "AT MATURITY", (i * 100) as f64, 6.0, 6.0);
                // keep rows distinct for the duplicate filter
                r.raw.push(i.to_string());
                r
            })
            .collect();
        let kept = apply_quality_filters(rows);
        assert_eq!(kept.len(), 9);
        assert!(kept.iter().all(|b| b.amt_out >= 190.0));
    }

    #[test]
    fn wide_bid_ask_ratio_drops() {
        let kept = apply_quality_filters(vec![
            row("MEX", "2030-06-01", "AT MATURITY", 1_000.0, 6.2, 6.0), // 1.0333
            row("CHILE", "2030-06-01", "AT MATURITY", 1_000.0, 6.1, 6.0), // 1.0167
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ticker, "CHILE");
    }

    #[test]
    fn missing_yields_drop_at_ratio_step() {
        let mut r = benign("MEX");
        r.yld_ask = None;
        let kept = apply_quality_filters(vec![r, benign("CHILE")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ticker, "CHILE");
    }

    #[test]
    fn drop_reporting_columns_requires_presence() {
        let headers: Vec<String> = crate::domain::BOND_COLUMNS.iter().map(|s| s.to_string()).collect();
        let kept = drop_reporting_columns(&headers).unwrap();
        assert_eq!(kept.len(), headers.len() - 4);
        assert!(!kept.iter().any(|h| h == "BVAL Bid Yld"));

        let partial: Vec<String> = headers.iter().filter(|h| *h != "Series").cloned().collect();
        let err = drop_reporting_columns(&partial).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Series"));
    }
}
