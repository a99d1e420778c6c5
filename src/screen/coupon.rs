//! Per-issuer coupon percentile filter (stage 1).

use std::collections::HashMap;

use crate::domain::{BondRow, COUPON_PERCENTILE};
use crate::math::quantile;

/// Keep bonds whose coupon is at or below their issuer's 70th percentile.
///
/// Rows with an unparseable coupon are dropped before the percentile is
/// computed. Issuers with a single bond trivially pass (the percentile of a
/// one-element sample is the value itself).
pub fn filter_by_coupon_percentile(rows: Vec<BondRow>) -> Vec<BondRow> {
    let rows: Vec<BondRow> = rows.into_iter().filter(|r| r.cpn.is_some()).collect();

    let mut coupons_by_ticker: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in &rows {
        if let Some(cpn) = row.cpn {
            coupons_by_ticker.entry(row.ticker.as_str()).or_default().push(cpn);
        }
    }

    let percentiles: HashMap<String, f64> = coupons_by_ticker
        .into_iter()
        .filter_map(|(ticker, coupons)| {
            quantile(&coupons, COUPON_PERCENTILE).map(|p| (ticker.to_string(), p))
        })
        .collect();

    rows.into_iter()
        .filter(|row| match (row.cpn, percentiles.get(row.ticker.as_str())) {
            (Some(cpn), Some(&p)) => cpn <= p,
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, cpn: Option<f64>) -> BondRow {
        BondRow {
            ticker: ticker.to_string(),
            cpn,
            maturity: None,
            mty_type: String::new(),
            amt_out: None,
            yld_bid: None,
            yld_ask: None,
            name: format!("{ticker} Govt"),
            raw: vec![ticker.to_string(), format!("{cpn:?}")],
        }
    }

    #[test]
    fn keeps_coupons_at_or_below_issuer_percentile() {
        // p70 of [1..5] = 3.8: keep 1, 2, 3; drop 4, 5.
        let rows: Vec<BondRow> = (1..=5).map(|c| row("MEX", Some(c as f64))).collect();
        let kept = filter_by_coupon_percentile(rows);
        let coupons: Vec<f64> = kept.iter().map(|r| r.cpn.unwrap()).collect();
        assert_eq!(coupons, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn single_bond_issuer_trivially_passes() {
        let kept = filter_by_coupon_percentile(vec![row("CHILE", Some(7.25))]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn unparseable_coupons_are_dropped() {
        let kept = filter_by_coupon_percentile(vec![row("MEX", None), row("MEX", Some(2.0))]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].cpn, Some(2.0));
    }

    #[test]
    fn percentile_is_per_issuer_group() {
        // BRAZIL's high coupons must not pull up MEX's percentile.
        let mut rows: Vec<BondRow> = (1..=5).map(|c| row("MEX", Some(c as f64))).collect();
        rows.extend((11..=15).map(|c| row("BRAZIL", Some(c as f64))));
        let kept = filter_by_coupon_percentile(rows);
        let mex: Vec<f64> = kept
            .iter()
            .filter(|r| r.ticker == "MEX")
            .map(|r| r.cpn.unwrap())
            .collect();
        assert_eq!(mex, vec![1.0, 2.0, 3.0]);
    }
}
